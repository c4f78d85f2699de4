pub const TRACK_RECORDS_TABLE_NAME: &str = "TrackRecords";
pub const TRACK_POINTS_TABLE_NAME: &str = "TrackPoints";

pub const RECORD_ID: &str = "record_id";
pub const ROUTE_ID: &str = "route_id";
pub const ROUTE_NAME: &str = "route_name";
pub const START_TIME: &str = "start_time";
pub const END_TIME: &str = "end_time";
pub const TOTAL_DISTANCE_M: &str = "total_distance_m";
pub const MAX_SPEED_KMH: &str = "max_speed_kmh";
pub const AVERAGE_SPEED_KMH: &str = "average_speed_kmh";
pub const MAX_ELEVATION_M: &str = "max_elevation_m";
pub const MIN_ELEVATION_M: &str = "min_elevation_m";
pub const TOTAL_ELEVATION_GAIN_M: &str = "total_elevation_gain_m";

pub const POINT_INDEX: &str = "point_index";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const ELEVATION: &str = "elevation";
pub const TIMESTAMP: &str = "timestamp";
pub const SPEED: &str = "speed";
pub const HORIZONTAL_ACCURACY: &str = "horizontal_accuracy";
