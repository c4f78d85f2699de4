//! Geodesic helpers. All coordinates are WGS84 lat/lon in degrees.

use hike_tracker_lib::coordinate::Coordinate;

/// Earth radius in meters (WGS84 mean).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two coordinates in meters (haversine).
///
/// Symmetric, and zero for identical inputs up to floating-point noise.
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Like [`distance`], but folds the elevation delta in when both
/// coordinates carry one.
pub fn distance_3d(a: &Coordinate, b: &Coordinate) -> f64 {
    let horizontal = distance(a, b);
    match (a.elevation, b.elevation) {
        (Some(elevation_a), Some(elevation_b)) => horizontal.hypot(elevation_b - elevation_a),
        _ => horizontal,
    }
}

/// Minimum distance in meters from `point` to the polyline through `line`.
///
/// `f64::INFINITY` for an empty polyline; plain point distance for a
/// single vertex.
pub fn distance_to_polyline(point: &Coordinate, line: &[Coordinate]) -> f64 {
    match line {
        [] => f64::INFINITY,
        [only] => distance(point, only),
        _ => line
            .windows(2)
            .map(|segment| distance(point, &nearest_on_segment(point, &segment[0], &segment[1])))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Nearest point to `p` on the segment from `a` to `b`.
///
/// Planar approximation scaled by the latitude cosine; accurate enough for
/// the short segments planned routes are built from.
fn nearest_on_segment(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> Coordinate {
    let cos_lat = ((a.latitude + b.latitude) / 2.0).to_radians().cos();

    let dx = (b.longitude - a.longitude) * cos_lat;
    let dy = b.latitude - a.latitude;
    let px = (p.longitude - a.longitude) * cos_lat;
    let py = p.latitude - a.latitude;

    let segment_len_sq = dx * dx + dy * dy;
    if segment_len_sq < 1e-20 {
        // Degenerate segment, fall back to the vertex
        return *a;
    }

    let t = ((px * dx + py * dy) / segment_len_sq).clamp(0.0, 1.0);

    Coordinate {
        latitude: a.latitude + t * (b.latitude - a.latitude),
        longitude: a.longitude + t * (b.longitude - a.longitude),
        elevation: None,
    }
}
