use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Running statistics for one recording session.
///
/// `total_distance_m` follows odometer semantics: it accumulates every
/// traveled meter and never nets out backtracking. `total_elevation_gain_m`
/// sums positive elevation deltas only, so descents never reduce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackStats {
    pub total_distance_m: f64,
    pub max_speed_kmh: f64,
    pub average_speed_kmh: f64,
    pub max_elevation_m: Option<f64>,
    pub min_elevation_m: Option<f64>,
    pub total_elevation_gain_m: f64,
    pub sample_count: usize,
    pub start_time: DateTime<Utc>,
    pub last_sample_time: Option<DateTime<Utc>>,
}

impl TrackStats {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            total_distance_m: 0.0,
            max_speed_kmh: 0.0,
            average_speed_kmh: 0.0,
            max_elevation_m: None,
            min_elevation_m: None,
            total_elevation_gain_m: 0.0,
            sample_count: 0,
            start_time,
            last_sample_time: None,
        }
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_m / 1000.0
    }
}
