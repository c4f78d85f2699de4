use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;

/// One timestamped location fix as delivered by the sensor.
///
/// Never mutated after creation; ownership moves into the aggregates once
/// the fix passes filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
    /// Meters per second. Sensors report negative speeds for invalid
    /// readings, so construction normalizes those to `None`.
    pub speed: Option<f64>,
    /// Estimated horizontal error radius in meters, when the sensor
    /// reports one.
    pub horizontal_accuracy: Option<f64>,
}

impl Sample {
    pub fn new(
        coordinate: Coordinate,
        timestamp: DateTime<Utc>,
        speed: Option<f64>,
        horizontal_accuracy: Option<f64>,
    ) -> Self {
        Self {
            coordinate,
            timestamp,
            speed: speed.filter(|speed| *speed >= 0.0),
            horizontal_accuracy,
        }
    }
}
