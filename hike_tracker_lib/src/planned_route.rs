use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;

/// The route a hike is planned along: an ordered waypoint sequence,
/// possibly degenerate down to a single point or nothing at all.
///
/// Immutable once a session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    pub route_id: Option<i64>,
    pub name: Option<String>,
    pub waypoints: Vec<Coordinate>,
}

impl PlannedRoute {
    pub fn new(route_id: Option<i64>, name: Option<String>, waypoints: Vec<Coordinate>) -> Self {
        Self {
            route_id,
            name,
            waypoints,
        }
    }
}
