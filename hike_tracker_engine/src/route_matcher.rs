use hike_tracker_lib::{coordinate::Coordinate, planned_route::PlannedRoute};

use crate::{config::TrackerConfig, geo_math};

/// Where the current position sits relative to the planned route.
///
/// Ephemeral observation state: recomputed on every evaluation and never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviationState {
    pub distance_to_route_m: f64,
    pub is_off_route: bool,
}

/// Compares positions against a planned route.
///
/// Stateless per call. The threshold comes from [`TrackerConfig`]; see the
/// notes there on tuning it.
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    off_route_threshold_m: f64,
}

impl RouteMatcher {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            off_route_threshold_m: config.off_route_threshold_m,
        }
    }

    /// `None` when the route has no geometry to deviate from.
    pub fn evaluate(&self, current: &Coordinate, route: &PlannedRoute) -> Option<DeviationState> {
        let distance_to_route_m = match route.waypoints.as_slice() {
            [] => return None,
            [only] => geo_math::distance(current, only),
            waypoints => geo_math::distance_to_polyline(current, waypoints),
        };

        Some(DeviationState {
            distance_to_route_m,
            is_off_route: distance_to_route_m > self.off_route_threshold_m,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> RouteMatcher {
        RouteMatcher::new(&TrackerConfig::default())
    }

    fn route(waypoints: Vec<Coordinate>) -> PlannedRoute {
        PlannedRoute::new(None, None, waypoints)
    }

    #[test]
    fn empty_route_has_no_deviation() {
        assert_eq!(
            matcher().evaluate(&Coordinate::new(0.0, 0.0), &route(Vec::new())),
            None
        );
    }

    #[test]
    fn on_waypoint_is_on_route() {
        let waypoint = Coordinate::new(22.3344, 114.1953);
        let route = route(vec![waypoint, Coordinate::new(22.3456, 114.2056)]);

        let deviation = matcher().evaluate(&waypoint, &route).unwrap();
        assert!(deviation.distance_to_route_m < 1.0);
        assert!(!deviation.is_off_route);
    }

    #[test]
    fn single_waypoint_route_uses_point_distance() {
        let waypoint = Coordinate::new(0.0, 0.0);
        let route = route(vec![waypoint]);

        // ~111 m north
        let deviation = matcher()
            .evaluate(&Coordinate::new(0.001, 0.0), &route)
            .unwrap();
        assert!((deviation.distance_to_route_m - 111.2).abs() < 2.0);
        assert!(!deviation.is_off_route);
    }

    #[test]
    fn five_hundred_meters_off_a_two_point_route() {
        let route = route(vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.01)]);
        // Due north of the segment middle, ~500 m
        let deviation = matcher()
            .evaluate(&Coordinate::new(0.0045, 0.005), &route)
            .unwrap();
        assert!(
            (deviation.distance_to_route_m - 500.0).abs() < 10.0,
            "got {:.0} m",
            deviation.distance_to_route_m
        );
        assert!(deviation.is_off_route);
    }

    #[test]
    fn threshold_is_configurable() {
        let config = TrackerConfig {
            off_route_threshold_m: 1000.0,
            ..TrackerConfig::default()
        };
        let matcher = RouteMatcher::new(&config);
        let route = route(vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.01)]);

        let deviation = matcher
            .evaluate(&Coordinate::new(0.0045, 0.005), &route)
            .unwrap();
        assert!(!deviation.is_off_route);
    }
}
