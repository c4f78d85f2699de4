use std::time::Duration;

/// Tunables for the tracking engine.
///
/// Every threshold here is a terrain-dependent tradeoff, so they are
/// configuration rather than constants. The defaults suit hiking.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Samples reporting a horizontal accuracy worse than this are dropped.
    pub max_horizontal_accuracy_m: f64,
    /// Implied speeds above this are treated as GPS jumps and dropped.
    /// 15 m/s is generous for hiking.
    pub implausible_speed_mps: f64,
    /// Distance from the planned route at which a position counts as
    /// off-route. Too tight and GPS jitter on a narrow trail raises false
    /// alarms; too loose and genuine wrong turns go unnoticed.
    pub off_route_threshold_m: f64,
    /// Cadence of the statistics/deviation tick while a session is active.
    pub tick_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_horizontal_accuracy_m: 50.0,
            implausible_speed_mps: 15.0,
            off_route_threshold_m: 200.0,
            tick_interval: Duration::from_secs(1),
        }
    }
}
