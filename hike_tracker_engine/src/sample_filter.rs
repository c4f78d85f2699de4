use hike_tracker_lib::sample::Sample;

use crate::{config::TrackerConfig, geo_math};

/// Gates raw location fixes before they reach the aggregates.
///
/// Rejection is a normal outcome, not an error: a dropped sample is simply
/// never seen downstream. Callers may count rejections for diagnostics.
#[derive(Debug, Clone)]
pub struct SampleFilter {
    max_horizontal_accuracy_m: f64,
    implausible_speed_mps: f64,
}

impl SampleFilter {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            max_horizontal_accuracy_m: config.max_horizontal_accuracy_m,
            implausible_speed_mps: config.implausible_speed_mps,
        }
    }

    /// True if `candidate` should be fed into the aggregates.
    ///
    /// Pure predicate: rejects out-of-range coordinates, fixes with a
    /// horizontal accuracy above the gate, non-advancing timestamps, and
    /// jumps whose implied speed exceeds the plausibility ceiling.
    pub fn accept(&self, candidate: &Sample, previous: Option<&Sample>) -> bool {
        if !candidate.coordinate.is_valid() {
            return false;
        }

        if let Some(accuracy) = candidate.horizontal_accuracy {
            if accuracy > self.max_horizontal_accuracy_m {
                return false;
            }
        }

        if let Some(previous) = previous {
            let dt = (candidate.timestamp - previous.timestamp).num_milliseconds() as f64 / 1000.0;
            if dt <= 0.0 {
                // Out-of-order or duplicate timestamp
                return false;
            }

            let implied_speed =
                geo_math::distance(&previous.coordinate, &candidate.coordinate) / dt;
            if implied_speed > self.implausible_speed_mps {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, Utc};
    use hike_tracker_lib::coordinate::Coordinate;

    use super::*;

    fn filter() -> SampleFilter {
        SampleFilter::new(&TrackerConfig::default())
    }

    fn base_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn sample_at(latitude: f64, longitude: f64, offset_s: i64) -> Sample {
        Sample::new(
            Coordinate::new(latitude, longitude),
            base_time() + TimeDelta::seconds(offset_s),
            None,
            None,
        )
    }

    #[test]
    fn accepts_first_sample() {
        assert!(filter().accept(&sample_at(22.3, 114.2, 0), None));
    }

    #[test]
    fn rejects_out_of_range_coordinate() {
        assert!(!filter().accept(&sample_at(91.0, 0.0, 0), None));
        assert!(!filter().accept(&sample_at(0.0, 181.0, 0), None));
    }

    #[test]
    fn rejects_poor_accuracy() {
        let mut candidate = sample_at(22.3, 114.2, 0);
        candidate.horizontal_accuracy = Some(80.0);
        assert!(!filter().accept(&candidate, None));

        candidate.horizontal_accuracy = Some(20.0);
        assert!(filter().accept(&candidate, None));
    }

    #[test]
    fn rejects_non_advancing_timestamp() {
        let previous = sample_at(22.3, 114.2, 10);
        let duplicate = sample_at(22.3001, 114.2, 10);
        let backwards = sample_at(22.3001, 114.2, 5);
        assert!(!filter().accept(&duplicate, Some(&previous)));
        assert!(!filter().accept(&backwards, Some(&previous)));
    }

    #[test]
    fn rejects_implausible_jump() {
        let previous = sample_at(22.3, 114.2, 0);
        // ~1.1 km in one second
        let jump = sample_at(22.31, 114.2, 1);
        assert!(!filter().accept(&jump, Some(&previous)));
    }

    #[test]
    fn accepts_plausible_movement() {
        let previous = sample_at(22.3, 114.2, 0);
        // ~11 m in ten seconds
        let next = sample_at(22.3001, 114.2, 10);
        assert!(filter().accept(&next, Some(&previous)));
    }
}
