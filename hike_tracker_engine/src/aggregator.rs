use chrono::{DateTime, Utc};
use hike_tracker_lib::{coordinate::Coordinate, sample::Sample, track_stats::TrackStats};

use crate::geo_math;

/// Running aggregates for one recording session.
///
/// Owned by exactly one session and mutated only through [`accept`] and
/// [`refresh`]. Samples must already have passed the
/// [`SampleFilter`](crate::sample_filter::SampleFilter).
///
/// [`accept`]: TrackAggregator::accept
/// [`refresh`]: TrackAggregator::refresh
pub struct TrackAggregator {
    stats: TrackStats,
    samples: Vec<Sample>,
}

impl TrackAggregator {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            stats: TrackStats::new(start_time),
            samples: Vec::new(),
        }
    }

    /// Folds an accepted sample into the running aggregates.
    pub fn accept(&mut self, sample: Sample) {
        if let Some(previous) = self.samples.last() {
            // Odometer semantics: distance only grows, backtracking included
            self.stats.total_distance_m +=
                geo_math::distance(&previous.coordinate, &sample.coordinate);

            if let (Some(previous_elevation), Some(elevation)) =
                (previous.coordinate.elevation, sample.coordinate.elevation)
            {
                let delta = elevation - previous_elevation;
                if delta > 0.0 {
                    self.stats.total_elevation_gain_m += delta;
                }
            }
        }

        if let Some(speed) = sample.speed {
            let speed_kmh = speed * 3.6;
            if speed_kmh > self.stats.max_speed_kmh {
                self.stats.max_speed_kmh = speed_kmh;
            }
        }

        if let Some(elevation) = sample.coordinate.elevation {
            self.stats.max_elevation_m =
                Some(self.stats.max_elevation_m.map_or(elevation, |max| max.max(elevation)));
            self.stats.min_elevation_m =
                Some(self.stats.min_elevation_m.map_or(elevation, |min| min.min(elevation)));
        }

        let timestamp = sample.timestamp;
        self.stats.sample_count += 1;
        self.stats.last_sample_time = Some(timestamp);
        self.samples.push(sample);

        self.refresh(timestamp);
    }

    /// Recomputes the elapsed-time-derived statistics without a new sample.
    /// Driven by the session tick between fixes.
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        let elapsed_s = (now - self.stats.start_time).num_milliseconds() as f64 / 1000.0;
        if elapsed_s > 0.0 && self.stats.total_distance_m > 0.0 {
            self.stats.average_speed_kmh =
                (self.stats.total_distance_m / 1000.0) / (elapsed_s / 3600.0);
        }
    }

    pub fn last_sample(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn last_position(&self) -> Option<&Coordinate> {
        self.samples.last().map(|sample| &sample.coordinate)
    }

    /// Point-in-time copy of the running statistics.
    pub fn snapshot(&self) -> TrackStats {
        self.stats.clone()
    }

    /// Consumes the aggregator, yielding the accepted samples in order.
    pub fn into_points(self) -> Vec<Sample> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn base_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn sample(latitude: f64, longitude: f64, elevation: f64, offset_s: i64) -> Sample {
        Sample::new(
            Coordinate::with_elevation(latitude, longitude, elevation),
            base_time() + TimeDelta::seconds(offset_s),
            None,
            None,
        )
    }

    #[test]
    fn empty_aggregator_is_all_zero() {
        let aggregator = TrackAggregator::new(base_time());
        let stats = aggregator.snapshot();
        assert_eq!(stats.total_distance_m, 0.0);
        assert_eq!(stats.average_speed_kmh, 0.0);
        assert_eq!(stats.total_elevation_gain_m, 0.0);
        assert_eq!(stats.sample_count, 0);
        assert_eq!(stats.max_elevation_m, None);
        assert_eq!(stats.min_elevation_m, None);
    }

    #[test]
    fn single_sample_has_no_distance_or_gain() {
        let mut aggregator = TrackAggregator::new(base_time());
        aggregator.accept(sample(0.0, 0.0, 100.0, 10));
        let stats = aggregator.snapshot();
        assert_eq!(stats.total_distance_m, 0.0);
        assert_eq!(stats.total_elevation_gain_m, 0.0);
        assert_eq!(stats.sample_count, 1);
        assert_eq!(stats.max_elevation_m, Some(100.0));
        assert_eq!(stats.min_elevation_m, Some(100.0));
    }

    #[test]
    fn distance_matches_pairwise_sum_and_is_monotonic() {
        let points = [
            (0.0, 0.0),
            (0.0, 0.0005),
            (0.0005, 0.0005),
            (0.0, 0.0005), // backtrack
        ];

        let mut aggregator = TrackAggregator::new(base_time());
        let mut expected = 0.0;
        let mut last_total = 0.0;
        let mut previous: Option<Coordinate> = None;

        for (i, (lat, lon)) in points.iter().enumerate() {
            let coordinate = Coordinate::new(*lat, *lon);
            if let Some(prev) = previous {
                expected += geo_math::distance(&prev, &coordinate);
            }
            previous = Some(coordinate);

            aggregator.accept(Sample::new(
                coordinate,
                base_time() + TimeDelta::seconds(10 * (i as i64 + 1)),
                None,
                None,
            ));

            let total = aggregator.snapshot().total_distance_m;
            assert!(total >= last_total, "odometer went backwards");
            last_total = total;
        }

        assert!((aggregator.snapshot().total_distance_m - expected).abs() < 1e-9);
        // The backtrack leg still added distance
        assert!(expected > 100.0);
    }

    #[test]
    fn descents_do_not_reduce_elevation_gain() {
        let mut aggregator = TrackAggregator::new(base_time());
        for (i, elevation) in [500.0, 400.0, 300.0, 200.0].into_iter().enumerate() {
            aggregator.accept(sample(0.0, 0.0001 * i as f64, elevation, 10 * (i as i64 + 1)));
        }
        assert_eq!(aggregator.snapshot().total_elevation_gain_m, 0.0);
    }

    #[test]
    fn max_speed_tracks_largest_observed() {
        let mut aggregator = TrackAggregator::new(base_time());
        for (i, speed) in [Some(1.0), Some(2.5), None, Some(1.5)].into_iter().enumerate() {
            aggregator.accept(Sample::new(
                Coordinate::new(0.0, 0.0001 * i as f64),
                base_time() + TimeDelta::seconds(10 * (i as i64 + 1)),
                speed,
                None,
            ));
        }
        // 2.5 m/s = 9 km/h
        assert!((aggregator.snapshot().max_speed_kmh - 9.0).abs() < 1e-9);
    }

    #[test]
    fn hundred_meters_east_with_descent() {
        let mut aggregator = TrackAggregator::new(base_time());
        aggregator.accept(sample(0.0, 0.0, 0.0, 0));
        aggregator.accept(sample(0.0, 0.0009, 10.0, 10));
        aggregator.accept(sample(0.0, 0.0009, 5.0, 20));

        let stats = aggregator.snapshot();
        assert!(
            (stats.total_distance_m - 100.0).abs() < 1.0,
            "expected ~100 m, got {:.2}",
            stats.total_distance_m
        );
        assert!((stats.total_elevation_gain_m - 10.0).abs() < 1e-9);
        assert_eq!(stats.min_elevation_m, Some(0.0));
        assert_eq!(stats.max_elevation_m, Some(10.0));
        assert_eq!(stats.sample_count, 3);
    }

    #[test]
    fn average_speed_uses_elapsed_time() {
        let mut aggregator = TrackAggregator::new(base_time());
        aggregator.accept(sample(0.0, 0.0, 0.0, 0));
        // ~100 m east after 60 s
        aggregator.accept(sample(0.0, 0.0009, 0.0, 60));

        let average = aggregator.snapshot().average_speed_kmh;
        // ~100 m in 60 s is ~6 km/h
        assert!((average - 6.0).abs() < 0.1, "got {average}");

        // Another minute without movement halves it
        aggregator.refresh(base_time() + TimeDelta::seconds(120));
        let average = aggregator.snapshot().average_speed_kmh;
        assert!((average - 3.0).abs() < 0.1, "got {average}");
    }
}
