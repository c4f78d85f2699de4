use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{sample::Sample, track_stats::TrackStats};

/// The finalized, immutable result of one recording session.
///
/// Points are a first-class ordered sequence; serializing them (for
/// storage or export) is an explicit operation, never a hidden blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub record_id: i64,
    pub route_id: Option<i64>,
    pub route_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub stats: TrackStats,
    pub points: Vec<Sample>,
}

impl TrackRecord {
    /// Sentinel until the storage collaborator assigns a real id.
    pub const UNSAVED_ID: i64 = -1;

    pub fn new(
        record_id: i64,
        route_id: Option<i64>,
        route_name: Option<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        stats: TrackStats,
        points: Vec<Sample>,
    ) -> Self {
        Self {
            record_id,
            route_id,
            route_name,
            start_time,
            end_time,
            stats,
            points,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// `h:mm:ss`, or `m:ss` for sub-hour sessions.
    pub fn format_duration(&self) -> String {
        let total_seconds = self.duration().num_seconds().max(0);
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{}:{:02}", minutes, seconds)
        }
    }
}
