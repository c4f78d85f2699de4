use std::fmt;

use hike_tracker_lib::track_record::TrackRecord;

/// Error reported by the durable-storage collaborator.
#[derive(Debug)]
pub struct SinkError(pub String);

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SinkError {}

/// Durable sink for finalized track records.
///
/// `save` must not return before the record is durable (or an error is
/// reported), and returns the id the store assigned. The engine never
/// retries; that policy belongs to the caller.
#[allow(async_fn_in_trait)]
pub trait TrackSink: Send + Sync {
    async fn save(&self, record: &TrackRecord) -> Result<i64, SinkError>;
}
