use std::path::PathBuf;

use hike_tracker_engine::store::{SinkError, TrackSink};
use hike_tracker_lib::track_record::TrackRecord;

use crate::{DATA_DIR, DataManagerError, database::db::TrackDatabase};

#[derive(Clone)]
pub struct DataManager {
    pub(crate) database: TrackDatabase,
}

/// The public interface for all track record storage.
impl DataManager {
    pub async fn start() -> Result<Self, DataManagerError> {
        // Create data dir if it doesn't exist
        let root: PathBuf = project_root::get_project_root()
            .map_err(|err| DataManagerError::Database(format!("Failed to locate project root: {err}")))?;
        let data_dir = root.join(DATA_DIR);
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir)
                .map_err(|_| DataManagerError::Database(format!("Failed to create data directory: {:?}", data_dir)))?;
        }

        let database = TrackDatabase::connect().await?;

        Ok(DataManager { database })
    }

    /// Backed by an in-memory database. Used by tests.
    pub async fn start_in_memory() -> Result<Self, DataManagerError> {
        let database = TrackDatabase::connect_in_memory().await?;
        Ok(DataManager { database })
    }

    /// Stores a finalized record; durable once this returns. Returns the
    /// assigned record id.
    pub async fn save_record(&self, record: &TrackRecord) -> Result<i64, DataManagerError> {
        let record_id = self.database.insert_track_record(record).await?;
        tracing::info!(record_id, points = record.points.len(), "track record saved");
        Ok(record_id)
    }

    pub async fn get_record(&self, record_id: i64) -> Result<TrackRecord, DataManagerError> {
        self.database.get_track_record(record_id).await
    }

    /// All stored records, newest hike first.
    pub async fn list_records(&self) -> Result<Vec<TrackRecord>, DataManagerError> {
        self.database.list_track_records().await
    }

    pub async fn delete_record(&self, record_id: i64) -> Result<(), DataManagerError> {
        self.database.delete_track_record(record_id).await?;
        tracing::info!(record_id, "track record deleted");
        Ok(())
    }
}

impl TrackSink for DataManager {
    async fn save(&self, record: &TrackRecord) -> Result<i64, SinkError> {
        self.save_record(record)
            .await
            .map_err(|err| SinkError(err.to_string()))
    }
}
