use std::path::PathBuf;

use chrono::{DateTime, Utc};
use const_format::concatcp;
use hike_tracker_lib::{
    coordinate::Coordinate, sample::Sample, track_record::TrackRecord, track_stats::TrackStats,
};
use sqlx::{
    Executor, Pool, Row, Sqlite, SqlitePool, query, query_as,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
};

use super::constants::*;
use crate::{DATABASE_PATH, DataManagerError};

#[derive(Clone)]
pub struct TrackDatabase {
    pool: Pool<Sqlite>,
}

impl TrackDatabase {
    pub async fn connect() -> Result<Self, DataManagerError> {
        let root: PathBuf = project_root::get_project_root()
            .map_err(|err| DataManagerError::Database(format!("Failed to locate project root: {err}")))?;
        let options = SqliteConnectOptions::new()
            .filename(root.join(DATABASE_PATH))
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|err| DataManagerError::Database(format!("Failed to connect to database: {err}")))?;

        Self::init(pool).await
    }

    /// One shared in-memory database. Used by tests.
    pub async fn connect_in_memory() -> Result<Self, DataManagerError> {
        let options = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true);

        // A single connection, otherwise every pool checkout would see its
        // own empty memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|err| DataManagerError::Database(format!("Failed to open in-memory database: {err}")))?;

        Self::init(pool).await
    }

    async fn init(pool: Pool<Sqlite>) -> Result<Self, DataManagerError> {
        pool.execute(concatcp!("
            CREATE TABLE IF NOT EXISTS ", TRACK_RECORDS_TABLE_NAME, "(",
                RECORD_ID,              " INTEGER PRIMARY KEY AUTOINCREMENT,",
                ROUTE_ID,               " INTEGER,",
                ROUTE_NAME,             " TEXT,",
                START_TIME,             " TIMESTAMP NOT NULL,",
                END_TIME,               " TIMESTAMP NOT NULL,",
                TOTAL_DISTANCE_M,       " REAL NOT NULL,",
                MAX_SPEED_KMH,          " REAL NOT NULL,",
                AVERAGE_SPEED_KMH,      " REAL NOT NULL,",
                MAX_ELEVATION_M,        " REAL,",
                MIN_ELEVATION_M,        " REAL,",
                TOTAL_ELEVATION_GAIN_M, " REAL NOT NULL);

            CREATE TABLE IF NOT EXISTS ", TRACK_POINTS_TABLE_NAME, "(",
                RECORD_ID,           " INTEGER NOT NULL,",
                POINT_INDEX,         " INTEGER NOT NULL,",
                LATITUDE,            " REAL NOT NULL,",
                LONGITUDE,           " REAL NOT NULL,",
                ELEVATION,           " REAL,",
                TIMESTAMP,           " TIMESTAMP NOT NULL,",
                SPEED,               " REAL,",
                HORIZONTAL_ACCURACY, " REAL,
                PRIMARY KEY(", RECORD_ID, ", ", POINT_INDEX, "),
                FOREIGN KEY(", RECORD_ID, ") REFERENCES ", TRACK_RECORDS_TABLE_NAME, "(", RECORD_ID, ") ON DELETE CASCADE
            )"))
            .await
            .map_err(|err| DataManagerError::Database(format!("Failed to create tables: {err}")))?;

        Ok(Self { pool })
    }

    pub async fn insert_track_record(&self, record: &TrackRecord) -> Result<i64, DataManagerError> {
        let mut tx = self.pool.begin().await
            .map_err(|err| DataManagerError::Database(format!("Failed to begin transaction: {err}")))?;

        let record_id = query_as::<_, (i64,)>(concatcp!("
            INSERT INTO ", TRACK_RECORDS_TABLE_NAME, "(",
            RECORD_ID, ", ", ROUTE_ID, ", ", ROUTE_NAME, ", ", START_TIME, ", ", END_TIME, ", ",
            TOTAL_DISTANCE_M, ", ", MAX_SPEED_KMH, ", ", AVERAGE_SPEED_KMH, ", ",
            MAX_ELEVATION_M, ", ", MIN_ELEVATION_M, ", ", TOTAL_ELEVATION_GAIN_M, ")
            VALUES (NULL, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) RETURNING ", RECORD_ID))
            .bind(record.route_id)
            .bind(&record.route_name)
            .bind(record.start_time)
            .bind(record.end_time)
            .bind(record.stats.total_distance_m)
            .bind(record.stats.max_speed_kmh)
            .bind(record.stats.average_speed_kmh)
            .bind(record.stats.max_elevation_m)
            .bind(record.stats.min_elevation_m)
            .bind(record.stats.total_elevation_gain_m)
            .fetch_one(&mut *tx).await
            .map_err(|err| DataManagerError::Database(format!("Failed to insert track record: {err}")))?
            .0;

        for (index, point) in record.points.iter().enumerate() {
            query(concatcp!("
                INSERT INTO ", TRACK_POINTS_TABLE_NAME, "(",
                RECORD_ID, ", ", POINT_INDEX, ", ", LATITUDE, ", ", LONGITUDE, ", ",
                ELEVATION, ", ", TIMESTAMP, ", ", SPEED, ", ", HORIZONTAL_ACCURACY, ")
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"))
                .bind(record_id)
                .bind(index as i64)
                .bind(point.coordinate.latitude)
                .bind(point.coordinate.longitude)
                .bind(point.coordinate.elevation)
                .bind(point.timestamp)
                .bind(point.speed)
                .bind(point.horizontal_accuracy)
                .execute(&mut *tx).await
                .map_err(|err| DataManagerError::Database(format!("Failed to insert track point: {err}")))?;
        }

        tx.commit().await
            .map_err(|err| DataManagerError::Database(format!("Failed to commit track record: {err}")))?;

        Ok(record_id)
    }

    pub async fn get_track_record(&self, record_id: i64) -> Result<TrackRecord, DataManagerError> {
        let row = query(concatcp!(
            "SELECT * FROM ", TRACK_RECORDS_TABLE_NAME, " WHERE ", RECORD_ID, " = ?1"))
            .bind(record_id)
            .fetch_one(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to get track record {record_id}: {err}")))?;

        let points = self.get_track_points(record_id).await?;
        record_from_row(&row, points)
    }

    /// All records, newest hike first.
    pub async fn list_track_records(&self) -> Result<Vec<TrackRecord>, DataManagerError> {
        let rows = query(concatcp!(
            "SELECT * FROM ", TRACK_RECORDS_TABLE_NAME, " ORDER BY ", START_TIME, " DESC"))
            .fetch_all(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to list track records: {err}")))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let record_id: i64 = row
                .try_get(RECORD_ID)
                .map_err(|err| DataManagerError::Database(format!("Failed to read record id: {err}")))?;
            let points = self.get_track_points(record_id).await?;
            records.push(record_from_row(&row, points)?);
        }

        Ok(records)
    }

    pub async fn delete_track_record(&self, record_id: i64) -> Result<(), DataManagerError> {
        let result = query(concatcp!(
            "DELETE FROM ", TRACK_RECORDS_TABLE_NAME, " WHERE ", RECORD_ID, " = ?1"))
            .bind(record_id)
            .execute(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to delete track record {record_id}: {err}")))?;

        if result.rows_affected() == 0 {
            return Err(DataManagerError::Database(format!(
                "No track record with id {record_id}"
            )));
        }

        Ok(())
    }

    async fn get_track_points(&self, record_id: i64) -> Result<Vec<Sample>, DataManagerError> {
        let rows = query(concatcp!(
            "SELECT * FROM ", TRACK_POINTS_TABLE_NAME,
            " WHERE ", RECORD_ID, " = ?1 ORDER BY ", POINT_INDEX))
            .bind(record_id)
            .fetch_all(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to get track points for record {record_id}: {err}")))?;

        rows.iter().map(sample_from_row).collect()
    }
}

fn sample_from_row(row: &SqliteRow) -> Result<Sample, DataManagerError> {
    let read = |err| DataManagerError::Database(format!("Failed to read track point column: {err}"));

    let coordinate = Coordinate {
        latitude: row.try_get(LATITUDE).map_err(read)?,
        longitude: row.try_get(LONGITUDE).map_err(read)?,
        elevation: row.try_get(ELEVATION).map_err(read)?,
    };

    Ok(Sample::new(
        coordinate,
        row.try_get(TIMESTAMP).map_err(read)?,
        row.try_get(SPEED).map_err(read)?,
        row.try_get(HORIZONTAL_ACCURACY).map_err(read)?,
    ))
}

fn record_from_row(row: &SqliteRow, points: Vec<Sample>) -> Result<TrackRecord, DataManagerError> {
    let read = |err| DataManagerError::Database(format!("Failed to read track record column: {err}"));

    let start_time: DateTime<Utc> = row.try_get(START_TIME).map_err(read)?;

    // sample_count and last_sample_time are derivable, so they are not
    // stored as columns
    let stats = TrackStats {
        total_distance_m: row.try_get(TOTAL_DISTANCE_M).map_err(read)?,
        max_speed_kmh: row.try_get(MAX_SPEED_KMH).map_err(read)?,
        average_speed_kmh: row.try_get(AVERAGE_SPEED_KMH).map_err(read)?,
        max_elevation_m: row.try_get(MAX_ELEVATION_M).map_err(read)?,
        min_elevation_m: row.try_get(MIN_ELEVATION_M).map_err(read)?,
        total_elevation_gain_m: row.try_get(TOTAL_ELEVATION_GAIN_M).map_err(read)?,
        sample_count: points.len(),
        start_time,
        last_sample_time: points.last().map(|point| point.timestamp),
    };

    Ok(TrackRecord::new(
        row.try_get(RECORD_ID).map_err(read)?,
        row.try_get(ROUTE_ID).map_err(read)?,
        row.try_get(ROUTE_NAME).map_err(read)?,
        start_time,
        row.try_get(END_TIME).map_err(read)?,
        stats,
        points,
    ))
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn base_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn test_record(start_offset_s: i64) -> TrackRecord {
        let start_time = base_time() + TimeDelta::seconds(start_offset_s);
        let points = vec![
            Sample::new(
                Coordinate::with_elevation(22.3344, 114.1953, 100.0),
                start_time,
                Some(1.0),
                Some(8.0),
            ),
            Sample::new(
                Coordinate::new(22.3354, 114.1953),
                start_time + TimeDelta::seconds(60),
                None,
                None,
            ),
        ];

        let mut stats = TrackStats::new(start_time);
        stats.total_distance_m = 111.3;
        stats.max_speed_kmh = 3.6;
        stats.average_speed_kmh = 6.7;
        stats.max_elevation_m = Some(100.0);
        stats.min_elevation_m = Some(100.0);
        stats.sample_count = points.len();
        stats.last_sample_time = points.last().map(|point| point.timestamp);

        TrackRecord::new(
            TrackRecord::UNSAVED_ID,
            Some(3),
            Some("Dragon's Back".to_string()),
            start_time,
            start_time + TimeDelta::seconds(120),
            stats,
            points,
        )
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let db = TrackDatabase::connect_in_memory().await.unwrap();

        let record = test_record(0);
        let record_id = db.insert_track_record(&record).await.unwrap();
        assert!(record_id > 0);

        let loaded = db.get_track_record(record_id).await.unwrap();
        assert_eq!(loaded.record_id, record_id);
        assert_eq!(loaded.route_id, record.route_id);
        assert_eq!(loaded.route_name, record.route_name);
        assert_eq!(loaded.start_time, record.start_time);
        assert_eq!(loaded.end_time, record.end_time);
        assert_eq!(loaded.points, record.points);
        assert_eq!(loaded.stats, record.stats);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let db = TrackDatabase::connect_in_memory().await.unwrap();

        let older = db.insert_track_record(&test_record(0)).await.unwrap();
        let newer = db.insert_track_record(&test_record(3600)).await.unwrap();

        let records = db.list_track_records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record_id, newer);
        assert_eq!(records[1].record_id, older);
    }

    #[tokio::test]
    async fn delete_removes_record_and_points() {
        let db = TrackDatabase::connect_in_memory().await.unwrap();

        let record_id = db.insert_track_record(&test_record(0)).await.unwrap();
        db.delete_track_record(record_id).await.unwrap();

        assert!(db.get_track_record(record_id).await.is_err());
        assert!(db.delete_track_record(record_id).await.is_err());
        assert!(db.list_track_records().await.unwrap().is_empty());
    }
}
