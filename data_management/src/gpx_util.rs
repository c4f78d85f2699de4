use std::{fs::File, io::BufReader, io::Read, path::PathBuf, str::FromStr};

use chrono::{DateTime, Utc};
use hike_tracker_engine::{aggregator::TrackAggregator, gpx::to_gpx};
use hike_tracker_lib::{coordinate::Coordinate, sample::Sample, track_record::TrackRecord};

use crate::{DataManager, DataManagerError};

impl DataManager {
    /// Imports a GPX file as a stored track record, recomputing the
    /// aggregates from its points. Returns the assigned record id.
    pub async fn import_gpx(&self, path: &str) -> Result<i64, DataManagerError> {
        let record = read_gpx(path)?;
        let record_id = self.save_record(&record).await?;
        tracing::info!(record_id, path, "GPX file imported");
        Ok(record_id)
    }

    /// Writes a stored record as a GPX file into `out_dir` and returns the
    /// file path.
    pub async fn export_gpx(&self, record_id: i64, out_dir: &str) -> Result<PathBuf, DataManagerError> {
        let record = self.get_record(record_id).await?;
        let gpx = to_gpx(&record);

        let name = record.route_name.as_deref().unwrap_or("track");
        let path = PathBuf::from(out_dir).join(format!("{}_{}.gpx", name, record.record_id));
        std::fs::write(&path, gpx)
            .map_err(|err| DataManagerError::GpxExport(format!("Failed to write {:?}: {err}", path)))?;

        tracing::info!(record_id, ?path, "GPX file exported");
        Ok(path)
    }
}

pub fn read_gpx(path: &str) -> Result<TrackRecord, DataManagerError> {
    let file = File::open(path)
        .map_err(|err| DataManagerError::GpxImport(format!("Failed to open {path}: {err}")))?;
    parse_gpx(BufReader::new(file))
}

/// Parses a GPX document into an unsaved track record, replaying its
/// points through the aggregator so the stats match a live recording of
/// the same track.
pub fn parse_gpx<R: Read>(reader: R) -> Result<TrackRecord, DataManagerError> {
    let gpx = gpx::read(reader)
        .map_err(|err| DataManagerError::GpxImport(format!("Failed to parse GPX: {err}")))?;

    let mut title = None;
    let mut fallback_time = DateTime::UNIX_EPOCH;
    if let Some(metadata) = gpx.metadata {
        title = metadata.name;
        if let Some(time) = metadata.time {
            fallback_time = parse_time(&time)?;
        }
    }

    let mut samples = Vec::new();
    for track in gpx.tracks {
        if title.is_none() {
            title = track.name.clone();
        }
        for segment in track.segments {
            for point in segment.points {
                let timestamp = match &point.time {
                    Some(time) => parse_time(time)?,
                    None => fallback_time,
                };

                let position = point.point();
                let coordinate = match point.elevation {
                    Some(elevation) => {
                        Coordinate::with_elevation(position.y(), position.x(), elevation)
                    }
                    None => Coordinate::new(position.y(), position.x()),
                };

                samples.push(Sample::new(coordinate, timestamp, point.speed, None));
            }
        }
    }

    let start_time = samples.first().map_or(fallback_time, |sample| sample.timestamp);
    let end_time = samples.last().map_or(fallback_time, |sample| sample.timestamp);

    let mut aggregator = TrackAggregator::new(start_time);
    for sample in samples {
        aggregator.accept(sample);
    }
    aggregator.refresh(end_time);
    let stats = aggregator.snapshot();

    Ok(TrackRecord::new(
        TrackRecord::UNSAVED_ID,
        None,
        title,
        start_time,
        end_time,
        stats,
        aggregator.into_points(),
    ))
}

fn parse_time(time: &gpx::Time) -> Result<DateTime<Utc>, DataManagerError> {
    let formatted = time
        .format()
        .map_err(|err| DataManagerError::GpxImport(format!("Unreadable timestamp: {err}")))?;
    DateTime::from_str(&formatted)
        .map_err(|err| DataManagerError::GpxImport(format!("Invalid timestamp {formatted}: {err}")))
}
