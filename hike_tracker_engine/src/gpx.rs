//! GPX 1.1 rendering for finalized track records.

use chrono::SecondsFormat;
use hike_tracker_lib::track_record::TrackRecord;

const CREATOR: &str = "hike_tracker";
const DEFAULT_NAME: &str = "Untitled Route";

/// Renders `record` as a GPX 1.1 document.
///
/// Deterministic and total: every well-formed record renders, including a
/// zero-point one (empty `<trkseg>`). Latitude/longitude keep full float
/// precision; timestamps are ISO-8601 UTC; per-point speed goes into a
/// `<speed>` extension and is omitted when absent.
pub fn to_gpx(record: &TrackRecord) -> String {
    let name = escape_xml(record.route_name.as_deref().unwrap_or(DEFAULT_NAME));
    let start_time = format_time(record);

    let mut gpx = String::new();
    gpx.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    gpx.push_str(&format!("<gpx version=\"1.1\" creator=\"{CREATOR}\">\n"));
    gpx.push_str("  <metadata>\n");
    gpx.push_str(&format!("    <name>{name}</name>\n"));
    gpx.push_str(&format!("    <time>{start_time}</time>\n"));
    gpx.push_str("  </metadata>\n");
    gpx.push_str("  <trk>\n");
    gpx.push_str(&format!("    <name>{name}</name>\n"));
    gpx.push_str("    <trkseg>\n");

    for point in &record.points {
        gpx.push_str(&format!(
            "      <trkpt lat=\"{}\" lon=\"{}\">\n",
            point.coordinate.latitude, point.coordinate.longitude
        ));
        if let Some(elevation) = point.coordinate.elevation {
            gpx.push_str(&format!("        <ele>{elevation}</ele>\n"));
        }
        gpx.push_str(&format!(
            "        <time>{}</time>\n",
            point.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        if let Some(speed) = point.speed {
            gpx.push_str(&format!(
                "        <extensions><speed>{speed}</speed></extensions>\n"
            ));
        }
        gpx.push_str("      </trkpt>\n");
    }

    gpx.push_str("    </trkseg>\n");
    gpx.push_str("  </trk>\n");
    gpx.push_str("</gpx>\n");
    gpx
}

fn format_time(record: &TrackRecord) -> String {
    record
        .start_time
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
