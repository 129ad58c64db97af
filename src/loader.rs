//! Reads k6 newline-delimited JSON output.

use crate::model::Record;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load every record from `path`, skipping lines that are not JSON objects.
///
/// The caller is expected to have checked that the file exists.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    parse_records(BufReader::new(file)).with_context(|| format!("read {}", path.display()))
}

/// Parse records from any line source, preserving input order.
pub fn parse_records<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut skipped = 0usize;
    for line in reader.lines() {
        let line = line?;
        match serde_json::from_str::<Record>(&line) {
            Ok(record) => records.push(record),
            Err(_) => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, "skipped malformed lines");
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn skips_malformed_lines_and_keeps_order() {
        let input = concat!(
            "{\"metric\":\"vus\"}\n",
            "NOTJSON\n",
            "{\"metric\":\"http_reqs\"}\n",
            "{\"metric\":\n",
            "{\"metric\":\"http_req_failed\"}",
        );
        let records = parse_records(Cursor::new(input)).unwrap();
        let metrics: Vec<_> = records.iter().map(|r| r.metric.as_deref()).collect();
        assert_eq!(
            metrics,
            vec![Some("vus"), Some("http_reqs"), Some("http_req_failed")]
        );
    }

    #[test]
    fn parses_point_fields() {
        let input = concat!(
            "{\"type\":\"Metric\",\"data\":{\"name\":\"vus\",\"type\":\"gauge\"},\"metric\":\"vus\"}\n",
            "\n",
            "{\"type\":\"Point\",\"data\":{\"time\":\"2024-05-01T10:00:00.5Z\",\"value\":12.5,\"tags\":null},",
            "\"metric\":\"http_req_duration\",\"time\":\"2024-05-01T10:00:00.5Z\"}\n",
            "[1,2,3]\n",
        );
        let records = parse_records(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records[0].is_point());
        assert_eq!(records[0].value(), 0.0);
        assert!(records[1].is_point());
        assert_eq!(records[1].metric.as_deref(), Some("http_req_duration"));
        assert_eq!(records[1].value(), 12.5);
    }

    #[test]
    fn non_numeric_value_skips_the_line() {
        let input = concat!(
            "{\"type\":\"Point\",\"metric\":\"vus\",\"time\":\"2024-05-01T10:00:00Z\",\"data\":{\"value\":\"ten\"}}\n",
            "{\"type\":\"Point\",\"metric\":\"vus\",\"time\":\"2024-05-01T10:00:01Z\",\"data\":{\"value\":{\"n\":1}}}\n",
            "{\"type\":\"Point\",\"metric\":\"vus\",\"time\":\"2024-05-01T10:00:02Z\",\"data\":{\"value\":3}}\n",
        );
        let records = parse_records(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].time.as_deref(), Some("2024-05-01T10:00:02Z"));
        assert_eq!(records[0].value(), 3.0);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, "{\"type\":\"Point\"}\nbroken\n").unwrap();
        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(&dir.path().join("nope.json")).unwrap_err();
        assert!(format!("{err:#}").contains("nope.json"));
    }
}
