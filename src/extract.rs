//! Buckets Point records into timestamp-aligned metric series.

use crate::model::{MetricKind, MetricSeries, Record};
use anyhow::{anyhow, Context, Result};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Parse a k6 timestamp. A trailing `Z` is rewritten to an explicit `+00:00`.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime> {
    let normalized = match raw.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => raw.to_string(),
    };
    OffsetDateTime::parse(&normalized, &Rfc3339).with_context(|| format!("invalid timestamp {raw:?}"))
}

/// Walk `records` in order and build the four aligned series.
///
/// Every Point record appends one timestamp and exactly one value to each
/// series: the matching series gets the record's value, the others repeat
/// their last value (0 when empty). Unrecognized metrics only repeat.
pub fn extract_metrics(records: &[Record]) -> Result<MetricSeries> {
    let mut out = MetricSeries::default();

    for (idx, record) in records.iter().enumerate() {
        if !record.is_point() {
            continue;
        }
        let raw_time = record
            .time
            .as_deref()
            .ok_or_else(|| anyhow!("point record {} has no time", idx + 1))?;
        let timestamp =
            parse_timestamp(raw_time).with_context(|| format!("point record {}", idx + 1))?;
        out.timestamps.push(timestamp);

        let value = record.value();
        let kind = MetricKind::from_name(record.metric.as_deref().unwrap_or_default());
        match kind {
            MetricKind::HttpReqs => {
                out.http_reqs.observe(value);
                out.http_req_durations.carry_forward();
                out.http_req_failed.carry_forward();
                out.vus.carry_forward();
            }
            MetricKind::HttpReqDuration => {
                out.http_reqs.carry_forward();
                out.http_req_durations.observe(value);
                out.http_req_failed.carry_forward();
                out.vus.carry_forward();
            }
            MetricKind::HttpReqFailed => {
                out.http_reqs.carry_forward();
                out.http_req_durations.carry_forward();
                out.http_req_failed.observe(value);
                out.vus.carry_forward();
            }
            MetricKind::Vus => {
                out.http_reqs.carry_forward();
                out.http_req_durations.carry_forward();
                out.http_req_failed.carry_forward();
                out.vus.observe(value);
            }
            MetricKind::Other(name) => {
                tracing::trace!(metric = %name, "untracked metric, carrying series forward");
                out.http_reqs.carry_forward();
                out.http_req_durations.carry_forward();
                out.http_req_failed.carry_forward();
                out.vus.carry_forward();
            }
        }
    }

    debug_assert!([
        out.http_reqs.len(),
        out.http_req_durations.len(),
        out.http_req_failed.len(),
        out.vus.len(),
    ]
    .iter()
    .all(|&n| n == out.timestamps.len()));

    Ok(out)
}
