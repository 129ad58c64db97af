use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One line of k6 JSON output.
///
/// Every field is optional so any JSON object parses; k6 also emits `Metric`
/// declaration lines that carry no `time` or `value`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Record {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub data: Option<PointData>,
}

/// A non-numeric `value` fails the whole line, which is then skipped like any
/// other malformed line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PointData {
    #[serde(default)]
    pub value: Option<f64>,
}

impl Record {
    pub fn is_point(&self) -> bool {
        self.kind.as_deref() == Some("Point")
    }

    /// `data.value`, or 0 when absent.
    pub fn value(&self) -> f64 {
        self.data.as_ref().and_then(|d| d.value).unwrap_or(0.0)
    }
}

/// The metric names the extractor tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricKind {
    HttpReqs,
    HttpReqDuration,
    HttpReqFailed,
    Vus,
    Other(String),
}

impl MetricKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "http_reqs" => MetricKind::HttpReqs,
            "http_req_duration" => MetricKind::HttpReqDuration,
            "http_req_failed" => MetricKind::HttpReqFailed,
            "vus" => MetricKind::Vus,
            other => MetricKind::Other(other.to_string()),
        }
    }
}

/// A series aligned to the timestamp list, plus the values actually observed
/// for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub values: Vec<f64>,
    pub samples: Vec<f64>,
}

impl Series {
    /// Append a real observation.
    pub fn observe(&mut self, value: f64) {
        self.values.push(value);
        self.samples.push(value);
    }

    /// Append the previous aligned value, or 0 if there is none.
    pub fn carry_forward(&mut self) {
        let last = self.values.last().copied().unwrap_or(0.0);
        self.values.push(last);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSeries {
    pub timestamps: Vec<OffsetDateTime>,
    pub http_reqs: Series,
    pub http_req_durations: Series,
    pub http_req_failed: Series,
    pub vus: Series,
}

impl MetricSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Seconds since the first timestamp, for plotting.
    pub fn elapsed_secs(&self) -> Vec<f64> {
        let Some(first) = self.timestamps.first().copied() else {
            return Vec::new();
        };
        self.timestamps
            .iter()
            .map(|t| (*t - first).as_seconds_f64())
            .collect()
    }
}

/// Series computed from a `MetricSeries`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedSeries {
    pub rps: Vec<f64>,
    pub error_rate: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponseTimeStats {
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThroughputStats {
    pub mean_rps: f64,
    pub max_rps: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorStats {
    pub mean_pct: f64,
    pub max_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadStats {
    pub max_vus: f64,
    pub mean_vus: f64,
}

/// Per-run statistics. A block is `None` when its source series has no data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSummary {
    pub test_name: String,
    pub timestamps: usize,
    pub response_time: Option<ResponseTimeStats>,
    pub throughput: Option<ThroughputStats>,
    pub errors: Option<ErrorStats>,
    pub load: Option<LoadStats>,
}
