//! Text summary builder for the `<name>_summary.txt` report.
//!
//! Statistics blocks are only present when their source series has data; the
//! rendered text omits absent blocks entirely.

use crate::metrics;
use crate::model::{
    DerivedSeries, ErrorStats, LoadStats, LoadSummary, MetricSeries, ResponseTimeStats,
    ThroughputStats,
};

/// Compute the per-run statistics.
pub(crate) fn build_load_summary(
    test_name: &str,
    series: &MetricSeries,
    derived: &DerivedSeries,
) -> LoadSummary {
    let durations = &series.http_req_durations.samples;
    let response_time = match (
        metrics::mean(durations),
        metrics::percentile(durations, 50.0),
        metrics::percentile(durations, 95.0),
        metrics::percentile(durations, 99.0),
        metrics::max(durations),
    ) {
        (Some(mean_ms), Some(p50_ms), Some(p95_ms), Some(p99_ms), Some(max_ms)) => {
            Some(ResponseTimeStats {
                mean_ms,
                p50_ms,
                p95_ms,
                p99_ms,
                max_ms,
            })
        }
        _ => None,
    };

    let throughput = metrics::mean(&derived.rps)
        .zip(metrics::max(&derived.rps))
        .map(|(mean_rps, max_rps)| ThroughputStats { mean_rps, max_rps });

    let errors = metrics::mean(&derived.error_rate)
        .zip(metrics::max(&derived.error_rate))
        .map(|(mean_pct, max_pct)| ErrorStats { mean_pct, max_pct });

    let vus = &series.vus.samples;
    let load = metrics::max(vus)
        .zip(metrics::mean(vus))
        .map(|(max_vus, mean_vus)| LoadStats { max_vus, mean_vus });

    LoadSummary {
        test_name: test_name.to_string(),
        timestamps: series.len(),
        response_time,
        throughput,
        errors,
        load,
    }
}

/// Format the summary as the plain-text report.
pub(crate) fn render_text(summary: &LoadSummary) -> String {
    let mut lines = vec![
        format!("k6 Load Test Summary - {}", summary.test_name),
        "=".repeat(50),
        String::new(),
    ];

    if let Some(rt) = summary.response_time {
        lines.push("Response Time Stats:".to_string());
        lines.push(format!("  Average: {:.2} ms", rt.mean_ms));
        lines.push(format!("  P50: {:.2} ms", rt.p50_ms));
        lines.push(format!("  P95: {:.2} ms", rt.p95_ms));
        lines.push(format!("  P99: {:.2} ms", rt.p99_ms));
        lines.push(format!("  Max: {:.2} ms", rt.max_ms));
        lines.push(String::new());
    }

    if let Some(tp) = summary.throughput {
        lines.push("Throughput Stats:".to_string());
        lines.push(format!("  Average RPS: {:.2}", tp.mean_rps));
        lines.push(format!("  Max RPS: {:.2}", tp.max_rps));
        lines.push(String::new());
    }

    if let Some(err) = summary.errors {
        lines.push("Error Stats:".to_string());
        lines.push(format!("  Average Error Rate: {:.2}%", err.mean_pct));
        lines.push(format!("  Max Error Rate: {:.2}%", err.max_pct));
        lines.push(String::new());
    }

    if let Some(load) = summary.load {
        lines.push("Load Stats:".to_string());
        // Plain Display: whole VU counts print without a decimal part.
        lines.push(format!("  Max VUs: {}", load.max_vus));
        lines.push(format!("  Average VUs: {:.1}", load.mean_vus));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
