use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

fn k6_plot(args: &[&OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_k6-plot"))
        .args(args)
        .output()
        .expect("spawn k6-plot")
}

fn point(metric: &str, second: u32, value: f64) -> String {
    format!(
        "{{\"type\":\"Point\",\"data\":{{\"time\":\"2024-05-01T10:00:{second:02}.000000Z\",\"value\":{value},\"tags\":null}},\"metric\":\"{metric}\",\"time\":\"2024-05-01T10:00:{second:02}.000000Z\"}}\n"
    )
}

fn write_input(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn no_arguments_prints_usage_and_fails() {
    let out = k6_plot(&[]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("Usage: k6-plot"));
    assert_eq!(stdout.lines().count(), 2);
}

#[test]
fn extra_arguments_print_usage_and_fail() {
    let out = k6_plot(&[OsStr::new("a.json"), OsStr::new("b.json")]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage:"));
}

#[test]
fn missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("baseline.json");
    let out = k6_plot(&[missing.as_os_str()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("not found"));
}

#[test]
fn writes_chart_and_summary_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = String::from(
        "{\"type\":\"Metric\",\"data\":{\"name\":\"http_reqs\",\"type\":\"counter\",\"contains\":\"default\"},\"metric\":\"http_reqs\"}\n",
    );
    body.push_str("this is not json\n");
    for s in 0..15 {
        body.push_str(&point("vus", s * 2, 10.0));
        body.push_str(&point("http_req_duration", s * 2, 100.0 + s as f64));
        body.push_str(&point("http_reqs", s * 2 + 1, (s * 10) as f64));
    }
    let input = write_input(dir.path(), "baseline.json", &body);

    let out = k6_plot(&[input.as_os_str()]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(out.status.success(), "stdout: {stdout}");
    assert!(stdout.contains("Loaded 46 data points"));
    assert!(stdout.contains("Extracted metrics for 45 timestamps"));

    let png = std::fs::read(dir.path().join("baseline_results.png")).unwrap();
    assert_eq!(&png[1..4], b"PNG");

    let summary = std::fs::read_to_string(dir.path().join("baseline_summary.txt")).unwrap();
    assert!(summary.starts_with("k6 Load Test Summary - baseline\n"));
    assert!(summary.contains("Response Time Stats:\n  Average: 107.00 ms\n"));
    assert!(summary.contains("Throughput Stats:"));
    assert!(summary.contains("Error Stats:"));
    assert!(summary.contains("Load Stats:\n  Max VUs: 10\n  Average VUs: 10.0\n"));
}

#[test]
fn summary_omits_response_time_without_durations() {
    let dir = tempfile::tempdir().unwrap();
    let body: String = [0.0, 5.0, 12.0]
        .iter()
        .enumerate()
        .map(|(i, v)| point("http_reqs", i as u32, *v))
        .collect();
    let input = write_input(dir.path(), "smoke.json", &body);

    let out = k6_plot(&[input.as_os_str(), OsStr::new("--window"), OsStr::new("1")]);
    assert!(out.status.success());

    let summary = std::fs::read_to_string(dir.path().join("smoke_summary.txt")).unwrap();
    assert!(!summary.contains("Response Time Stats"));
    assert!(!summary.contains("Load Stats"));
    // Raw rate is [0, 5, 7].
    assert!(summary.contains("  Average RPS: 4.00\n  Max RPS: 7.00\n"));
}

#[test]
fn invalid_point_timestamp_is_a_processing_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        dir.path(),
        "broken.json",
        "{\"type\":\"Point\",\"metric\":\"vus\",\"time\":\"not a time\",\"data\":{\"value\":1}}\n",
    );
    let out = k6_plot(&[input.as_os_str()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Error processing data"));
}
