//! End-to-end tests driving the `clt` binary against stub probes
#![cfg(unix)]

mod common;

use common::{Workspace, TIMING_REPORT};
use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_successful_run_writes_csv_and_report() {
    let ws = Workspace::new();
    let probe = ws.printing_probe("probe.sh", TIMING_REPORT);

    ws.clt()
        .args(["--url", "https://example.com", "-n", "3", "-d", "0.1", "--no-color"])
        .arg("--probe")
        .arg(&probe)
        .assert()
        .success()
        .stdout(predicate::str::contains("Curl Latency Test Results"))
        .stdout(predicate::str::contains("Total Time (ms)"))
        .stdout(predicate::str::contains("Request Timing Metrics (in ms)"))
        .stdout(predicate::str::contains("Results saved to metrics.csv"))
        .stderr(predicate::str::contains("Performing request #3..."))
        .stderr(predicate::str::contains("Requests completed!"));

    let csv = fs::read_to_string(ws.file("metrics.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "DNS Lookup Time (ms),TCP Connect Time (ms),SSL Handshake Time (ms),Server Processing Time (ms),Total Time (ms),Request Number"
    );
    assert_eq!(lines[1], "10.000,20.000,30.000,40.000,50.000,1");
    assert!(lines[3].ends_with(",3"));
}

#[test]
fn test_reordered_probe_output_is_accepted() {
    let ws = Workspace::new();
    let reordered: String = TIMING_REPORT.lines().rev().map(|l| format!("{}\n", l)).collect();
    let probe = ws.printing_probe("probe.sh", &reordered);

    ws.clt()
        .args(["-n", "1", "--no-color", "--output", "reordered.csv"])
        .arg("--probe")
        .arg(&probe)
        .assert()
        .success();

    let csv = fs::read_to_string(ws.file("reordered.csv")).unwrap();
    assert_eq!(csv.lines().nth(1), Some("10.000,20.000,30.000,40.000,50.000,1"));
}

#[test]
fn test_no_save_skips_csv() {
    let ws = Workspace::new();
    let probe = ws.printing_probe("probe.sh", TIMING_REPORT);

    ws.clt()
        .args(["-n", "1", "--no-save", "--no-chart", "--no-color"])
        .arg("--probe")
        .arg(&probe)
        .assert()
        .success()
        .stdout(predicate::str::contains("Results saved").not())
        .stdout(predicate::str::contains("Request Timing Metrics").not());

    assert!(!ws.file("metrics.csv").exists());
}

#[test]
fn test_json_report_on_stdout() {
    let ws = Workspace::new();
    let probe = ws.printing_probe("probe.sh", TIMING_REPORT);

    let output = ws
        .clt()
        .args(["-n", "2", "-d", "0.1", "--json", "--no-save"])
        .arg("--probe")
        .arg(&probe)
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["num_requests"], 2);
    assert_eq!(report["table"]["rows"].as_array().unwrap().len(), 2);
    assert_eq!(report["summary"][4]["metric"], "Total");
    assert_eq!(report["chart"]["categories"][1], "#2");
}

#[test]
fn test_malformed_output_exits_3_without_csv() {
    let ws = Workspace::new();
    let probe = ws.printing_probe("probe.sh", "DNS Lookup Time 0.010\n");

    ws.clt()
        .args(["-n", "2", "--no-color"])
        .arg("--probe")
        .arg(&probe)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("request #1"));

    assert!(!ws.file("metrics.csv").exists());
}

#[test]
fn test_missing_probe_exits_2() {
    let ws = Workspace::new();

    ws.clt()
        .args(["-n", "1", "--no-color", "--probe", "/nonexistent/clt-test-curl"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));

    assert!(!ws.file("metrics.csv").exists());
}

#[test]
fn test_silent_probe_exits_2_with_exit_code() {
    let ws = Workspace::new();
    let probe = ws.stub_probe("probe.sh", "exit 6");

    ws.clt()
        .args(["-n", "1", "--no-color"])
        .arg("--probe")
        .arg(&probe)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("exit code 6"));
}

#[test]
fn test_probe_receives_curl_arguments() {
    let ws = Workspace::new();
    let args_file = ws.file("args.txt");
    let probe = ws.stub_probe(
        "probe.sh",
        &format!(
            "printf '%s\\n' \"$@\" > '{}'\ncat <<'REPORT'\n{}REPORT",
            args_file.display(),
            TIMING_REPORT
        ),
    );

    ws.clt()
        .args(["--url", "https://example.org/", "-n", "1", "--timeout", "7", "--no-save"])
        .arg("--probe")
        .arg(&probe)
        .assert()
        .success();

    let args = fs::read_to_string(&args_file).unwrap();
    let args: Vec<&str> = args.lines().collect();
    assert_eq!(args[0], "-o");
    assert!(args.contains(&"-s"));
    assert!(args.contains(&"-w"));
    assert!(args.contains(&"--max-time"));
    assert!(args.contains(&"7"));
    assert_eq!(args.last(), Some(&"https://example.org/"));
}

#[test]
fn test_interrupt_exits_130() {
    use std::process::{Command, Stdio};
    use std::thread::sleep;
    use std::time::{Duration, Instant};

    let ws = Workspace::new();
    let probe = ws.stub_probe("probe.sh", "sleep 10");

    let mut child = ws
        .clt()
        .args(["-n", "3", "--no-color"])
        .arg("--probe")
        .arg(&probe)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    sleep(Duration::from_millis(1000));
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let started = Instant::now();
    let status = child.wait().unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(status.code(), Some(130));
    assert!(!ws.file("metrics.csv").exists());
}
