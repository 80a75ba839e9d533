//! Integration tests for the goodlog binary
//!
//! These tests drive the built binary end to end:
//! - Streaming NDJSON events from stdin and from a file
//! - Rendering a single event
//! - Rejecting misconfigured levels before any event is read
//! - Listing level sets

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// Run goodlog isolated from the user's config and data directories
fn run_goodlog(home: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_goodlog"))
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("GOODLOG_CONFIG")
        .env_remove("RUST_LOG")
        .current_dir(home)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute goodlog");

    // The child may exit before reading (e.g. on a config error)
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().expect("Failed to wait for goodlog")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

const EVENTS: &str = r#"{"event":"response","timestamp":1500000000123,"instance":"srv1","method":"GET","path":"/x","statusCode":200,"responseTime":12,"tags":["api"]}
{"event":"ops","timestamp":1500000000123,"proc":{"mem":{"rss":104857600},"uptime":30},"os":{"load":[0.5,0.25,0]}}
{"event":"error","timestamp":1500000000123,"error":{"message":"boom","stack":"Error: boom"}}
{"event":"mystery","timestamp":1500000000123}
"#;

#[test]
fn test_run_streams_stdin_in_order() {
    let home = TempDir::new().unwrap();
    let output = run_goodlog(home.path(), &["run", "--no-color"], EVENTS);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "info: 170714/024000.123, [api] srv1: get /x  200 (12ms) ",
            "info: 170714/024000.123, [] memory: 100Mb, uptime (seconds): 30, load: [0.5,0.25,0]",
            "error: 170714/024000.123, [] message: boom, stack: Error: boom",
            "info: 170714/024000.123, [mystery] data: (none)",
        ]
    );
}

#[test]
fn test_run_colors_by_default() {
    let home = TempDir::new().unwrap();
    let event = r#"{"event":"response","timestamp":0,"instance":"a","method":"DELETE","path":"/p","statusCode":503,"responseTime":1}"#;
    let output = run_goodlog(home.path(), &["run"], event);
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("\x1b[1;31mdelete\x1b[0m /p  \x1b[31m503\x1b[0m (1ms)"));
}

#[test]
fn test_run_reads_input_file() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("events.ndjson");
    fs::write(&input, r#"{"event":"log","timestamp":0,"tags":["db"],"data":{"rows":3}}"#).unwrap();

    let output = run_goodlog(home.path(), &["run", "--input", input.to_str().unwrap()], "");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "info: 700101/000000.000, [log,db] data: {\"rows\":3}\n");
}

#[test]
fn test_run_derives_request_level_from_tags() {
    let home = TempDir::new().unwrap();
    let event = r#"{"event":"request","timestamp":0,"id":"r-1","tags":["foo","warn"],"data":"slow query"}"#;
    let output = run_goodlog(home.path(), &["run"], event);
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "warn: 700101/000000.000, (r-1) [request,foo,warn] data: slow query\n"
    );
}

#[test]
fn test_run_fixed_request_level_ignores_tags() {
    let home = TempDir::new().unwrap();
    let event = r#"{"event":"request","timestamp":0,"tags":["warn"],"data":"x"}"#;
    let output = run_goodlog(home.path(), &["run", "--request-level", "http"], event);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "http: 700101/000000.000, [request,warn] data: x\n");
}

#[test]
fn test_run_logs_non_json_lines_as_raw_text() {
    let home = TempDir::new().unwrap();
    let output = run_goodlog(home.path(), &["run"], "plain words\n");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "info: 700101/000000.000, [] data: plain words\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("not JSON"));
}

#[test]
fn test_run_rejects_unknown_level_before_reading() {
    let home = TempDir::new().unwrap();
    let output = run_goodlog(home.path(), &["run", "--levels", "syslog", "--request-level", "warn"], EVENTS);
    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not defined by the sink"));
}

#[test]
fn test_config_file_is_honored() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("goodlog.yaml");
    fs::write(
        &config,
        "formatter:\n  format: 'YYYY-MM-DD'\n  level:\n    other: debug\n",
    )
    .unwrap();

    let output = run_goodlog(
        home.path(),
        &["--config", config.to_str().unwrap(), "run"],
        r#"{"event":"custom","timestamp":1500000000123,"data":"x"}"#,
    );
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "debug: 2017-07-14, [custom] data: x\n");
}

#[test]
fn test_render_json_output() {
    let home = TempDir::new().unwrap();
    let output = run_goodlog(
        home.path(),
        &["render", "--no-color", "-o", "json", r#"{"event":"log","timestamp":0,"data":"hi"}"#],
        "",
    );
    assert!(output.status.success());

    let rendered: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(rendered["level"], "info");
    assert_eq!(rendered["line"], "700101/000000.000, [log] data: hi");
}

#[test]
fn test_check_reports_invalid_config() {
    let home = TempDir::new().unwrap();
    let ok = run_goodlog(home.path(), &["check"], "");
    assert!(ok.status.success());

    let syslog = run_goodlog(home.path(), &["check", "--levels", "syslog"], "");
    assert!(syslog.status.success());

    let bad = run_goodlog(home.path(), &["check", "--levels", "syslog", "--request-level", "silly"], "");
    assert!(!bad.status.success());
    assert!(String::from_utf8_lossy(&bad.stderr).contains("silly"));
}

#[test]
fn test_levels_json() {
    let home = TempDir::new().unwrap();
    let output = run_goodlog(home.path(), &["levels", "--preset", "syslog", "-o", "json"], "");
    assert!(output.status.success());

    let levels: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(levels["emerg"], 0);
    assert_eq!(levels["debug"], 7);
}
