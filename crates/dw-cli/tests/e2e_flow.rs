//! End-to-end tests for the `dw` binary.
//!
//! Each test writes a night export into a temp directory and runs the
//! compiled binary against it with an isolated HOME.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn dw_binary() -> String {
    env!("CARGO_BIN_EXE_dw").to_string()
}

/// Builds a command that ignores the developer's own config and env.
fn dw(home: &Path) -> Command {
    let mut cmd = Command::new(dw_binary());
    cmd.env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("DW_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

fn write_night(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, json).unwrap();
    path
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "dw should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

/// A night with a late, variable REM period followed by a brief awakening,
/// plus an early short REM that falls below the threshold.
const NIGHT: &str = r#"{
    "segments": [
        {"start": "2025-03-10T23:00:00Z", "end": "2025-03-11T00:30:00Z", "stage": "core"},
        {"start": "2025-03-11T00:30:00Z", "end": "2025-03-11T00:38:00Z", "stage": "rem"},
        {"start": "2025-03-11T00:38:00Z", "end": "2025-03-11T04:00:00Z", "stage": "deep"},
        {"start": "2025-03-11T04:00:00Z", "end": "2025-03-11T04:22:00Z", "stage": "rem"},
        {"start": "2025-03-11T04:22:30Z", "end": "2025-03-11T04:24:30Z", "stage": "awake"},
        {"start": "2025-03-11T04:24:30Z", "end": "2025-03-11T06:00:00Z", "stage": "core"}
    ],
    "heart_rate": [
        {"timestamp": "2025-03-11T04:05:00Z", "bpm": 51.0},
        {"timestamp": "2025-03-11T04:15:00Z", "bpm": 69.0}
    ]
}"#;

#[test]
fn test_predict_json_end_to_end() {
    let temp = TempDir::new().unwrap();
    let night = write_night(temp.path(), "night.json", NIGHT);

    let output = dw(temp.path())
        .args(["predict", "--json"])
        .arg(&night)
        .output()
        .unwrap();
    let report = stdout_json(&output);

    // The REM window and its micro-arousal window merge into one
    assert_eq!(report["count"], 1);
    let window = &report["predictions"][0];
    assert_eq!(window["start"], "2025-03-11T04:00:00Z");
    assert_eq!(window["end"], "2025-03-11T04:22:30Z");
    assert_eq!(window["confidence"], 0.92);
    assert_eq!(
        window["reasoning"],
        "Extended REM period (22 min) • Elevated heart rate variability • Occurred in later sleep cycles"
    );
    assert_eq!(window["was_logged"], false);
}

#[test]
fn test_predict_human_output() {
    let temp = TempDir::new().unwrap();
    let night = write_night(temp.path(), "night.json", NIGHT);

    let output = dw(temp.path()).arg("predict").arg(&night).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("04:00 - 04:22"));
    assert!(stdout.contains("0.92"));
    assert!(stdout.contains("1 window(s)"));
}

#[test]
fn test_predict_reads_stdin() {
    let temp = TempDir::new().unwrap();

    let mut child = dw(temp.path())
        .args(["predict", "--json", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(NIGHT.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(stdout_json(&output)["count"], 1);
}

#[test]
fn test_predict_empty_night() {
    let temp = TempDir::new().unwrap();
    let night = write_night(temp.path(), "empty.json", r#"{"segments": []}"#);

    let output = dw(temp.path())
        .args(["predict", "--json"])
        .arg(&night)
        .output()
        .unwrap();
    let report = stdout_json(&output);
    assert_eq!(report["count"], 0);
    assert_eq!(report["predictions"], serde_json::json!([]));
}

#[test]
fn test_shuffled_night_needs_sort() {
    let temp = TempDir::new().unwrap();
    let shuffled = r#"{
        "segments": [
            {"start": "2025-03-11T04:00:00Z", "end": "2025-03-11T04:22:00Z", "stage": "rem"},
            {"start": "2025-03-10T23:00:00Z", "end": "2025-03-11T04:00:00Z", "stage": "core"}
        ],
        "heart_rate": [
            {"timestamp": "2025-03-11T04:05:00Z", "bpm": 51.0},
            {"timestamp": "2025-03-11T04:15:00Z", "bpm": 69.0}
        ]
    }"#;
    let night = write_night(temp.path(), "shuffled.json", shuffled);

    let rejected = dw(temp.path()).arg("predict").arg(&night).output().unwrap();
    assert!(!rejected.status.success());
    let stderr = String::from_utf8_lossy(&rejected.stderr);
    assert!(stderr.contains("starts before the previous segment"), "{stderr}");

    let sorted = dw(temp.path())
        .args(["predict", "--json", "--sort"])
        .arg(&night)
        .output()
        .unwrap();
    let report = stdout_json(&sorted);
    assert_eq!(report["predictions"][0]["confidence"], 0.92);
}

#[test]
fn test_validate_reports_overlap() {
    let temp = TempDir::new().unwrap();
    let overlapping = r#"{
        "segments": [
            {"start": "2025-03-10T23:00:00Z", "end": "2025-03-11T01:00:00Z", "stage": "core"},
            {"start": "2025-03-11T00:50:00Z", "end": "2025-03-11T01:10:00Z", "stage": "rem"}
        ]
    }"#;
    let bad = write_night(temp.path(), "bad.json", overlapping);
    let good = write_night(temp.path(), "good.json", NIGHT);

    let output = dw(temp.path()).arg("validate").arg(&bad).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("overlaps the previous segment"));

    let output = dw(temp.path()).arg("validate").arg(&good).output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "OK: 6 segment(s), chronological and non-overlapping\n"
    );
}

#[test]
fn test_summary_json() {
    let temp = TempDir::new().unwrap();
    let night = write_night(temp.path(), "night.json", NIGHT);

    let output = dw(temp.path())
        .args(["summary", "--json"])
        .arg(&night)
        .output()
        .unwrap();
    let summary = stdout_json(&output);
    assert_eq!(summary["segment_count"], 6);
    assert_eq!(summary["rem_periods"], 2);
    assert_eq!(summary["rem_awakenings"], 1);
    assert_eq!(summary["heart_rate_samples"], 2);
    assert_eq!(summary["mean_bpm"], 60.0);
    assert_eq!(summary["minutes_by_stage"]["rem"], 30.0);
}

#[test]
fn test_config_file_overrides_threshold() {
    let temp = TempDir::new().unwrap();
    let night = write_night(temp.path(), "night.json", NIGHT);
    let config = temp.path().join("dw.toml");
    std::fs::write(&config, "[prediction]\nmin_confidence = 0.95\narousal_confidence = 0.5\n")
        .unwrap();

    let output = dw(temp.path())
        .args(["predict", "--json", "--config"])
        .arg(&config)
        .arg(&night)
        .output()
        .unwrap();
    let report = stdout_json(&output);

    // REM candidate is filtered; only the micro-arousal window remains
    assert_eq!(report["count"], 1);
    assert_eq!(report["predictions"][0]["confidence"], 0.5);
    assert_eq!(report["predictions"][0]["end"], "2025-03-11T04:22:30Z");
}

#[test]
fn test_env_overrides_threshold() {
    let temp = TempDir::new().unwrap();
    let night = write_night(temp.path(), "night.json", NIGHT);

    let output = dw(temp.path())
        .env("DW_PREDICTION__MIN_CONFIDENCE", "0.95")
        .args(["predict", "--json"])
        .arg(&night)
        .output()
        .unwrap();
    let report = stdout_json(&output);
    assert_eq!(report["count"], 1);
    assert_eq!(report["predictions"][0]["confidence"], 0.75);
}

#[test]
fn test_env_wins_over_config_file() {
    let temp = TempDir::new().unwrap();
    let night = write_night(temp.path(), "night.json", NIGHT);
    let config = temp.path().join("dw.toml");
    std::fs::write(&config, "[prediction]\nmin_confidence = 0.95\n").unwrap();

    let output = dw(temp.path())
        .env("DW_PREDICTION__MIN_CONFIDENCE", "0.3")
        .args(["predict", "--json", "--config"])
        .arg(&config)
        .arg(&night)
        .output()
        .unwrap();
    let report = stdout_json(&output);
    assert_eq!(report["predictions"][0]["confidence"], 0.92);
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp = TempDir::new().unwrap();
    let night = write_night(temp.path(), "night.json", NIGHT);

    let output = dw(temp.path())
        .env("DW_PREDICTION__AROUSAL_MAX_MS", "1000")
        .args(["predict"])
        .arg(&night)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid prediction configuration"));
}

#[test]
fn test_helper_strips_inherited_dw_env() {
    let temp = TempDir::new().unwrap();
    let cmd = dw(temp.path());

    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("DW_") {
            assert!(
                cmd.get_envs().any(|(k, v)| k == key && v.is_none()),
                "{} should be removed",
                key.to_string_lossy()
            );
        }
    }
    assert!(
        cmd.get_envs()
            .all(|(k, v)| !k.to_string_lossy().starts_with("DW_") || v.is_none())
    );
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();
    let output = dw(temp.path()).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}
