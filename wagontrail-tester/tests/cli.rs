use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "wagontrail-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_strategies_writes_output() {
    let exe = env!("CARGO_BIN_EXE_wagontrail-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-strategies", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available strategies"));
    for key in ["cautious", "bold", "thrifty", "random"] {
        assert!(content.contains(key), "missing {key}");
    }
}

#[test]
fn cli_runs_share_code_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_wagontrail-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--strategies",
            "cautious,thrifty",
            "--iterations",
            "1",
            "--seeds",
            "ST-WAGON12,8",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let text = std::fs::read_to_string(output_path).expect("read report");
    let report: serde_json::Value = serde_json::from_str(&text).expect("json report");
    let runs = report["runs"].as_array().expect("runs");
    assert_eq!(runs.len(), 4);
    assert!(runs.iter().any(|run| run["code"] == "ST-WAGON12"));
    assert!(runs.iter().all(|run| run["days"].as_u64().is_some_and(|d| d >= 1)));
}

#[test]
fn cli_rejects_unknown_strategy() {
    let exe = env!("CARGO_BIN_EXE_wagontrail-tester");
    let output = Command::new(exe)
        .args(["--strategies", "reckless", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown strategy"));
}

#[test]
fn cli_rejects_invalid_config_overlay() {
    let exe = env!("CARGO_BIN_EXE_wagontrail-tester");
    let config_path = temp_path("config");
    std::fs::write(&config_path, r#"{"base_miles_min": 50, "base_miles_max": 10}"#)
        .expect("write config");
    let output = Command::new(exe)
        .args(["--iterations", "1", "--config"])
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
}

#[test]
fn cli_rejects_bad_difficulty() {
    let exe = env!("CARGO_BIN_EXE_wagontrail-tester");
    let status = Command::new(exe)
        .args(["--difficulty", "nightmare"])
        .status()
        .expect("run cli");
    assert!(!status.success());
}
