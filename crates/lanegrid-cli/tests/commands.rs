//! Tests for the `lanegrid check` and `lanegrid layout` commands

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::tempdir;

fn lanegrid_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lanegrid"))
}

fn lanegrid(args: &[&str]) -> Output {
    Command::new(lanegrid_binary())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

const TEAM_TOML: &str = r#"
[[intervals]]
id = "A"
owner = "Alice"
start = "2025-01-06"
end = "2025-01-08"

[[intervals]]
id = "B"
owner = "Alice"
start = "2025-01-07"
end = "2025-01-10"

[[intervals]]
id = "C"
owner = "Bob"
start = "2025-01-06"
end = "2025-01-09"

[[intervals]]
id = "LAUNCH"
owner = "milestone"
start = "2025-01-10"
end = "2025-01-10"
"#;

// =============================================================================
// check
// =============================================================================

#[test]
fn check_reports_counts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("team.toml");
    fs::write(&input, TEAM_TOML).unwrap();

    let output = lanegrid(&["check", input.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("4 intervals ok, 0 skipped"), "got: {stdout}");
}

#[test]
fn check_lists_skipped_records_on_stderr() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("people.json");
    fs::write(
        &input,
        r#"[{"id": "P9", "group_key": "Pat", "start": "soon", "end": "2025-01-09"},
            {"id": "P10", "start": "2025-01-06", "end": "2025-01-09"}]"#,
    )
    .unwrap();

    let output = lanegrid(&["check", input.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning[W002]: skipped interval 'P9': invalid start date 'soon'"));
    assert!(stderr.contains("skipped interval 'P10': missing group key"));
    assert!(stderr.contains("(interval P9)"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0 intervals ok, 2 skipped"));
}

#[test]
fn check_json_report() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("people.json");
    fs::write(
        &input,
        r#"[{"id": "P1", "group_key": "Pat", "start": "2025-01-06", "end": "2025-01-09"},
            {"id": "P9", "group_key": "Pat", "start": "soon", "end": "2025-01-09"}]"#,
    )
    .unwrap();

    let output = lanegrid(&["check", input.to_str().unwrap(), "--format", "json"]);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["intervals"], 1);
    assert_eq!(report["diagnostics"][0]["code"], "W002");
    assert_eq!(report["diagnostics"][0]["interval"], "P9");
}

// =============================================================================
// layout
// =============================================================================

#[test]
fn layout_writes_grid_json() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("team.toml");
    let out = dir.path().join("grid.json");
    fs::write(&input, TEAM_TOML).unwrap();

    let output = lanegrid(&[
        "layout",
        input.to_str().unwrap(),
        "--today",
        "2025-01-06",
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let grid: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let rows = grid["rows"].as_array().unwrap();
    let groups: Vec<&str> = rows.iter().map(|r| r["group_key"].as_str().unwrap()).collect();
    // Milestones pinned first, then alphabetical
    assert_eq!(groups, vec!["milestone", "Alice", "Alice", "Bob"]);
    assert_eq!(grid["week_segments"][0]["label"], "01/06-01/10");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("info[I001]: 4 intervals in 4 rows across 3 groups"));
}

#[test]
fn layout_summary_to_stdout() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("team.toml");
    fs::write(&input, TEAM_TOML).unwrap();

    let output = lanegrid(&[
        "layout",
        input.to_str().unwrap(),
        "--today",
        "2025-01-06",
        "--format",
        "summary",
        "--quiet",
    ]);
    assert!(output.status.success());
    assert!(output.stderr.is_empty());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "4 rows, columns 1..5 (2025-01-06 .. 2025-01-10)");
    assert!(lines[1].starts_with("milestone  LAUNCH [5-5]"));
    assert!(lines[2].starts_with("Alice"));
}

#[test]
fn layout_applies_config() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("team.toml");
    let config = dir.path().join("grid.toml");
    fs::write(&input, TEAM_TOML).unwrap();
    fs::write(
        &config,
        r##"
include_weekends = true
first_data_column = 3
palette = ["#112233"]

[terms]
kind = "month_rules"
entries = [{ label = "Q1", start_month = 1, end_month = 3, color = "#abcdef" }]
"##,
    )
    .unwrap();

    let output = lanegrid(&[
        "layout",
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--today",
        "2025-01-06",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let grid: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(grid["columns"]["first_column"], 3);
    assert_eq!(grid["term_segments"][0]["label"], "Q1 2025");
    assert_eq!(grid["rows"][0]["intervals"][0]["color"], "#112233");
}

#[test]
fn layout_rejects_bad_today() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("team.toml");
    fs::write(&input, TEAM_TOML).unwrap();

    let output = lanegrid(&["layout", input.to_str().unwrap(), "--today", "yesterday"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid date 'yesterday'"));
}
