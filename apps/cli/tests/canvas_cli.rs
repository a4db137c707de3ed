use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

fn scratch_file(test_name: &str, contents: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let path = std::env::temp_dir().join(format!("canvas_{test_name}_{nanos}.json"));
    std::fs::write(&path, contents).expect("failed to write scratch file");
    path
}

fn run_cli(args: &[&str]) -> (i32, Value, String) {
    let exe = env!("CARGO_BIN_EXE_canvas");
    let out = Command::new(exe)
        .args(args)
        .env_remove("CANVAS_CONFIG")
        .env_remove("CANVAS_LOG")
        .output()
        .expect("failed to run canvas cli");

    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    let code = out.status.code().unwrap_or(-1);
    let json: Value = if code == 0 {
        serde_json::from_str(&stdout).unwrap_or(Value::Null)
    } else {
        serde_json::from_str(&stderr).unwrap_or(Value::Null)
    };
    let text = if code == 0 { stdout } else { stderr };
    (code, json, text)
}

const ACME: &str = r#"{
  "company": { "name": "Acme", "scores": [50, 50, 50] },
  "competitors": [
    { "name": "X", "scores": [50, 50, 50] },
    { "name": "Y", "scores": ["50", "50", "50"] },
    { "name": "Z", "scores": [50, 50, 50] }
  ],
  "features": ["Speed", "Cost"]
}"#;

#[test]
fn chart_envelope_structure() {
    let file = scratch_file("envelope", ACME);
    let (code, json, _) = run_cli(&["--json", "chart", file.to_str().unwrap()]);

    assert_eq!(code, 0);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], "1.0");
    assert_eq!(json["command"], "chart");
    assert!(json["error"].is_null());
    assert!(json["data"]["points"].is_array());
    assert!(json["data"]["series"].is_array());
}

#[test]
fn chart_pivots_scores_per_metric() {
    let file = scratch_file("pivot", ACME);
    let (code, json, _) = run_cli(&["--json", "chart", file.to_str().unwrap()]);

    assert_eq!(code, 0);
    let points = json["data"]["points"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    let names: Vec<_> = points.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Price", "Speed", "Cost"]);
    for point in points {
        for series in ["Acme", "X", "Y", "Z"] {
            assert_eq!(point["values"][series], 50);
        }
    }
    assert_eq!(json["data"]["series"][0]["color"], "#FF0000");
}

#[test]
fn competitor_named_name_does_not_clobber_categories() {
    let file = scratch_file(
        "named_name",
        r#"{"company":{"name":"Acme"},"competitors":[{"name":"name","scores":[42]}],"features":["Speed"]}"#,
    );
    let (code, json, _) = run_cli(&["--json", "chart", file.to_str().unwrap()]);

    assert_eq!(code, 0);
    let points = &json["data"]["points"];
    assert_eq!(points[0]["name"], "Price");
    assert_eq!(points[1]["name"], "Speed");
    assert_eq!(points[0]["values"]["name"], 42);
}

#[test]
fn table_prints_normalized_rows() {
    let file = scratch_file("table", ACME);
    let (code, _, text) = run_cli(&["table", file.to_str().unwrap()]);

    assert_eq!(code, 0);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].contains("Price"));
    assert!(lines[2].starts_with("Acme"));
}

#[test]
fn missing_names_fail_validation() {
    let file = scratch_file(
        "invalid",
        r#"{"company":{"name":""},"competitors":[{"name":"X"},{"name":""}],"features":["Speed"]}"#,
    );
    let (code, json, _) = run_cli(&["--json", "validate", file.to_str().unwrap()]);

    assert_eq!(code, 1);
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["type"], "ValidationError");
    assert_eq!(json["error"]["fields"]["companyName"], "Company Name is required");
    assert_eq!(json["error"]["fields"]["competitor1"], "Competitor Name is required");
    assert!(json["error"]["fields"]["competitor0"].is_null());
}

#[test]
fn unparseable_score_is_rejected_by_default() {
    let file = scratch_file(
        "reject",
        r#"{"company":{"name":"Acme","scores":["abc"]},"features":[]}"#,
    );
    let (code, json, _) = run_cli(&["--json", "chart", file.to_str().unwrap()]);

    assert_eq!(code, 3);
    assert_eq!(json["error"]["type"], "InvalidScore");
}

#[test]
fn config_file_switches_policy() {
    let config = scratch_file("config", r#"{"score_policy":"zero"}"#);
    let file = scratch_file(
        "zero",
        r#"{"company":{"name":"Acme","scores":["abc"]},"features":[]}"#,
    );
    let (code, json, _) = run_cli(&[
        "--json",
        "--config",
        config.to_str().unwrap(),
        "chart",
        file.to_str().unwrap(),
    ]);

    assert_eq!(code, 0);
    assert_eq!(json["data"]["points"][0]["values"]["Acme"], 0);
}

#[test]
fn missing_file_is_io_error() {
    let (code, json, _) = run_cli(&["--json", "table", "/no/such/draft.json"]);
    assert_eq!(code, 2);
    assert_eq!(json["error"]["type"], "IoError");
}

#[test]
fn template_is_a_loadable_blank_draft() {
    let (code, json, _) = run_cli(&["--json", "template", "--competitors", "2", "--features", "1"]);
    assert_eq!(code, 0);
    let data = &json["data"];
    assert_eq!(data["competitors"].as_array().unwrap().len(), 2);
    assert_eq!(data["company"]["scores"].as_array().unwrap().len(), 2);

    let file = scratch_file("template", &data.to_string());
    let (code, _, _) = run_cli(&["--json", "validate", file.to_str().unwrap()]);
    assert_eq!(code, 1);
}

#[test]
fn unknown_command_is_invalid() {
    let (code, json, _) = run_cli(&["--json", "frobnicate"]);
    assert_eq!(code, 3);
    assert_eq!(json["error"]["type"], "InvalidCommand");
}
