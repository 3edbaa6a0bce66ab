use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

/// `tse` isolated from the user's config and data directories.
fn tse(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tse").unwrap();
    cmd.env_clear()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("TSE_SOURCE_BACKEND", "builtin");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cli_help() {
    let home = tempdir().unwrap();
    tse(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version() {
    let home = tempdir().unwrap();
    tse(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_search_filters_machine_output() {
    let home = tempdir().unwrap();
    let output = tse(&home)
        .args(["-m", "search", "--country", "UK", "--tech", "Azure"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["name"], "FinSecure");
}

#[test]
fn test_search_text_plain_output() {
    let home = tempdir().unwrap();
    tse(&home)
        .args(["--plain", "search", "cybergard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9: CyberGuard (cyberguard.tech)"));
}

#[test]
fn test_search_sort_and_limit() {
    let home = tempdir().unwrap();
    let output = tse(&home)
        .args(["-m", "search", "--sort", "revenue", "--desc", "--limit", "2"])
        .output()
        .unwrap();
    let json = stdout_json(&output);
    assert_eq!(json["total"], 12);
    assert_eq!(json["results"][0]["id"], 10);
    assert_eq!(json["results"][1]["id"], 3);
}

#[test]
fn test_invalid_range_is_structured_error() {
    let home = tempdir().unwrap();
    let output = tse(&home)
        .args(["-m", "search", "--tech-count", "9", "2"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["status"]["error"]["code"], "INVALID_SPECIFICATION");
}

#[test]
fn test_options_lists_facets() {
    let home = tempdir().unwrap();
    let output = tse(&home).args(["-m", "options"]).output().unwrap();
    let json = stdout_json(&output);
    let technologies = json["technologies"].as_array().unwrap();
    assert!(technologies.contains(&json!("Kubernetes")));
    assert_eq!(json["countries"].as_array().unwrap().len(), 8);
}

#[test]
fn test_export_csv_to_stdout() {
    let home = tempdir().unwrap();
    tse(&home)
        .args(["export", "--founded", "2008", "--fields", "id,name,founded"])
        .assert()
        .success()
        .stdout("id,name,founded\n3,FinSecure,2008\n");
}

#[test]
fn test_seed_then_search_sqlite() {
    let home = tempdir().unwrap();
    let db = home.path().join("companies.db");

    tse(&home)
        .env("TSE_SOURCE_BACKEND", "sqlite")
        .env("TSE_SOURCE_PATH", &db)
        .args(["-m", "seed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"written\": 12"));

    let output = tse(&home)
        .env("TSE_SOURCE_BACKEND", "sqlite")
        .env("TSE_SOURCE_PATH", &db)
        .args(["-m", "search", "--office", "London"])
        .output()
        .unwrap();
    let ids: Vec<u64> = stdout_json(&output)["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3, 11]);
}

#[test]
fn test_ask_uses_translated_filters() {
    let home = tempdir().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(200).json_body(json!({
            "response": "{\"countries\": [\"UK\"], \"technologies\": [{\"value\": \"Azure\", \"condition\": \"AND\"}]}"
        }));
    });

    let output = tse(&home)
        .env("TSE_TRANSLATOR_ENDPOINT", server.base_url())
        .args(["-m", "ask", "banks", "in", "the", "UK", "on", "Azure"])
        .output()
        .unwrap();
    assert!(output.status.success());

    mock.assert();
    let json = stdout_json(&output);
    assert_eq!(json["filters"]["countries"][0], "UK");
    assert_eq!(json["results"][0]["id"], 3);
    assert!(json.get("warnings").is_none());
}

#[test]
fn test_ask_failure_keeps_flag_filters() {
    let home = tempdir().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(500).json_body(json!({ "error": "model not loaded" }));
    });

    let output = tse(&home)
        .env("TSE_TRANSLATOR_ENDPOINT", server.base_url())
        .args(["-m", "ask", "anything", "--country", "Japan"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["results"][0]["name"], "Gamer's Hub");
    assert!(json["warnings"][0].as_str().unwrap().contains("model not loaded"));
}

#[test]
fn test_config_get_key() {
    let home = tempdir().unwrap();
    tse(&home)
        .args(["config", "search.max_edit_distance"])
        .assert()
        .success()
        .stdout("2\n");
}
