use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use bopgraph::cli::{CommandLineConfig, parse_batch};
use serde_json::Value;
use tempfile::tempdir;

const BATCH: &str = r#"[
    {
        "nodes": [
            {"id": "a", "type": "class", "tag": "class"},
            {"id": "b", "type": "method", "tag": "method"}
        ],
        "edges": [{"source": "a", "target": "b", "tag": "owns"}]
    },
    {"nodes": [{"id": "x"}], "edges": [{"source": "x", "target": "missing"}]}
]"#;

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write fixture");
    path
}

fn bopgraph() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bopgraph"))
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run bopgraph");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("json output")
}

#[test]
fn test_cli_exits_with_success_on_help() {
    bopgraph().arg("--help").assert().success();
}

#[test]
fn test_cli_usage_errors_exit_2() {
    bopgraph().assert().code(2);
    bopgraph().arg("frobnicate").assert().code(2);
    bopgraph().args(["--verbose", "embed"]).assert().code(2);
    bopgraph().arg("encode-paths").assert().code(2);
}

#[test]
fn test_cli_check_template() {
    let value = stdout_json(bopgraph().args([
        "check-template",
        "--kind",
        "edge",
        "--template",
        "@source.type = class >>> {{tag}}",
    ]));
    assert_eq!(value["valid"], true);
    assert_eq!(value["kind"], "edge");
    assert_eq!(value["gated"], true);
    assert_eq!(value["segments"], 1);

    bopgraph()
        .args(["check-template", "--kind", "node", "--template", "{{bogus}}"])
        .assert()
        .code(1);
}

#[test]
fn test_cli_encode_paths_reports_items() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "batch.json", BATCH);
    let value = stdout_json(bopgraph().args(["encode-paths", "--input", input.to_str().unwrap()]));
    let items = value["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["index"], 0);
    let paths = items[0]["ok"]["paths"].as_array().unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0]["nodes"][0][1], "class");
    assert_eq!(paths[0]["edges"][0], "owns");
    assert!(items[1]["error"].as_str().unwrap().contains("missing"));
}

#[test]
fn test_cli_mine_patterns_with_config() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "batch.json", BATCH);
    let config = write(dir.path(), "config.json", r#"{"maskNodeTypes": true, "maxPatterns": 5}"#);
    let value = stdout_json(bopgraph().args([
        "--config",
        config.to_str().unwrap(),
        "mine-patterns",
        "--input",
        input.to_str().unwrap(),
    ]));
    let frequencies = value["frequencies"].as_array().unwrap();
    assert_eq!(frequencies.len(), 1);
    assert_eq!(frequencies[0]["pattern"][0], "<node>_0><node>_1[owns]");
    assert_eq!(frequencies[0]["modelFrequency"], 1);
    assert!(value["items"][0]["ok"]["mapping"]["<node>_0"].is_array());
}

#[test]
fn test_cli_embed_outputs_matrix() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "batch.json", BATCH);
    let value = stdout_json(bopgraph().args(["embed", "--input", input.to_str().unwrap()]));
    let embedding = &value["items"][0]["ok"]["embedding"];
    assert_eq!(embedding["header"][0], "class_0>method_0[owns]");
    assert_eq!(embedding["rows"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cli_bad_config_exits_2_and_bad_input_exits_1() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "batch.json", BATCH);
    let config = write(dir.path(), "config.json", r#"{"maxPathLength": "long"}"#);
    bopgraph()
        .args([
            "--config",
            config.to_str().unwrap(),
            "encode-paths",
            "--input",
            input.to_str().unwrap(),
        ])
        .assert()
        .code(2);

    let invalid = write(dir.path(), "invalid.json", r#"{"minPathLength": 5, "maxPathLength": 2}"#);
    bopgraph()
        .args([
            "--config",
            invalid.to_str().unwrap(),
            "encode-paths",
            "--input",
            input.to_str().unwrap(),
        ])
        .assert()
        .code(2);

    let missing = dir.path().join("nope.json");
    bopgraph()
        .args(["encode-paths", "--input", missing.to_str().unwrap()])
        .assert()
        .code(1);

    let not_array = write(dir.path(), "object.json", "{}");
    bopgraph()
        .args(["embed", "--input", not_array.to_str().unwrap()])
        .assert()
        .code(1);
}

#[test]
fn test_parse_batch_isolates_bad_documents() {
    let batch = parse_batch(BATCH).unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].as_ref().unwrap().node_count(), 2);
    assert_eq!(batch[1].as_ref().unwrap_err().index, 1);
    assert!(parse_batch("not json").is_err());
}

#[test]
fn test_command_line_config_parsing() {
    let config =
        CommandLineConfig::from_args(&["bopgraph", "--config", "c.json", "embed", "--input", "x"])
            .unwrap();
    assert_eq!(config.config_path.as_deref(), Some("c.json"));
    assert_eq!(config.command, "embed");
    assert_eq!(config.command_args, vec!["--input", "x"]);
    assert!(CommandLineConfig::from_args(&["bopgraph", "--config"]).is_err());
    assert!(CommandLineConfig::from_args(&["bopgraph"]).is_err());
}
