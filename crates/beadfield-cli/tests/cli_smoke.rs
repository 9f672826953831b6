use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn beadfield() -> Command {
    Command::new(env!("CARGO_BIN_EXE_beadfield"))
}

#[test]
fn cli_simulates_fixture_to_stdout() {
    let path = fixture("triangle.json5");
    assert!(path.exists(), "fixture missing: {}", path.display());

    let output = beadfield()
        .args(["simulate", path.to_string_lossy().as_ref()])
        .output()
        .expect("run beadfield");
    output.clone().assert().success();

    let report: Value = serde_json::from_slice(&output.stdout).expect("json on stdout");
    assert_eq!(report["settled"], Value::Bool(true));
    let nodes = report["nodes"].as_array().expect("nodes");
    assert_eq!(nodes.len(), 4);
    for n in nodes {
        let x = n["x"].as_f64().unwrap();
        let y = n["y"].as_f64().unwrap();
        assert!((1.0..=799.0).contains(&x) && (1.0..=599.0).contains(&y), "{n}");
        assert_eq!(n["held"], Value::Bool(false));
    }
    let anchor = nodes.iter().find(|n| n["id"] == "anchor").unwrap();
    assert_eq!(anchor["x"].as_f64(), Some(780.0));
    assert_eq!(anchor["y"].as_f64(), Some(580.0));
}

#[test]
fn cli_writes_trace_to_out_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("layout.json");

    beadfield()
        .args([
            "simulate",
            "--max-ticks",
            "12",
            "--no-settle",
            "--trace",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture("triangle.json5").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let report: Value = serde_json::from_str(&fs::read_to_string(&out).expect("read out"))
        .expect("json in out file");
    assert_eq!(report["ticks"].as_u64(), Some(12));
    assert_eq!(report["frames"].as_array().map(Vec::len), Some(12));
}

#[test]
fn cli_prints_default_config() {
    let output = beadfield().arg("config").output().expect("run beadfield");
    output.clone().assert().success();
    let cfg: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(cfg["initialEnergy"].as_f64(), Some(6.0));
    assert_eq!(cfg["minNodeCount"].as_u64(), Some(5));
}

#[test]
fn cli_fails_on_a_missing_scene() {
    let tmp = tempfile::tempdir().expect("tempdir");
    beadfield()
        .args(["simulate", tmp.path().join("nope.json5").to_string_lossy().as_ref()])
        .assert()
        .failure();
}
