use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

fn run_ingest(out: &Path, extra: &[&str]) -> Result<Value, Box<dyn Error>> {
    let logs = workspace_root().join("test_data/logs");
    let summary = out.join("summary.csv");
    let database = out.join("db.json");
    let seen = out.join("seen.json");
    let mut cmd = cargo_bin_cmd!("cogbat");
    cmd.args([
        "ingest",
        "--logs",
        logs.to_str().unwrap(),
        "--summary",
        summary.to_str().unwrap(),
        "--dump-dir",
        out.to_str().unwrap(),
        "--database",
        database.to_str().unwrap(),
        "--seen",
        seen.to_str().unwrap(),
    ]);
    cmd.args(extra);
    let output = cmd.assert().success().get_output().stdout.clone();
    Ok(serde_json::from_slice(&output)?)
}

#[test]
fn ingest_reports_failures_and_conflicts() -> Result<(), Box<dyn Error>> {
    let out = tempdir()?;
    let report = run_ingest(out.path(), &[])?;
    assert_eq!(report["processed"], 8);
    assert_eq!(report["failures"].as_array().map(Vec::len), Some(2));
    assert_eq!(report["conflicts"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["conflicts"][0]["task"], "task1");
    assert_eq!(
        report["subjects"],
        serde_json::json!(["PE211005", "PEs131010"])
    );

    let summary = fs::read_to_string(out.path().join("summary.csv"))?;
    let mut lines = summary.lines();
    let header = lines.next().expect("header");
    assert!(header.starts_with("Key,SubID,Group,Sibling,T1_BadTouchesAllTrials"));
    assert_eq!(lines.count(), 2);

    let dump = fs::read_to_string(out.path().join("task3.csv"))?;
    assert!(dump.starts_with("Key,SubID,Group,Sibling,Device,Time,TrialNum"));
    // Seven presses for one subject, three for the other.
    assert_eq!(dump.lines().count(), 11);
    Ok(())
}

#[test]
fn ingest_twice_is_idempotent() -> Result<(), Box<dyn Error>> {
    let out = tempdir()?;
    run_ingest(out.path(), &[])?;
    let summary = fs::read_to_string(out.path().join("summary.csv"))?;
    let dump = fs::read_to_string(out.path().join("task1.csv"))?;

    let report = run_ingest(out.path(), &[])?;
    assert_eq!(report["processed"], 0);
    assert_eq!(report["skipped_seen"], 8);
    assert_eq!(report["failures"].as_array().map(Vec::len), Some(2));
    assert_eq!(fs::read_to_string(out.path().join("summary.csv"))?, summary);
    assert_eq!(fs::read_to_string(out.path().join("task1.csv"))?, dump);
    Ok(())
}

#[test]
fn ingest_reads_config_file() -> Result<(), Box<dyn Error>> {
    let out = tempdir()?;
    let config = out.path().join("cogbat.toml");
    let logs = workspace_root().join("test_data/stopping");
    fs::write(
        &config,
        format!(
            "log_dir = {:?}\nsummary_file = {:?}\ndump_dir = {:?}\ndatabase = {:?}\nseen_files = {:?}\ntask5_format = \"stopping\"\n",
            logs.to_str().unwrap(),
            out.path().join("summary.csv").to_str().unwrap(),
            out.path().to_str().unwrap(),
            out.path().join("db.json").to_str().unwrap(),
            out.path().join("seen.json").to_str().unwrap(),
        ),
    )?;
    let mut cmd = cargo_bin_cmd!("cogbat");
    cmd.args(["ingest", "--config", config.to_str().unwrap()]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let report: Value = serde_json::from_slice(&output)?;
    assert_eq!(report["processed"], 1);
    assert!(report["failures"].as_array().expect("failures").is_empty());

    let dump = fs::read_to_string(out.path().join("task5.csv"))?;
    assert!(dump.lines().next().expect("header").ends_with("PrevTrialOrange"));
    Ok(())
}
