use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::error::Error;
use std::path::PathBuf;

fn sample_path(relative: &str) -> String {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join(relative);
    root.to_string_lossy().to_string()
}

fn assert_close(actual: &Value, expected: f64, tol: f64) {
    let actual = actual.as_f64().expect("number");
    assert!((actual - expected).abs() < tol, "{} != {}", actual, expected);
}

fn run_json(args: &[&str]) -> Result<Value, Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("cogbat");
    cmd.args(args);
    let output = cmd.assert().success().get_output().stdout.clone();
    Ok(serde_json::from_slice(&output)?)
}

#[test]
fn summarize_task1_fixture() -> Result<(), Box<dyn Error>> {
    let input = sample_path("test_data/logs/PE211005_IIN028_task1_5-15-2013-16-13-32.csv");
    let summary = run_json(&["summarize", "--input", &input])?;
    let map = summary.as_object().expect("object");
    assert_eq!(map.len(), 6);
    assert_close(&summary["T1_BadTouchesAllTrials"], 11.0 / 12.0, 1e-9);
    assert_close(&summary["T1_ScoreFirst"], 2.75, 1e-9);
    Ok(())
}

#[test]
fn parse_task2_derives_switches() -> Result<(), Box<dyn Error>> {
    let input = sample_path("test_data/logs/PE211005_IIN028_task2_5-15-2013-16-20-0.csv");
    let data = run_json(&["parse", "--input", &input])?;
    assert_eq!(data["format"], "switching");
    assert_eq!(data["practice"].as_array().map(Vec::len), Some(2));
    let trials = data["trials"].as_array().expect("trials");
    let rule: Vec<&Value> = trials.iter().map(|t| &t["SwitchRule"]).collect();
    assert_eq!(rule, [&Value::Bool(true), &Value::Bool(false), &Value::Bool(true), &Value::Bool(false)]);
    assert_eq!(trials[3]["GoalSide"], "unknown");
    assert_eq!(trials[3]["SwitchSide"], "unknown");
    assert_close(&data["summary"]["T2_SameAccuracy"], 0.5, 1e-9);
    assert_close(&data["summary"]["T2_SwitchRuleRT"], 0.7, 1e-9);
    Ok(())
}

#[test]
fn parse_task3_ranks_and_buckets() -> Result<(), Box<dyn Error>> {
    let input = sample_path("test_data/logs/PE211005_IIN028_task3_5-15-2013-16-30-0.csv");
    let data = run_json(&["parse", "--input", &input])?;
    let ranks: Vec<i64> = data["trials"]
        .as_array()
        .expect("trials")
        .iter()
        .filter_map(|t| t["Rank"].as_i64())
        .collect();
    assert_eq!(ranks, [1, 1, 2, 1, 2, 3, 1]);
    let summary = &data["summary"];
    assert_close(&summary["T3_Load1Distance"], 20.0, 1e-9);
    assert_close(&summary["T3_Load2Distance"], 20.0, 1e-9);
    assert_close(&summary["T3_Load3Distance"], 15.0, 1e-9);
    assert_close(&summary["T3_Delay0.1Distance"], 17.5, 1e-9);
    assert_close(&summary["T3_Delay3Distance"], 20.0, 1e-9);
    Ok(())
}

#[test]
fn summarize_task4_and_task5() -> Result<(), Box<dyn Error>> {
    let task4 = sample_path("test_data/logs/PE211005_IIN028_task4_5-15-2013-16-35-40.csv");
    let summary = run_json(&["summarize", "--input", &task4])?;
    assert_close(&summary["T4_RandomRT"], 0.7, 1e-9);
    assert_close(&summary["T4_RuleRT"], 0.7, 1e-9);
    assert_close(&summary["T4_Block4RT"], 0.8, 1e-9);
    assert_close(&summary["T4_Block5RT"], 0.9, 1e-9);

    let task5 = sample_path("test_data/logs/PE211005_IIN028_task5_5-15-2013-16-40-3.csv");
    let summary = run_json(&["summarize", "--input", &task5])?;
    assert_close(&summary["T5_NumBadTouches"], 3.0, 1e-9);
    assert_close(&summary["T5_NumRepeats"], 0.5, 1e-9);
    assert_close(&summary["T5_AvgDistancePerTarget"], 150.0, 1e-9);
    Ok(())
}

#[test]
fn parse_stopping_layout() -> Result<(), Box<dyn Error>> {
    let input = sample_path("test_data/stopping/PE211005_IIN028_task5_5-15-2013-16-40-3.csv");
    let data = run_json(&["parse", "--input", &input, "--task5-format", "stopping"])?;
    assert_eq!(data["format"], "stopping");
    let flags: Vec<&Value> = data["trials"]
        .as_array()
        .expect("trials")
        .iter()
        .map(|t| &t["PrevTrialOrange"])
        .collect();
    assert_eq!(flags, [&Value::Bool(false), &Value::Bool(false), &Value::Bool(true)]);
    assert!(data["summary"]["T5_NumBadTouches"].is_null());
    Ok(())
}

#[test]
fn parse_reports_bad_line() {
    let input = sample_path("test_data/logs/PE211006_IIN028_task2_5-15-2013-17-0-0.csv");
    let mut cmd = cargo_bin_cmd!("cogbat");
    cmd.args(["parse", "--input", &input]);
    let output = cmd.assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8_lossy(&output);
    assert!(stderr.contains("line 6"), "{}", stderr);
    assert!(stderr.contains("Oops"), "{}", stderr);
}
