//! End-to-end runs of the analyze and simulate commands over temporary files

use clap::Parser;
use mq_cli::{commands, Cli, Command, MissionOutcome};
use serde_json::Value;
use std::path::Path;

fn parse(argv: &[&str]) -> Command {
    Cli::try_parse_from(argv).unwrap().command
}

fn simulate_into(dir: &Path, mission: &str, seed: u64) {
    let output = dir.join(format!("{mission}_data.csv"));
    let output = output.to_string_lossy().to_string();
    let seed = seed.to_string();
    match parse(&["mq", "simulate", "--samples", "800", "--seed", &seed, "--output", &output]) {
        Command::Simulate(args) => commands::simulate(&args).unwrap(),
        other => panic!("unexpected command {other:?}"),
    }
}

async fn analyze(argv: &[&str]) -> (Vec<MissionOutcome>, Value) {
    let args = match parse(argv) {
        Command::Analyze(args) => args,
        other => panic!("unexpected command {other:?}"),
    };
    let mut out = Vec::new();
    let outcomes = commands::analyze(&args, &mut out).await.unwrap();
    let json = serde_json::from_slice(&out).unwrap();
    (outcomes, json)
}

#[tokio::test]
async fn simulated_missions_produce_reports() {
    let dir = tempfile::tempdir().unwrap();
    simulate_into(dir.path(), "apollo", 1);
    simulate_into(dir.path(), "luna", 2);
    let data_dir = dir.path().to_string_lossy().to_string();

    let (outcomes, json) = analyze(&[
        "mq",
        "analyze",
        "apollo",
        "luna",
        "--data-dir",
        &data_dir,
        "--summary-limit",
        "3",
    ])
    .await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(MissionOutcome::is_report));

    let reports = json.as_array().unwrap();
    assert_eq!(reports[0]["mission"], "apollo");
    assert_eq!(reports[1]["mission"], "luna");
    for report in reports {
        assert_eq!(report["samples"], 800);
        assert!(report["summary"].as_array().unwrap().len() <= 3);
        assert_eq!(report["coefficients"]["a"][0], 1.0);
        assert!(report.get("filtered").is_none());

        // summaries list the earliest filtered peaks in order
        let peaks = report["filtered_peaks"].as_array().unwrap();
        for (record, peak) in report["summary"].as_array().unwrap().iter().zip(peaks) {
            assert_eq!(&record["index"], peak);
        }
    }
}

#[tokio::test]
async fn missing_mission_becomes_error_entry() {
    let dir = tempfile::tempdir().unwrap();
    simulate_into(dir.path(), "apollo", 3);
    let data_dir = dir.path().to_string_lossy().to_string();

    let (outcomes, json) =
        analyze(&["mq", "analyze", "artemis", "apollo", "--data-dir", &data_dir]).await;

    assert!(!outcomes[0].is_report());
    assert!(outcomes[1].is_report());

    let entry = &json[0];
    assert_eq!(entry["mission"], "artemis");
    assert!(entry["error"].as_str().unwrap().contains("artemis_data.csv"));
    assert_eq!(json[1]["mission"], "apollo");
}

#[tokio::test]
async fn filtered_series_on_request() {
    let dir = tempfile::tempdir().unwrap();
    simulate_into(dir.path(), "apollo", 4);
    let data_dir = dir.path().to_string_lossy().to_string();

    let (_, json) = analyze(&[
        "mq",
        "analyze",
        "--data-dir",
        &data_dir,
        "--include-filtered",
        "--sequential",
    ])
    .await;

    let report = &json[0];
    assert_eq!(report["mission"], "apollo");
    assert_eq!(report["filtered"].as_array().unwrap().len(), 800);
    assert_eq!(report["config"]["parallel_detection"], false);
}

#[tokio::test]
async fn too_short_dataset_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let csv = "\
,time_abs(%Y-%m-%dT%H:%M:%S.%f),time_rel(sec)
0,1970-01-19T00:00:00.000000,1.0
1,1970-01-19T00:00:01.000000,2.0
";
    std::fs::write(dir.path().join("apollo_data.csv"), csv).unwrap();
    let data_dir = dir.path().to_string_lossy().to_string();

    let (outcomes, json) = analyze(&["mq", "analyze", "--data-dir", &data_dir]).await;

    assert!(!outcomes[0].is_report());
    assert!(json[0]["error"]
        .as_str()
        .unwrap()
        .contains("Insufficient samples"));
}
