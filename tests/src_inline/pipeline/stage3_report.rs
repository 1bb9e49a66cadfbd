use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::channels::{ChannelEntry, ChannelStatus};
use crate::cohort::CohortAggregator;
use crate::config::ReportSettings;
use crate::input::{MemorySource, ScoreRecord};
use crate::pipeline::stage2_aggregate::run_stage2;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_decodeqc_report_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn build(repo: &ScoreRepository) -> SummaryData {
    let agg = CohortAggregator::new(repo).unwrap();
    let out = run_stage2(&agg, &ReportSettings::default()).unwrap();
    SummaryData {
        tool_name: "kira-decodeqc".to_string(),
        tool_version: "test".to_string(),
        chance_level: 0.5,
        window: out.window,
        cohort: repo.cohort().unwrap().to_vec(),
        times: repo.time_axis().unwrap().clone(),
        reports: out.reports,
        aggregate: out.aggregate,
    }
}

#[test]
fn test_write_reports_three_subjects() {
    let source = MemorySource::new()
        .with("S1", "A-vs-B", ScoreRecord::new(vec![0.0, 0.1], vec![0.5, 0.6]))
        .with("S2", "A-vs-B", ScoreRecord::new(vec![0.0, 0.1], vec![0.7, 0.8]))
        .with("S3", "A-vs-B", ScoreRecord::new(vec![0.0, 0.1], vec![0.3, 0.4]));
    let repo =
        ScoreRepository::from_source(&ids(&["S1", "S2", "S3"]), &ids(&["A-vs-B"]), &source)
            .unwrap();
    let summary = build(&repo);
    let dir = make_temp_dir();
    write_reports(&summary, &repo, &dir).unwrap();

    let curves = fs::read_to_string(dir.join("curves.tsv")).unwrap();
    let lines: Vec<&str> = curves.lines().collect();
    assert_eq!(
        lines[0],
        "time\tA-vs-B_mean\tA-vs-B_sem\tA-vs-B_lower\tA-vs-B_upper"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("0.000000\t0.500000\t0.115470\t0.384530\t0.615470"));

    let subjects = fs::read_to_string(dir.join("subject_curves.tsv")).unwrap();
    let lines: Vec<&str> = subjects.lines().collect();
    assert_eq!(lines[0], "time\tS1:A-vs-B\tS2:A-vs-B\tS3:A-vs-B");
    assert_eq!(lines[2], "0.100000\t0.600000\t0.800000\t0.400000");

    let json = fs::read_to_string(dir.join("summary.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["input"]["n_subjects"], 3);
    assert_eq!(value["contrasts"][0]["name"], "A-vs-B");
    assert_eq!(value["contrasts"][0]["mean"].as_array().unwrap().len(), 2);
    assert_eq!(value["contrasts"][0]["subject_peaks"][1]["subject"], "S2");

    let report = fs::read_to_string(dir.join("report.txt")).unwrap();
    assert!(report.contains("A-vs-B (n=3)"));
    assert!(report.contains("S2: 0.800000 at 0.100000 s"));
}

#[test]
fn test_single_subject_sem_columns_are_na() {
    let source = MemorySource::new().with(
        "S1",
        "A-vs-B",
        ScoreRecord::new(vec![0.0, 0.1], vec![f64::NAN, 0.6]),
    );
    let repo = ScoreRepository::from_source(&ids(&["S1"]), &ids(&["A-vs-B"]), &source).unwrap();
    let summary = build(&repo);
    let dir = make_temp_dir();
    write_reports(&summary, &repo, &dir).unwrap();

    let curves = fs::read_to_string(dir.join("curves.tsv")).unwrap();
    let lines: Vec<&str> = curves.lines().collect();
    assert_eq!(lines[1], "0.000000\tNaN\tNA\tNA\tNA");
    assert_eq!(lines[2], "0.100000\t0.600000\tNA\tNA\tNA");

    let json = fs::read_to_string(dir.join("summary.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["contrasts"][0]["sem"].is_null());
    assert!(value["contrasts"][0]["mean"][0].is_null());
}

#[test]
fn test_write_channel_table() {
    let dir = make_temp_dir();
    let entries = vec![
        ChannelEntry {
            name: "EEG001".to_string(),
            status: ChannelStatus::Normal,
        },
        ChannelEntry {
            name: "EEG002".to_string(),
            status: ChannelStatus::Flagged,
        },
    ];
    write_channel_table(&entries, &dir).unwrap();
    let text = fs::read_to_string(dir.join("channels.tsv")).unwrap();
    assert_eq!(text, "channel\tstatus\nEEG001\tnormal\nEEG002\tflagged\n");
}
