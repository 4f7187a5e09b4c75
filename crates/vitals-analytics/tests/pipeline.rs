//! End-to-end pipeline scenarios over raw commit streams.

use chrono::NaiveDate;
use vitals_analytics::health::Tier;
use vitals_analytics::report::generate;
use vitals_core::{FileChange, RawCommit, VitalsConfig, Window};

fn january() -> Window {
    Window {
        start: NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        end: NaiveDate::from_ymd_opt(2026, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    }
}

fn raw(
    id: &str,
    author: &str,
    timestamp: &str,
    repo: &str,
    files: Vec<(&str, u64, u64)>,
) -> RawCommit {
    RawCommit {
        id: id.into(),
        author: author.into(),
        email: format!("{author}@example.com"),
        timestamp: timestamp.into(),
        repository: repo.into(),
        message: "feat: change".into(),
        files: files
            .into_iter()
            .map(|(path, added, deleted)| FileChange {
                path: path.into(),
                added,
                deleted,
            })
            .collect(),
    }
}

// One +500/-0 commit on Saturday 23:00: large (-5), late-night (-2),
// weekend (-1), nothing else. 2026-01-03 is a Saturday.
#[test]
fn saturday_night_mega_commit_scores_92() {
    let records = vec![raw(
        "c1",
        "alice",
        "2026-01-03 23:00:00",
        "billing",
        vec![("src/dump.rs", 500, 0)],
    )];
    let report = generate(&records, january(), &VitalsConfig::default()).unwrap();
    assert_eq!(report.health.value, 92.0);
    assert_eq!(report.health.deductions.len(), 3);
    assert_eq!(report.work_pattern.weekend, 1);
}

// Six commits to one file inside three days with churn_count=5 flags it;
// as the only file touched, the churn rate is exactly 1.
#[test]
fn six_commits_in_three_days_is_full_churn() {
    let records: Vec<RawCommit> = (0..6)
        .map(|i| {
            raw(
                &format!("c{i}"),
                "alice",
                &format!("2026-01-{:02} {:02}:00:00", 5 + i / 2, 10 + (i % 2) * 3),
                "billing",
                vec![("src/flaky.rs", 20, 5)],
            )
        })
        .collect();
    let report = generate(&records, january(), &VitalsConfig::default()).unwrap();
    assert_eq!(report.churn.records.len(), 1);
    assert!(report.churn.records[0].flagged);
    assert_eq!(report.churn.churn_rate, 1.0);
}

// +100 on day 0, -40 on day 2: 40 lines reworked, per-file ratio 0.4.
#[test]
fn forty_of_a_hundred_lines_reworked() {
    let records = vec![
        raw("c1", "alice", "2026-01-05 10:00:00", "billing", vec![("src/api.rs", 100, 0)]),
        raw("c2", "bob", "2026-01-07 10:00:00", "billing", vec![("src/api.rs", 0, 40)]),
    ];
    let report = generate(&records, january(), &VitalsConfig::default()).unwrap();
    let record = report
        .rework
        .records
        .iter()
        .find(|r| r.file == "src/api.rs")
        .unwrap();
    assert_eq!(record.reworked_lines, 40);
    assert!((record.rework_ratio - 0.4).abs() < f64::EPSILON);
}

// An empty commit list is a valid terminal state, not an error.
#[test]
fn empty_input_is_all_zeros_and_perfect_health() {
    let report = generate(&[], january(), &VitalsConfig::default()).unwrap();
    assert_eq!(report.health.value, 100.0);
    assert_eq!(report.health.tier, Tier::Excellent);
    assert_eq!(report.churn.churn_rate, 0.0);
    assert_eq!(report.rework.rework_ratio, 0.0);
    assert!(report.hotspots.is_empty());
    assert!(report.developers.is_empty());
    assert_eq!(report.totals.commit_count, 0);
}

// Two developers with identical nets rank by name, whatever the input order.
#[test]
fn identical_nets_rank_by_name() {
    let forward = vec![
        raw("c1", "zoe", "2026-01-05 10:00:00", "billing", vec![("a.rs", 100, 0)]),
        raw("c2", "amy", "2026-01-05 11:00:00", "billing", vec![("b.rs", 100, 0)]),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    for records in [forward, reversed] {
        let report = generate(&records, january(), &VitalsConfig::default()).unwrap();
        let names: Vec<&str> = report.developers.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["amy", "zoe"]);
    }
}

// The same commit reachable through several branch enumerations counts once,
// and the pipeline is byte-identical across invocations.
#[test]
fn pipeline_is_idempotent_and_dedup_is_stable() {
    let mut records = Vec::new();
    for branch_pass in 0..3 {
        for i in 0..10 {
            let mut record = raw(
                &format!("c{i}"),
                ["alice", "bob"][i % 2],
                &format!("2026-01-{:02} {:02}:30:00", 2 + i, 8 + i),
                "billing",
                vec![("src/core.rs", 30, 12), ("src/util.rs", 4, 0)],
            );
            if branch_pass > 0 {
                // later branch observations of the same commit carry noise
                // that must be ignored under first-seen-wins
                record.files.push(FileChange {
                    path: "phantom.rs".into(),
                    added: 999,
                    deleted: 0,
                });
            }
            records.push(record);
        }
    }

    let config = VitalsConfig::default();
    let first = generate(&records, january(), &config).unwrap();
    let second = generate(&records, january(), &config).unwrap();

    assert_eq!(first.commit_count, 10);
    assert_eq!(first.duplicates_discarded, 20);
    assert!(first.hotspots.iter().all(|h| h.file != "phantom.rs"));
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

// Score stays in [0, 100] across a spread of pathological inputs.
#[test]
fn health_score_stays_in_range() {
    let config = VitalsConfig::default();
    let mut cases: Vec<Vec<RawCommit>> = vec![vec![]];

    // everything wrong at once: huge weekend late-night commits, full churn
    cases.push(
        (0..50)
            .map(|i| {
                raw(
                    &format!("bad{i}"),
                    "alice",
                    "2026-01-03 23:30:00",
                    "billing",
                    vec![("src/mess.rs", 2000, 1999)],
                )
            })
            .collect(),
    );
    // calm weekday work
    let paths = ["src/a.rs", "src/b.rs", "src/c.rs", "src/d.rs", "src/e.rs"];
    cases.push(
        (0..5)
            .map(|i| {
                raw(
                    &format!("ok{i}"),
                    "bob",
                    &format!("2026-01-{:02} 11:00:00", 5 + i * 2),
                    "billing",
                    vec![(paths[i], 40, 5)],
                )
            })
            .collect(),
    );

    for records in cases {
        let report = generate(&records, january(), &config).unwrap();
        assert!(
            (0.0..=100.0).contains(&report.health.value),
            "score {} out of range",
            report.health.value
        );
        for record in &report.rework.records {
            assert!((0.0..=1.0).contains(&record.rework_ratio));
        }
        assert!((0.0..=1.0).contains(&report.churn.churn_rate));
    }
}

// Inverted or degenerate config fails before any analysis happens.
#[test]
fn config_errors_are_fatal_up_front() {
    let bad = [
        "[thresholds]\nchurn_count = 0\n",
        "[thresholds]\nrework_add_days = -1\n",
        "[working_hours]\nnormal_start = \"nine\"\n",
        "[working_hours]\novertime_start = \"18:00\"\novertime_end = \"18:00\"\n",
        "[health]\nchurn_rate_warning = 0.4\nchurn_rate_danger = 0.2\n",
    ];
    for toml in bad {
        let config = VitalsConfig::from_toml(toml).unwrap();
        let records = vec![raw("c1", "alice", "2026-01-05 10:00:00", "billing", vec![])];
        assert!(
            generate(&records, january(), &config).is_err(),
            "expected fatal config error for {toml:?}"
        );
    }
}
