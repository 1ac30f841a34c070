//! End-to-end ingestion and export against files on disk

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use tsrw_core::generator::generate;
use tsrw_core::{
    write_records, Entry, ExportOrder, Ingestor, Level, Logger, RecordStore, RejectReason,
    RunOptions, SortKey, StatisticsRun, TsrwError,
};

fn write_csv(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}

fn read(path: &Path) -> std::result::Result<RecordStore, TsrwError> {
    Ingestor::new(Logger::new()).read_csv(path)
}

#[test]
fn test_short_line_is_skipped_and_recorded() -> Result<()> {
    let dir = tempdir()?;
    let path = write_csv(
        dir.path(),
        "input.csv",
        "Test case;Duration;Status\n\
         R1\\TC1;5 sec\n\
         R2\\TC2;2 min 48 sec;Passed\n\
         R3\\TC3;1 hr;Failed\n",
    )?;

    let store = read(&path)?;
    assert_eq!(store.size(), 2);
    assert_eq!(store.review_lines().len(), 1);

    let review = &store.review_lines()[0];
    assert_eq!(review.line_number, 2);
    assert_eq!(review.reason, RejectReason::ColumnCount(2));
    assert_eq!(review.reason.to_string(), "2 columns instead of 3");
    Ok(())
}

#[test]
fn test_header_must_match_exactly() -> Result<()> {
    let dir = tempdir()?;

    let wrong_name = write_csv(dir.path(), "a.csv", "Test;Duration;Status\nR\\T;1 sec;Passed\n")?;
    assert!(matches!(read(&wrong_name), Err(TsrwError::HeaderFormat)));

    let two_columns = write_csv(dir.path(), "b.csv", "Test case;Duration\nR\\T;1 sec;Passed\n")?;
    assert!(matches!(
        read(&two_columns),
        Err(TsrwError::HeaderColumnCount(2))
    ));
    Ok(())
}

#[test]
fn test_fatal_file_conditions() -> Result<()> {
    let dir = tempdir()?;

    let missing = dir.path().join("missing.csv");
    assert!(matches!(
        read(&missing),
        Err(TsrwError::InputFileNotFound(_))
    ));

    let empty = write_csv(dir.path(), "empty.csv", "")?;
    assert!(matches!(read(&empty), Err(TsrwError::EmptyFile)));

    let header_only = write_csv(dir.path(), "header.csv", "Test case;Duration;Status\n")?;
    assert!(matches!(read(&header_only), Err(TsrwError::NoDataLines)));

    let all_invalid = write_csv(
        dir.path(),
        "invalid.csv",
        "Test case;Duration;Status\nR\\T;5sec;Passed\nnoseparator;1 sec;Passed\n",
    )?;
    let logger = Logger::new();
    let result = Ingestor::new(logger.clone()).read_csv(&all_invalid);
    assert!(matches!(result, Err(TsrwError::NoValidLines)));
    assert!(!logger.messages(Level::Error).is_empty());
    Ok(())
}

fn valid_rows(store: &RecordStore) -> Vec<(String, String, String, f64)> {
    store
        .entries()
        .map(|(_, e)| {
            (
                e.requirement.clone(),
                e.test_case.clone(),
                e.status.clone(),
                e.duration,
            )
        })
        .collect()
}

/// Turns exported rows back into the input layout
fn to_input_layout(exported: &str) -> String {
    let mut out = String::from("Test case;Duration;Status\n");
    for line in exported.lines().skip(1) {
        let fields: Vec<&str> = line.split(';').collect();
        out.push_str(&format!(
            "{}\\{};{} sec;{}\n",
            fields[0], fields[1], fields[2], fields[3]
        ));
    }
    out
}

#[test]
fn test_export_and_reingest_preserves_records() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut generated = Vec::new();
    generate(&mut generated, 300, &mut rng)?;
    let generated = String::from_utf8(generated)?;

    let ingestor = Ingestor::new(Logger::new());
    let original = ingestor.ingest_str(&generated)?;

    let mut exported = Vec::new();
    write_records(&original, ExportOrder::Insertion, &mut exported)?;
    let exported = String::from_utf8(exported)?;

    let reingested = ingestor.ingest_str(&to_input_layout(&exported))?;
    assert_eq!(reingested.size(), original.size());
    assert!(reingested.review_lines().is_empty());

    for (before, after) in valid_rows(&original).iter().zip(valid_rows(&reingested)) {
        assert_eq!(before.0, after.0);
        assert_eq!(before.1, after.1);
        assert_eq!(before.2, after.2);
        assert!(
            (before.3 - after.3).abs() <= 1e-3,
            "duration {} came back as {}",
            before.3,
            after.3
        );
    }
    Ok(())
}

#[test]
fn test_sort_indices_are_ready_after_ingestion() -> Result<()> {
    let dir = tempdir()?;
    let path = write_csv(
        dir.path(),
        "input.csv",
        "Test case;Duration;Status\n\
         Motor\\A;1 sec;Passed\n\
         10_Motor_2\\B;3 sec;Failed\n\
         2_Motor_10\\C;2 sec;Passed\n",
    )?;
    let store = read(&path)?;

    assert_eq!(store.sorted_ids(SortKey::Requirement), &[3, 2, 1]);
    assert_eq!(store.sorted_ids(SortKey::Duration), &[1, 3, 2]);
    assert_eq!(store.sorted_ids(SortKey::TestCase), &[1, 2, 3]);
    assert_eq!(store.status_group("Passed"), Some(&[1, 3][..]));
    assert_eq!(
        store.get(2),
        Some(&Entry {
            requirement: "10_Motor_2".into(),
            test_case: "B".into(),
            duration: 3.0,
            status: "Failed".into(),
        })
    );
    Ok(())
}

#[test]
fn test_statistics_run_end_to_end() -> Result<()> {
    let dir = tempdir()?;
    let mut rng = StdRng::seed_from_u64(3);
    let mut generated = Vec::new();
    generate(&mut generated, 50, &mut rng)?;
    let csv = dir.path().join("sample.csv");
    fs::write(&csv, generated)?;

    let out = dir.path().join("export");
    let logs = dir.path().join("logs");
    let mut options = RunOptions::new(&csv, &out);
    options.top_x = 5;
    options.sort_key = "Status".into();
    options.log_folder = Some(logs.clone());
    options.formatting = false;

    let logger = Logger::new();
    let run = StatisticsRun::new(options, logger.clone())?;
    let report = run.run()?;

    assert_eq!(report.parsed, 50);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.export_path, out.join("sample_sorted_by_Status.csv"));

    let exported = fs::read_to_string(&report.export_path)?;
    let statuses: Vec<&str> = exported
        .lines()
        .skip(1)
        .filter_map(|l| l.rsplit(';').next())
        .collect();
    assert_eq!(statuses.len(), 50);
    assert!(statuses.windows(2).all(|w| w[0] <= w[1]));

    assert!(logs.join("tsrw.log").is_file());
    assert!(logger
        .messages(Level::Info)
        .iter()
        .any(|m| m.starts_with("CSVHandler: Exported CSV")));
    Ok(())
}
