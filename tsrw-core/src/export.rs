use chrono::Local;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{Result, TsrwError};
use crate::logger::Logger;
use crate::models::{EntryId, ExportOrder};
use crate::store::RecordStore;

/// Header line of every exported file
pub const EXPORT_HEADER: &str = "Requirement;Test Case;Duration;Status";

/// Formats seconds with precision depending on magnitude, without trailing zeros
pub fn format_duration(seconds: f64) -> String {
    let formatted = if seconds < 1e-6 {
        format!("{:.9}", seconds)
    } else if seconds < 60.0 {
        format!("{:.6}", seconds)
    } else {
        format!("{:.3}", seconds)
    };
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Builds `<input stem>_sorted_by_<key>[_<timestamp>_<uuid6>].csv`
pub fn output_file_name(csv_path: &Path, order: ExportOrder, timestamp: bool) -> String {
    let stem = csv_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{}_", stem);

    if let ExportOrder::By(key) = order {
        name.push_str(&format!("sorted_by_{}", key));
    }

    if timestamp {
        let uuid = Uuid::new_v4().simple().to_string();
        name.push_str(&format!(
            "_{}_{}",
            Local::now().format("%Y%m%d_%H%M%S"),
            &uuid[..6]
        ));
    }

    name.push_str(".csv");
    name
}

fn write_ids<W, I>(store: &RecordStore, ids: I, writer: &mut W) -> io::Result<()>
where
    W: Write,
    I: Iterator<Item = EntryId>,
{
    writeln!(writer, "{}", EXPORT_HEADER)?;
    for id in ids {
        let Some(entry) = store.get(id) else {
            continue;
        };
        writeln!(
            writer,
            "{};{};{};{}",
            entry.requirement,
            entry.test_case,
            format_duration(entry.duration),
            entry.status
        )?;
    }
    writer.flush()
}

/// Streams the header and one line per record, in the store's pre-built order
pub fn write_records<W: Write>(
    store: &RecordStore,
    order: ExportOrder,
    writer: &mut W,
) -> io::Result<()> {
    match order {
        ExportOrder::By(key) => write_ids(store, store.sorted_ids(key).iter().copied(), writer),
        ExportOrder::Insertion => write_ids(store, store.entries().map(|(id, _)| id), writer),
    }
}

/// Export records to `<export_folder>/<generated name>` and return the path
pub fn export_csv(
    store: &RecordStore,
    csv_path: &Path,
    export_folder: &Path,
    order: ExportOrder,
    timestamp: bool,
    logger: &Logger,
) -> Result<PathBuf> {
    let export_file = export_folder.join(output_file_name(csv_path, order, timestamp));

    let written = File::create(&export_file).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write_records(store, order, &mut writer)
    });

    match written {
        Ok(()) => {
            logger.info(format!(
                "CSVHandler: Exported CSV to '{}'.",
                export_file.display()
            ));
            println!("CSV exported successfully to {}", export_file.display());
            Ok(export_file)
        }
        Err(e) => {
            logger.error(format!("CSVHandler: Failed exporting CSV: {}", e));
            Err(TsrwError::Export(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, SortKey};
    use std::fs;
    use tempfile::tempdir;

    fn sample_store() -> RecordStore {
        let mut store = RecordStore::new();
        let rows = [
            ("10_Motor_2", "LoadTest", 125.5, "Passed"),
            ("2_Motor_10", "Check", 0.25, "Failed"),
            ("Motor", "Alarm", 3e-9, "Unknown"),
        ];
        for (i, (requirement, test_case, duration, status)) in rows.into_iter().enumerate() {
            store.add_entry(
                i as EntryId + 1,
                Entry {
                    requirement: requirement.into(),
                    test_case: test_case.into(),
                    duration,
                    status: status.into(),
                },
            );
        }
        store
    }

    fn render(store: &RecordStore, order: ExportOrder) -> String {
        let mut buffer = Vec::new();
        write_records(store, order, &mut buffer).expect("write to memory");
        String::from_utf8(buffer).expect("utf-8 output")
    }

    #[test]
    fn test_format_duration_tiers() {
        assert_eq!(format_duration(3e-9), "0.000000003");
        assert_eq!(format_duration(0.25), "0.25");
        assert_eq!(format_duration(5.0), "5");
        assert_eq!(format_duration(59.1234567), "59.123457");
        assert_eq!(format_duration(168.0), "168");
        assert_eq!(format_duration(100.0), "100");
        assert_eq!(format_duration(7200.25), "7200.25");
    }

    #[test]
    fn test_write_records_by_duration() {
        let output = render(&sample_store(), ExportOrder::By(SortKey::Duration));
        assert_eq!(
            output,
            "Requirement;Test Case;Duration;Status\n\
             Motor;Alarm;0.000000003;Unknown\n\
             2_Motor_10;Check;0.25;Failed\n\
             10_Motor_2;LoadTest;125.5;Passed\n"
        );
    }

    #[test]
    fn test_write_records_by_requirement() {
        let output = render(&sample_store(), ExportOrder::By(SortKey::Requirement));
        let requirements: Vec<&str> = output
            .lines()
            .skip(1)
            .map(|l| l.split(';').next().unwrap_or_default())
            .collect();
        assert_eq!(requirements, vec!["2_Motor_10", "10_Motor_2", "Motor"]);
    }

    #[test]
    fn test_write_records_insertion_order() {
        let output = render(&sample_store(), ExportOrder::Insertion);
        let test_cases: Vec<&str> = output
            .lines()
            .skip(1)
            .map(|l| l.split(';').nth(1).unwrap_or_default())
            .collect();
        assert_eq!(test_cases, vec!["LoadTest", "Check", "Alarm"]);
    }

    #[test]
    fn test_output_file_name() {
        let path = Path::new("/data/4d_printer_test_data.csv");
        assert_eq!(
            output_file_name(path, ExportOrder::By(SortKey::Duration), false),
            "4d_printer_test_data_sorted_by_Duration.csv"
        );
        assert_eq!(
            output_file_name(path, ExportOrder::By(SortKey::TestCase), false),
            "4d_printer_test_data_sorted_by_Test Case.csv"
        );
        assert_eq!(
            output_file_name(path, ExportOrder::Insertion, false),
            "4d_printer_test_data_.csv"
        );
    }

    #[test]
    fn test_output_file_name_with_timestamp() {
        let name = output_file_name(Path::new("run.csv"), ExportOrder::Insertion, true);
        // run__YYYYmmdd_HHMMSS_xxxxxx.csv
        assert!(name.starts_with("run__"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "run__".len() + 15 + 1 + 6 + ".csv".len());
    }

    #[test]
    fn test_export_csv_writes_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let logger = Logger::new();
        let path = export_csv(
            &sample_store(),
            Path::new("input.csv"),
            dir.path(),
            ExportOrder::By(SortKey::Status),
            false,
            &logger,
        )?;

        assert_eq!(path, dir.path().join("input_sorted_by_Status.csv"));
        let content = fs::read_to_string(&path)?;
        let statuses: Vec<&str> = content
            .lines()
            .skip(1)
            .filter_map(|l| l.rsplit(';').next())
            .collect();
        assert_eq!(statuses, vec!["Failed", "Passed", "Unknown"]);
        assert_eq!(logger.messages(crate::logger::Level::Info).len(), 1);
        Ok(())
    }

    #[test]
    fn test_export_csv_missing_folder_is_fatal() {
        let dir = tempdir().expect("temp dir");
        let missing = dir.path().join("does").join("not").join("exist");
        let logger = Logger::new();

        let result = export_csv(
            &sample_store(),
            Path::new("input.csv"),
            &missing,
            ExportOrder::Insertion,
            false,
            &logger,
        );

        assert!(matches!(result, Err(TsrwError::Export(_))));
        assert_eq!(logger.messages(crate::logger::Level::Error).len(), 1);
    }
}
