//! Line-oriented ingestion of test result logs
//!
//! Header and file-level problems are fatal. Problems on individual data
//! lines are recorded in the store's review ledger and the line is skipped.

use std::fs;
use std::path::Path;

use crate::error::{Result, TsrwError};
use crate::logger::Logger;
use crate::models::{Entry, EntryId, RejectReason};
use crate::parser::{DurationParser, FieldParser, StatusParser, TestCaseParser};
use crate::store::RecordStore;

/// Column separator of input and output files
pub const FIELD_SEPARATOR: char = ';';

/// The only accepted input header, column by column
pub const EXPECTED_HEADER: [&str; 3] = ["Test case", "Duration", "Status"];

/// Reads and validates test result logs into a [`RecordStore`]
#[derive(Debug, Clone)]
pub struct Ingestor {
    logger: Logger,
    test_case_parser: TestCaseParser,
    duration_parser: DurationParser,
    status_parser: StatusParser,
}

impl Ingestor {
    pub fn new(logger: Logger) -> Self {
        Self {
            test_case_parser: TestCaseParser::new(logger.clone()),
            duration_parser: DurationParser::new(logger.clone()),
            status_parser: StatusParser::new(logger.clone()),
            logger,
        }
    }

    /// Reads the whole file at `path` and ingests it.
    ///
    /// The skipped-lines summary is logged and printed to stdout.
    pub fn read_csv<P: AsRef<Path>>(&self, path: P) -> Result<RecordStore> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            self.logger.error(format!(
                "CSVHandler: Error reading file '{}': {}",
                path.display(),
                e
            ));
            TsrwError::InputFileNotFound(e.to_string())
        })?;

        let store = self.ingest_str(&content)?;
        if let Some(summary) = review_summary(&store) {
            print!("{}", summary);
        }
        Ok(store)
    }

    /// Ingests already loaded file content
    pub fn ingest_str(&self, content: &str) -> Result<RecordStore> {
        self.ingest_lines(&split_lines(content))
    }

    /// Validates the header, then every data line, and builds the store
    pub fn ingest_lines(&self, lines: &[&str]) -> Result<RecordStore> {
        let Some(header) = lines.first() else {
            self.logger.error("CSVHandler: File is empty.");
            return Err(TsrwError::EmptyFile);
        };
        self.check_header(header)?;

        if lines.len() == 1 {
            self.logger
                .error("CSVHandler: No data lines found after header.");
            return Err(TsrwError::NoDataLines);
        }

        let mut store = RecordStore::new();
        let mut next_id: EntryId = 1;

        for (index, line) in lines.iter().enumerate().skip(1) {
            let line_number = index + 1;
            match self.parse_line(line, line_number) {
                Ok(entry) => {
                    let inserted = store.add_entry(next_id, entry);
                    debug_assert!(inserted, "entry id {} assigned twice", next_id);
                    next_id += 1;
                }
                Err(reason) => store.add_review_line(line_number, reason),
            }
        }

        if store.is_empty() {
            self.logger.error("CSVHandler: No valid data lines found.");
            return Err(TsrwError::NoValidLines);
        }

        if !store.review_lines().is_empty() {
            let details: Vec<String> = store
                .review_lines()
                .iter()
                .map(|r| format!("({}, '{}')", r.line_number, r.reason))
                .collect();
            self.logger.warning(format!(
                "{} lines were skipped. Detailed reasons: [{}]",
                store.review_lines().len(),
                details.join(", ")
            ));
        }

        Ok(store)
    }

    fn check_header(&self, header: &str) -> Result<()> {
        let columns: Vec<&str> = header.trim().split(FIELD_SEPARATOR).collect();

        if columns.len() != EXPECTED_HEADER.len() {
            self.logger.error(format!(
                "CSVHandler: Invalid header. Expected 3 columns, found {}.",
                columns.len()
            ));
            return Err(TsrwError::HeaderColumnCount(columns.len()));
        }

        if columns != EXPECTED_HEADER {
            self.logger.error(format!(
                "CSVHandler: Header mismatch. Expected {:?}, got {:?}.",
                EXPECTED_HEADER, columns
            ));
            return Err(TsrwError::HeaderFormat);
        }

        Ok(())
    }

    /// Turns one data line into an entry, or the reason it must be skipped
    fn parse_line(
        &self,
        line: &str,
        line_number: usize,
    ) -> std::result::Result<Entry, RejectReason> {
        let columns: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        let [test_case_str, duration_str, status_str] = columns[..] else {
            self.logger.warning(format!(
                "CSVHandler: Line {} has {} columns, skipping.",
                line_number,
                columns.len()
            ));
            return Err(RejectReason::ColumnCount(columns.len()));
        };

        if [test_case_str, duration_str, status_str]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            self.logger.warning(format!(
                "CSVHandler: Empty field at line {}, skipping.",
                line_number
            ));
            return Err(RejectReason::EmptyField);
        }

        let Some(id) = self.test_case_parser.parse(test_case_str) else {
            self.logger.warning(format!(
                "CSVHandler: Test Case parsing error at line {}, skipping.",
                line_number
            ));
            return Err(RejectReason::TestCase(test_case_str.to_string()));
        };

        let Some(duration) = self.duration_parser.parse(duration_str) else {
            self.logger.warning(format!(
                "CSVHandler: Duration parsing error at line {}, skipping.",
                line_number
            ));
            return Err(RejectReason::Duration(duration_str.to_string()));
        };

        let Some(status) = self.status_parser.parse(status_str) else {
            self.logger.warning(format!(
                "CSVHandler: Status parsing error at line {}, skipping.",
                line_number
            ));
            return Err(RejectReason::Status(status_str.to_string()));
        };

        Ok(Entry {
            requirement: id.requirement,
            test_case: id.test_case,
            duration,
            status,
        })
    }
}

/// Splits on `\r\n`, `\n` and a bare `\r`; a final line break adds no empty line
pub fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        let Some(end) = rest.find(['\r', '\n']) else {
            lines.push(rest);
            break;
        };
        lines.push(&rest[..end]);
        let break_len = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + break_len..];
    }
    lines
}

/// Console text listing every skipped line, or `None` if nothing was skipped
pub fn review_summary(store: &RecordStore) -> Option<String> {
    let review_lines = store.review_lines();
    if review_lines.is_empty() {
        return None;
    }

    let mut output = format!("{} lines were skipped.\n", review_lines.len());
    for line in review_lines {
        output.push_str(&format!("  - {}\n", line));
    }
    Some(output)
}
