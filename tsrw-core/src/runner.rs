//! One full statistics run: ingest, analyse, print and export

use std::fs;
use std::path::{Path, PathBuf};

use crate::analyser::{analyze, validate_top_x};
use crate::error::{Result, TsrwError};
use crate::export::export_csv;
use crate::ingest::Ingestor;
use crate::logger::Logger;
use crate::models::ExportOrder;
use crate::printer::Printer;

/// Unvalidated options of a run, as collected from flags and settings
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub csv_path: PathBuf,
    pub output_folder: PathBuf,
    pub top_x: i64,
    pub sort_key: String,
    pub log_folder: Option<PathBuf>,
    pub timestamp: bool,
    pub formatting: bool,
}

impl RunOptions {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(csv_path: P, output_folder: Q) -> Self {
        Self {
            csv_path: csv_path.into(),
            output_folder: output_folder.into(),
            top_x: 10,
            sort_key: ExportOrder::default().to_string(),
            log_folder: None,
            timestamp: false,
            formatting: true,
        }
    }
}

/// What a completed run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub export_path: PathBuf,
    pub parsed: usize,
    pub skipped: usize,
}

/// Validated run configuration
#[derive(Debug)]
pub struct StatisticsRun {
    csv_path: PathBuf,
    output_folder: PathBuf,
    top_x: usize,
    order: ExportOrder,
    timestamp: bool,
    printer: Printer,
    logger: Logger,
}

impl StatisticsRun {
    /// Checks every option, creating the output and log folders if needed
    pub fn new(options: RunOptions, logger: Logger) -> Result<Self> {
        if let Some(log_folder) = &options.log_folder {
            attach_log_folder(&logger, log_folder)?;
        }

        let csv_path = check_csv_path(&options.csv_path, &logger)?;
        let output_folder = create_folder(&options.output_folder, &logger)?;
        let top_x = validate_top_x(options.top_x, &logger)?;
        let order = parse_order(&options.sort_key, &logger)?;

        Ok(Self {
            csv_path,
            output_folder,
            top_x,
            order,
            timestamp: options.timestamp,
            printer: Printer::new(options.formatting),
            logger,
        })
    }

    pub fn set_csv_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.csv_path = check_csv_path(path.as_ref(), &self.logger)?;
        Ok(())
    }

    pub fn set_output_folder<P: AsRef<Path>>(&mut self, folder: P) -> Result<()> {
        self.output_folder = create_folder(folder.as_ref(), &self.logger)?;
        Ok(())
    }

    pub fn set_top_x(&mut self, top_x: i64) -> Result<()> {
        self.top_x = validate_top_x(top_x, &self.logger)?;
        Ok(())
    }

    pub fn set_sort_key(&mut self, sort_key: &str) -> Result<()> {
        self.order = parse_order(sort_key, &self.logger)?;
        Ok(())
    }

    pub fn set_log_folder<P: AsRef<Path>>(&mut self, folder: P) -> Result<()> {
        attach_log_folder(&self.logger, folder.as_ref())?;
        Ok(())
    }

    pub fn set_timestamp(&mut self, timestamp: bool) {
        self.timestamp = timestamp;
    }

    pub fn set_formatting(&mut self, formatting: bool) {
        self.printer = Printer::new(formatting);
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    pub fn top_x(&self) -> usize {
        self.top_x
    }

    pub fn order(&self) -> ExportOrder {
        self.order
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Ingests the input into a fresh store, prints the analysis and exports
    pub fn run(&self) -> Result<RunReport> {
        self.logger.info(format!(
            "StatisticsRun: Processing '{}'.",
            self.csv_path.display()
        ));

        let store = Ingestor::new(self.logger.clone()).read_csv(&self.csv_path)?;

        let analysis = analyze(&store, self.top_x);
        self.printer.display_results(&analysis);

        let export_path = export_csv(
            &store,
            &self.csv_path,
            &self.output_folder,
            self.order,
            self.timestamp,
            &self.logger,
        )?;

        Ok(RunReport {
            export_path,
            parsed: analysis.case_counts.parsed,
            skipped: analysis.case_counts.skipped,
        })
    }
}

fn check_csv_path(path: &Path, logger: &Logger) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    logger.error(format!(
        "StatisticsRun: Input file '{}' does not exist.",
        path.display()
    ));
    Err(TsrwError::InputFileNotFound(path.display().to_string()))
}

fn create_folder(folder: &Path, logger: &Logger) -> Result<PathBuf> {
    fs::create_dir_all(folder).map_err(|e| {
        logger.error(format!(
            "StatisticsRun: Cannot create folder '{}': {}",
            folder.display(),
            e
        ));
        TsrwError::OutputFolder {
            path: folder.to_path_buf(),
            message: e.to_string(),
        }
    })?;
    Ok(folder.to_path_buf())
}

fn parse_order(sort_key: &str, logger: &Logger) -> Result<ExportOrder> {
    sort_key.parse().map_err(|e| {
        logger.error(format!("StatisticsRun: {}", e));
        e
    })
}

fn attach_log_folder(logger: &Logger, folder: &Path) -> Result<PathBuf> {
    create_folder(folder, logger)?;
    logger
        .set_log_folder(folder)
        .map_err(|e| TsrwError::OutputFolder {
            path: folder.to_path_buf(),
            message: e.to_string(),
        })
}
