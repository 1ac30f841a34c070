pub mod analyser;
pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod ingest;
pub mod logger;
pub mod models;
pub mod parser;
pub mod printer;
pub mod runner;
pub mod store;

// Re-export commonly used types
pub use analyser::{analyze, Analysis, CaseCounts};
pub use config::{get_settings_path, Settings};
pub use error::TsrwError;
pub use export::{export_csv, format_duration, write_records};
pub use ingest::{review_summary, Ingestor};
pub use logger::{Level, LogRecord, Logger};
pub use models::{
    Entry, EntryId, ExportOrder, Numeral, Prefix, RejectReason, RequirementKey, ReviewLine,
    SortKey,
};
pub use printer::Printer;
pub use runner::{RunOptions, RunReport, StatisticsRun};
pub use store::{RecordStore, SortIndex, StatusGroup};
