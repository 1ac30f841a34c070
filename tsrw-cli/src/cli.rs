use clap::Parser;
use std::path::PathBuf;

use tsrw_core::generator::{DEFAULT_FILE_NAME, DEFAULT_LINES};

#[derive(Parser, Debug)]
#[clap(
    name = "tsrw",
    author,
    version,
    about = "Ingest test result logs, report the longest tests and export sorted CSV"
)]
pub struct Cli {
    /// Path to the input CSV file
    #[clap(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Folder receiving the exported CSV
    #[clap(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Number of longest test cases to show
    #[clap(short = 'x', long = "top-x", allow_negative_numbers = true)]
    pub top_x: Option<i64>,

    /// Mirror log messages to the console
    #[clap(short = 'v', long)]
    pub verbose: bool,

    /// Folder receiving tsrw.log
    #[clap(short = 'L', long = "log-folder")]
    pub log_folder: Option<PathBuf>,

    /// Export order: Requirement, "Test Case", Duration, Status or none
    #[clap(short = 's', long = "sort-key")]
    pub sort_key: Option<String>,

    /// Generate sample data into sample_data/ and exit
    #[clap(
        short = 'g',
        long = "generate",
        num_args = 0..=1,
        default_missing_value = DEFAULT_FILE_NAME,
        value_name = "FILENAME"
    )]
    pub generate: Option<String>,

    /// Number of lines to generate
    #[clap(long, default_value_t = DEFAULT_LINES)]
    pub lines: usize,

    /// Append a timestamp to the exported file name
    #[clap(long)]
    pub timestamp: bool,

    /// Print plain lines instead of an aligned table
    #[clap(long)]
    pub plain: bool,

    /// Settings file to use instead of the default location
    #[clap(long)]
    pub config: Option<PathBuf>,
}
