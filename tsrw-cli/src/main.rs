mod cli;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tsrw_core::generator::generate_file;
use tsrw_core::{get_settings_path, Logger, RunOptions, Settings, StatisticsRun, TsrwError};

use crate::cli::Cli;

/// Folder receiving generated sample data
const SAMPLE_DATA_FOLDER: &str = "sample_data";

/// Logs the end of execution however `main` returns
struct ExecutionGuard {
    logger: Logger,
}

impl ExecutionGuard {
    fn new(logger: Logger) -> Self {
        logger.info("CLI: Execution started.");
        Self { logger }
    }
}

impl Drop for ExecutionGuard {
    fn drop(&mut self) {
        self.logger.info("Execution ended.");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            report_error(&e);
            return ExitCode::FAILURE;
        }
    };

    init_console_logging(cli.verbose || settings.verbose);

    let logger = Logger::new();
    let _guard = ExecutionGuard::new(logger.clone());

    match run(&cli, &settings, &logger) {
        Ok(code) => code,
        Err(e) => {
            logger.error(format!("CLI: {:#}", e));
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => get_settings_path()?,
    };
    Settings::load_or_default(&path)
}

/// Console mirror of the log facade; `RUST_LOG` takes precedence
fn init_console_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Off
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn report_error(error: &anyhow::Error) {
    let message = match error.downcast_ref::<TsrwError>() {
        Some(e) => format!("Error: {}", e),
        None => format!("Error: Unexpected error occurred: {:#}", error),
    };
    eprintln!("{}", message.red());
}

fn run(cli: &Cli, settings: &Settings, logger: &Logger) -> Result<ExitCode> {
    if let Some(file_name) = &cli.generate {
        let path = PathBuf::from(SAMPLE_DATA_FOLDER).join(file_name);
        generate_file(&path, cli.lines)
            .with_context(|| format!("Failed to generate sample data at {:?}", path))?;
        logger.info(format!(
            "CLI: Generated {} lines of sample data in '{}'.",
            cli.lines,
            path.display()
        ));
        println!(
            "{}",
            format!("Sample data written to {}", path.display()).green()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let (Some(input), Some(output)) = (&cli.input, &cli.output) else {
        eprintln!(
            "{}",
            "Error: -i and -o are required when not using -g.".red()
        );
        Cli::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    };

    let options = RunOptions {
        csv_path: input.clone(),
        output_folder: output.clone(),
        top_x: cli.top_x.unwrap_or(settings.top_x),
        sort_key: cli
            .sort_key
            .clone()
            .unwrap_or_else(|| settings.sort_key.clone()),
        log_folder: cli.log_folder.clone().or_else(|| settings.log_folder.clone()),
        timestamp: cli.timestamp || settings.timestamp,
        formatting: settings.formatting && !cli.plain,
    };

    let statistics = StatisticsRun::new(options, logger.clone())?;
    let report = statistics.run()?;
    logger.info(format!(
        "CLI: Run finished with {} parsed and {} skipped lines.",
        report.parsed, report.skipped
    ));

    if let Some(log_path) = logger.log_path() {
        println!("Log file is stored in: {}", log_path.display());
    }

    Ok(ExitCode::SUCCESS)
}
