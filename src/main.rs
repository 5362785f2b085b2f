//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `mass_detect` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use mass_detect::config::{
    DEFAULT_API_ENDPOINT, DEFAULT_DETECTOR_ARGS, DEFAULT_DETECTOR_COMMAND, DEFAULT_OUTPUT_FILE,
};
use mass_detect::export::ReportTarget;
use mass_detect::initialization::init_logger_with;
use mass_detect::{run_batch, BackendKind, Config, CsvPivot, LogFormat, LogLevel, OutputFormat};

/// Run a technology detector over a list of URLs and pivot the results.
#[derive(Debug, Parser)]
#[command(name = "mass_detect", version, about)]
struct Cli {
    /// File with one URL per line (`#` and `;` start comments)
    #[arg(short = 'i', long = "inputfile")]
    file: PathBuf,

    /// Output file; the format extension is appended when missing, `-` writes to stdout
    #[arg(short = 'o', long = "outputfile", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Report format
    #[arg(short = 'f', long = "outputformat", value_enum, default_value_t = OutputFormat::Xlsx)]
    format: OutputFormat,

    /// Pivot written when the format is csv
    #[arg(long, value_enum, default_value_t = CsvPivot::Url)]
    csv_pivot: CsvPivot,

    /// Detection strategy
    #[arg(long, value_enum, default_value_t = BackendKind::Process)]
    backend: BackendKind,

    /// Detector command line; the URL is appended after it
    #[arg(short = 'w', long = "wappalyzerpath", default_value = DEFAULT_DETECTOR_COMMAND)]
    detector_command: String,

    /// Extra detector arguments, placed after the URL (query parameters for --backend api)
    #[arg(
        short = 'c',
        long = "wappalyzerargs",
        default_value = DEFAULT_DETECTOR_ARGS,
        allow_hyphen_values = true
    )]
    detector_args: String,

    /// Lookup endpoint for --backend api
    #[arg(long, default_value = DEFAULT_API_ENDPOINT)]
    api_endpoint: String,

    /// API key for --backend api
    #[arg(long, env = "WAPPALYZER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum detector invocations in flight
    #[arg(
        short = 'a',
        long = "asynch-workers",
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_concurrency: u32,

    /// Per-URL timeout in seconds
    #[arg(
        long,
        default_value_t = 500,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_seconds: u64,

    /// Log the detector command lines and forward their stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    log_format: LogFormat,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            file: cli.file,
            output: cli.output,
            format: cli.format,
            csv_pivot: cli.csv_pivot,
            backend: cli.backend,
            detector_command: cli.detector_command,
            detector_args: cli.detector_args,
            api_endpoint: cli.api_endpoint,
            api_key: cli.api_key,
            max_concurrency: cli.max_concurrency as usize,
            timeout_seconds: cli.timeout_seconds,
            verbose: cli.verbose,
            log_level: cli.log_level,
            log_format: cli.log_format,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from(Cli::parse());

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    match run_batch(config).await {
        Ok(report) => {
            let summary = format!(
                "Processed {} URL{} ({} succeeded, {} failed, {} technologies)",
                report.total_urls,
                if report.total_urls == 1 { "" } else { "s" },
                report.successful,
                report.failed,
                report.technologies,
            );
            // Keep stdout clean when the report itself went there
            if report.output_path == ReportTarget::Stdout {
                eprintln!("{summary}");
            } else {
                println!("{summary}");
                println!("Results saved in {}", report.output_path);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("mass_detect error: {:#}", e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from(Cli::try_parse_from(["mass_detect", "-i", "urls.txt"]).unwrap());
        assert_eq!(config.max_concurrency, 5);
        assert_eq!(config.timeout_seconds, 500);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let parsed =
            Cli::try_parse_from(["mass_detect", "-i", "urls.txt", "--timeout-seconds", "0"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_zero_workers_are_rejected() {
        assert!(Cli::try_parse_from(["mass_detect", "-i", "urls.txt", "-a", "0"]).is_err());
    }
}
