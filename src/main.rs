use clap::Parser;
use log_analyzer::config::{Config, Overrides};
use log_analyzer::pipeline::{self, Outcome};
use std::fs::File;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

#[derive(Parser)]
#[command(name = "log-analyzer")]
#[command(version, about = "Nginx access log analyzer", long_about = None)]
struct Cli {
    /// Path to the TOML config file (default: ./config.toml if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory with nginx-access-ui.log-YYYYMMDD[.gz] files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Directory for report-YYYY.MM.DD.html files
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Maximum number of URLs in the report
    #[arg(long)]
    report_size: Option<usize>,

    /// HTML template with a $table_json placeholder
    #[arg(long)]
    report_template: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            report_size: self.report_size,
            report_dir: self.report_dir.clone(),
            log_dir: self.log_dir.clone(),
            report_template: self.report_template.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config.with_overrides(cli.overrides()),
        Err(err) => {
            init_logging(cli.verbose, None);
            tracing::error!(error = %err, "failed to load config");
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbose, config.error_file.as_deref());
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "log analysis aborted");
    }));

    match pipeline::analyze(&config) {
        Ok(outcome) => {
            if let Outcome::ReportWritten(path) = &outcome {
                tracing::debug!(path = %path.display(), "done");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "log analysis failed");
            ExitCode::FAILURE
        }
    }
}

/// Log as JSON lines to `error_file` when it is usable, else to stdout.
fn init_logging(verbose: bool, error_file: Option<&Path>) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("log_analyzer=debug")
        } else {
            EnvFilter::new("log_analyzer=info")
        }
    });

    let (file, bad_path) = match error_file {
        Some(path) if path.exists() && !path.is_file() => (None, Some(path)),
        Some(path) => match File::create(path) {
            Ok(file) => (Some(file), None),
            Err(_) => (None, Some(path)),
        },
        None => (None, None),
    };

    match file {
        Some(file) => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(std::io::stdout().is_terminal())
            .init(),
    }

    if let Some(path) = bad_path {
        tracing::error!(path = %path.display(), "invalid error file path, logging to stdout");
    }
}
