//! Run configuration.
//!
//! Built once at startup from defaults, an optional TOML file and CLI
//! overrides, then passed by reference to the pipeline.
//!
//! TOML shape (every key optional):
//! report_size = 1000
//! report_dir = "./reports"
//! log_dir = "./log"
//! report_template = "./report.html"
//! error_file = "./errors.log"

use crate::error::{Error, Result};

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "./config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Maximum number of URLs in the report.
    #[serde(alias = "REPORT_SIZE")]
    pub report_size: usize,

    #[serde(alias = "REPORT_DIR")]
    pub report_dir: PathBuf,

    #[serde(alias = "LOG_DIR")]
    pub log_dir: PathBuf,

    #[serde(alias = "REPORT_TEMPLATE")]
    pub report_template: PathBuf,

    /// JSON log destination; `None` logs to stdout.
    #[serde(alias = "ERROR_FILE")]
    pub error_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_size: 1000,
            report_dir: PathBuf::from("./reports"),
            log_dir: PathBuf::from("./log"),
            report_template: PathBuf::from("./report.html"),
            error_file: None,
        }
    }
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub report_size: Option<usize>,
    pub report_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub report_template: Option<PathBuf>,
}

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config file.
    ///
    /// An explicitly given `path` must exist. Without one, the default file is
    /// used when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text, path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if required {
                    Err(Error::ConfigMissing {
                        path: path.to_path_buf(),
                    })
                } else {
                    Ok(Self::default())
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(v) = overrides.report_size {
            self.report_size = v;
        }
        if let Some(v) = overrides.report_dir {
            self.report_dir = v;
        }
        if let Some(v) = overrides.log_dir {
            self.log_dir = v;
        }
        if let Some(v) = overrides.report_template {
            self.report_template = v;
        }
        self
    }
}
