use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("access to log file denied: {}", path.display())]
    Access { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file not found: {}", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("failed to parse config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("template file not found: {}", path.display())]
    TemplateMissing { path: PathBuf },

    #[error("no permission on file: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("failed to serialize report table: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("bad pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
