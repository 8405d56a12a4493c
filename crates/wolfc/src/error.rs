//! Failures of the command-line driver.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("code generation failed for {}", .path.display())]
    Codegen {
        path: PathBuf,
        #[source]
        source: wolf_codegen::CodegenError,
    },

    #[error("invalid ignore pattern")]
    Glob(#[from] globset::Error),

    #[error("file watcher failed")]
    Watch(#[from] notify::Error),

    #[error("no such file or directory: {}", .0.display())]
    MissingPath(PathBuf),
}

pub type Result<T> = std::result::Result<T, CliError>;
