use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the host layer: reading documents, loading or saving the
/// preference file, and parsing user-supplied values. Scanning itself
/// never fails.
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config at {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] serde_yaml::Error),

    #[error("failed to write config to {}: {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no config directory available")]
    NoConfigDir,

    #[error("invalid sort order '{0}', expected 'position' or 'alphabetical'")]
    InvalidSortOrder(String),

    #[error("invalid group '{0}', expected 'testcase' or 'function'")]
    InvalidGroup(String),
}

impl OutlineError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        OutlineError::Io { path: path.into(), source }
    }
}
