use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("failed to parse PLUGIN.md at {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("load_all has already run for this loader")]
    AlreadyLoaded,

    #[error("plugin source '{name}' failed to load: {reason}")]
    SourceLoadFailed { name: String, reason: String },
}

impl Error {
    #[must_use]
    pub fn invalid_manifest(path: &Path, reason: impl Into<String>) -> Self {
        Self::InvalidManifest {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn source_load_failed(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceLoadFailed {
            name: source.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
