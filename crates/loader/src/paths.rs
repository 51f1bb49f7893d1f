//! Data-directory resolution.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Platform data directory for ferrule (`~/.local/share/ferrule` on Linux).
/// Falls back to `.ferrule` in the working directory when the platform
/// provides no home directory.
pub fn data_dir() -> PathBuf {
    ProjectDirs::from("org", "ferrule", "ferrule")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".ferrule"))
}
