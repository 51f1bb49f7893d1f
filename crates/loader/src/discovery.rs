//! Plugin manifest discovery from filesystem directories.
//!
//! Scans configured directories for `PLUGIN.md` manifests. Discovery feeds
//! the admin listing; registration entry points stay a statically known
//! list of sources.

use std::path::PathBuf;

use {async_trait::async_trait, tracing::warn};

use crate::{
    manifest::{ParsedManifest, parse_plugin_md},
    paths,
};

/// Where a discovered manifest came from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginOrigin {
    Project,
    User,
    Bundled,
}

/// Discovers plugin manifests from the filesystem.
#[async_trait]
pub trait PluginDiscoverer: Send + Sync {
    /// Scan configured paths and return all discovered manifests.
    async fn discover(&self) -> anyhow::Result<Vec<(ParsedManifest, PluginOrigin)>>;
}

/// Filesystem-based discoverer. Scans directories in the given order.
pub struct FsPluginDiscoverer {
    search_paths: Vec<(PathBuf, PluginOrigin)>,
}

impl FsPluginDiscoverer {
    pub fn new(search_paths: Vec<(PathBuf, PluginOrigin)>) -> Self {
        Self { search_paths }
    }

    /// Default search paths: the working directory's `.ferrule/plugins`,
    /// then the user data dir's `plugins`.
    pub fn default_paths() -> Vec<(PathBuf, PluginOrigin)> {
        vec![
            (PathBuf::from(".ferrule/plugins"), PluginOrigin::Project),
            (paths::data_dir().join("plugins"), PluginOrigin::User),
        ]
    }
}

#[async_trait]
impl PluginDiscoverer for FsPluginDiscoverer {
    async fn discover(&self) -> anyhow::Result<Vec<(ParsedManifest, PluginOrigin)>> {
        let mut manifests = Vec::new();

        for (base_path, origin) in &self.search_paths {
            if !base_path.is_dir() {
                continue;
            }

            let entries = match std::fs::read_dir(base_path) {
                Ok(e) => e,
                Err(_) => continue,
            };

            for entry in entries.flatten() {
                let plugin_dir = entry.path();
                if !plugin_dir.is_dir() {
                    continue;
                }

                let plugin_md = plugin_dir.join("PLUGIN.md");
                if !plugin_md.is_file() {
                    continue;
                }

                let content = match std::fs::read_to_string(&plugin_md) {
                    Ok(c) => c,
                    Err(e) => {
                        warn!(?plugin_md, %e, "failed to read PLUGIN.md");
                        continue;
                    },
                };

                match parse_plugin_md(&content, &plugin_dir) {
                    Ok(parsed) => manifests.push((parsed, origin.clone())),
                    Err(e) => warn!(?plugin_dir, %e, "failed to parse PLUGIN.md"),
                }
            }
        }

        Ok(manifests)
    }
}
