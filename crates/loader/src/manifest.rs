//! PLUGIN.md metadata parsing.
//!
//! Plugin metadata is declared as TOML frontmatter in `PLUGIN.md` files:
//! ```text
//! +++
//! id = "github"
//! name = "GitHub"
//! description = "Issues and link previews for GitHub"
//! version = "1.2.0"
//! priority = 10
//! capabilities = ["issue-provider", "link-unfurler"]
//! +++
//!
//! # GitHub
//! Extended docs go here.
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use ferrule_registry::CapabilityKind;

use crate::error::{Error, Result};

/// Metadata parsed from a PLUGIN.md file's TOML frontmatter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub capabilities: Vec<CapabilityKind>,
}

/// Full parsed manifest including the body text.
#[derive(Debug, Clone)]
pub struct ParsedManifest {
    pub manifest: PluginManifest,
    pub body: String,
    pub source_path: std::path::PathBuf,
}

/// Parse a PLUGIN.md file content into metadata + body.
///
/// Expects TOML frontmatter delimited by `+++` lines. Unknown capability
/// names fail the parse.
pub fn parse_plugin_md(content: &str, source_path: &Path) -> Result<ParsedManifest> {
    let trimmed = content.trim_start();
    if !trimmed.starts_with("+++") {
        return Err(Error::invalid_manifest(
            source_path,
            "PLUGIN.md must start with +++ TOML frontmatter",
        ));
    }

    let after_first = &trimmed[3..];
    let end = after_first.find("\n+++").ok_or_else(|| {
        Error::invalid_manifest(source_path, "missing closing +++ in PLUGIN.md frontmatter")
    })?;

    let toml_str = after_first[..end].trim();
    let body_start = end + 4; // skip "\n+++"
    let body = after_first
        .get(body_start..)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let manifest: PluginManifest = toml::from_str(toml_str)
        .map_err(|e| Error::invalid_manifest(source_path, e.to_string()))?;
    if manifest.id.trim().is_empty() {
        return Err(Error::invalid_manifest(source_path, "id must not be blank"));
    }

    Ok(ParsedManifest {
        manifest,
        body,
        source_path: source_path.to_path_buf(),
    })
}
