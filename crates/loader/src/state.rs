//! Persisted plugin enable/disable state.
//!
//! Administrative enable/disable decisions survive restarts: the disabled
//! set lives in `plugins-state.json` and is applied to the registry after
//! `load_all` has registered everything.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use {
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use ferrule_registry::PluginRegistry;

use crate::{error::Result, paths};

/// The persisted state: which plugin ids an administrator has disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginState {
    pub version: u32,
    #[serde(default)]
    pub disabled: BTreeSet<String>,
}

impl Default for PluginState {
    fn default() -> Self {
        Self {
            version: 1,
            disabled: BTreeSet::new(),
        }
    }
}

impl PluginState {
    /// Record a plugin as disabled (or re-enabled). Returns true if the
    /// state changed.
    pub fn set_disabled(&mut self, id: &str, disabled: bool) -> bool {
        if disabled {
            self.disabled.insert(id.to_string())
        } else {
            self.disabled.remove(id)
        }
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.disabled.contains(id)
    }

    /// Disable matching registered descriptors. Ids with no registered
    /// descriptor are ignored — they may belong to a plugin that failed to
    /// load or was removed.
    pub fn apply(&self, registry: &PluginRegistry) {
        for id in &self.disabled {
            if let Err(e) = registry.set_enabled(id, false) {
                debug!(id, error = %e, "disabled id has no registered descriptor");
            }
        }
    }
}

/// Persistent state storage with atomic writes.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default state path: `<data dir>/plugins-state.json`.
    pub fn default_path() -> PathBuf {
        paths::data_dir().join("plugins-state.json")
    }

    /// Load state from disk, returning a default if missing.
    pub fn load(&self) -> Result<PluginState> {
        if !self.path.exists() {
            return Ok(PluginState::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        let state: PluginState = serde_json::from_str(&data)?;
        Ok(state)
    }

    /// Save state atomically via temp file + rename.
    pub fn save(&self, state: &PluginState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(state)?;
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use ferrule_registry::{
        CapabilityKind, CapabilityPayload, PluginDescriptor, TemplateSet,
    };

    #[test]
    fn load_missing_returns_default() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::new(tmp.path().join("missing.json"));
        let state = store.load().unwrap();
        assert_eq!(state.version, 1);
        assert!(state.disabled.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::new(tmp.path().join("state.json"));

        let mut state = PluginState::default();
        assert!(state.set_disabled("github", true));
        assert!(!state.set_disabled("github", true)); // already disabled

        store.save(&state).unwrap();
        let loaded = store.load().unwrap();
        assert!(loaded.is_disabled("github"));
        assert!(!loaded.is_disabled("jira"));
    }

    #[test]
    fn apply_disables_registered_descriptors() {
        let registry = PluginRegistry::new();
        registry
            .register(PluginDescriptor::new(
                "mailer",
                "Mailer",
                CapabilityPayload::EmailTemplate(TemplateSet::default()),
            ))
            .unwrap();

        let mut state = PluginState::default();
        state.set_disabled("mailer", true);
        state.set_disabled("ghost", true); // never registered — ignored
        state.apply(&registry);

        assert!(!registry.get_by_id("mailer").unwrap().enabled());
        assert!(registry.get_by_kind(CapabilityKind::EmailTemplate).is_empty());
    }
}
