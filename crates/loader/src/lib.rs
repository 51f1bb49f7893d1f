//! Plugin loading: registration sources, one-shot startup loading with
//! per-source isolation, `PLUGIN.md` manifest discovery, and persisted
//! enable/disable state.

pub mod bundled;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod paths;
pub mod source;
pub mod state;

pub use {
    error::{Error, Result},
    loader::{LoadReport, Loader, SourceOutcome, SourceStatus},
    source::{PluginSource, StaticSource},
};
