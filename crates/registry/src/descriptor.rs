//! Plugin descriptors — the immutable record binding an identity, ordering
//! hint, and typed payload for one registered capability.

use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    kind::CapabilityKind,
    payload::CapabilityPayload,
};

/// Priority assigned when a plugin does not specify one. Lower values are
/// consulted first.
pub const DEFAULT_PRIORITY: i32 = 0;

/// Metadata and payload for one registered capability.
///
/// Immutable after registration except for the enabled flag, which the
/// registry toggles on administrative request. The kind is derived from the
/// payload and can never change.
pub struct PluginDescriptor {
    id: String,
    name: String,
    description: String,
    version: Option<String>,
    priority: i32,
    payload: CapabilityPayload,
    enabled: AtomicBool,
}

impl PluginDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        payload: CapabilityPayload,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            version: None,
            priority: DEFAULT_PRIORITY,
            payload,
            enabled: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Semantic-version string; informational only to this core.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Ordering hint. Lower value = higher precedence.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn kind(&self) -> CapabilityKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &CapabilityPayload {
        &self.payload
    }

    /// Disabled descriptors stay registered (for introspection) but are
    /// excluded from dispatch.
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::malformed("descriptor id must not be blank"));
        }
        Ok(())
    }

    /// Serializable summary for admin listings.
    pub fn info(&self) -> DescriptorInfo {
        DescriptorInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            kind: self.kind(),
            priority: self.priority,
            enabled: self.enabled(),
        }
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("priority", &self.priority)
            .field("enabled", &self.enabled())
            .finish_non_exhaustive()
    }
}

/// Snapshot of a descriptor's metadata, for listings and JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: Option<String>,
    pub kind: CapabilityKind,
    pub priority: i32,
    pub enabled: bool,
}
