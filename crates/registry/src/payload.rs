//! Typed capability payloads and the seam traits plugins implement.
//!
//! One concrete payload shape per [`CapabilityKind`], fixed at compile time:
//! a descriptor's kind is derived from its payload, so the two can never
//! disagree and a payload is always present. The registry never inspects
//! payload contents; only the matching dispatcher adapter does.

use std::{fmt, sync::Arc};

use {
    anyhow::Result,
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

use crate::kind::CapabilityKind;

// ── Route contributions ─────────────────────────────────────────────────────

/// Handles one mounted route. Request and response bodies are opaque JSON;
/// the routing subsystem owns the actual wire format.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    async fn handle(&self, request: Value) -> Result<Value>;
}

/// One (method, path, handler) triple contributed by a plugin.
#[derive(Clone)]
pub struct RouteEntry {
    pub method: String,
    pub path: String,
    pub handler: Arc<dyn RouteHandler>,
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// A plugin's whole route table, handed to the routing subsystem in one
/// mount operation.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    pub routes: Vec<RouteEntry>,
}

// ── Auth providers ──────────────────────────────────────────────────────────

/// Invoked with externally-verified identity claims once the host's
/// identity subsystem has authenticated a request for this strategy.
#[async_trait]
pub trait AuthCallback: Send + Sync {
    async fn on_claims(&self, claims: Value) -> Result<()>;
}

/// An auth strategy contributed by a plugin: a strategy identifier plus the
/// callback the host invokes with verified claims.
#[derive(Clone)]
pub struct AuthStrategySpec {
    pub strategy: String,
    pub callback: Arc<dyn AuthCallback>,
}

impl fmt::Debug for AuthStrategySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthStrategySpec")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

// ── Email templates ─────────────────────────────────────────────────────────

/// A named subject/body template pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub name: String,
    pub subject: String,
    pub body: String,
}

/// The set of templates one plugin contributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateSet {
    pub templates: Vec<EmailTemplate>,
}

// ── Issue providers ─────────────────────────────────────────────────────────

/// Reference to an issue created in an external tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRef {
    pub slug: String,
    pub key: String,
    pub url: String,
}

/// An external issue tracker integration.
#[async_trait]
pub trait IssueProvider: Send + Sync {
    /// Short identifier the host uses to address this tracker
    /// ("github", "jira").
    fn slug(&self) -> &str;

    async fn create_issue(&self, title: &str, body: &str) -> Result<IssueRef>;
}

// ── Event processors ────────────────────────────────────────────────────────

/// An event emitted by the host and fanned out to processors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostEvent {
    pub kind: String,
    pub data: Value,
}

/// A unit of work receiving host events. Retry policy belongs to the
/// execution engine, not to this core.
#[async_trait]
pub trait EventProcessor: Send + Sync {
    async fn process(&self, event: &HostEvent) -> Result<()>;
}

// ── Scheduled tasks ─────────────────────────────────────────────────────────

/// The body of a recurring task.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn run(&self) -> Result<()>;
}

/// A recurring task: a cron-style schedule string (opaque to this core;
/// the execution engine interprets it) plus the runner.
#[derive(Clone)]
pub struct TaskSpec {
    pub schedule: String,
    pub runner: Arc<dyn TaskRunner>,
}

impl fmt::Debug for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSpec")
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

// ── Link unfurlers ──────────────────────────────────────────────────────────

/// A rendered URL preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unfurl {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Resolves URL previews. `Ok(None)` means "no match, try the next
/// candidate" — only the first non-empty result is used.
#[async_trait]
pub trait LinkUnfurler: Send + Sync {
    async fn unfurl(&self, url: &str) -> Result<Option<Unfurl>>;
}

// ── Uninstall hooks ─────────────────────────────────────────────────────────

/// Teardown work run when the owning plugin is removed from the host.
#[async_trait]
pub trait UninstallHook: Send + Sync {
    async fn on_uninstall(&self) -> Result<()>;
}

// ── CapabilityPayload ───────────────────────────────────────────────────────

/// The kind-specific payload carried by a descriptor. Opaque to the
/// registry; each dispatcher adapter consumes exactly one variant.
#[derive(Clone)]
pub enum CapabilityPayload {
    RouteContribution(RouteTable),
    AuthProvider(AuthStrategySpec),
    EmailTemplate(TemplateSet),
    IssueProvider(Arc<dyn IssueProvider>),
    EventProcessor(Arc<dyn EventProcessor>),
    ScheduledTask(TaskSpec),
    LinkUnfurler(Arc<dyn LinkUnfurler>),
    UninstallHook(Arc<dyn UninstallHook>),
}

impl CapabilityPayload {
    /// Returns the [`CapabilityKind`] that matches this payload.
    pub fn kind(&self) -> CapabilityKind {
        match self {
            Self::RouteContribution(_) => CapabilityKind::RouteContribution,
            Self::AuthProvider(_) => CapabilityKind::AuthProvider,
            Self::EmailTemplate(_) => CapabilityKind::EmailTemplate,
            Self::IssueProvider(_) => CapabilityKind::IssueProvider,
            Self::EventProcessor(_) => CapabilityKind::EventProcessor,
            Self::ScheduledTask(_) => CapabilityKind::ScheduledTask,
            Self::LinkUnfurler(_) => CapabilityKind::LinkUnfurler,
            Self::UninstallHook(_) => CapabilityKind::UninstallHook,
        }
    }
}

impl fmt::Debug for CapabilityPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapabilityPayload({})", self.kind())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    struct NullUnfurler;

    #[async_trait]
    impl LinkUnfurler for NullUnfurler {
        async fn unfurl(&self, _url: &str) -> Result<Option<Unfurl>> {
            Ok(None)
        }
    }

    #[test]
    fn payload_kind_matches_variant() {
        let payload = CapabilityPayload::LinkUnfurler(Arc::new(NullUnfurler));
        assert_eq!(payload.kind(), CapabilityKind::LinkUnfurler);

        let payload = CapabilityPayload::EmailTemplate(TemplateSet::default());
        assert_eq!(payload.kind(), CapabilityKind::EmailTemplate);

        let payload = CapabilityPayload::RouteContribution(RouteTable::default());
        assert_eq!(payload.kind(), CapabilityKind::RouteContribution);
    }

    #[test]
    fn unfurl_serializes_round_trip() {
        let unfurl = Unfurl {
            title: "A page".into(),
            description: Some("About things".into()),
            image_url: None,
        };
        let json = serde_json::to_string(&unfurl).unwrap();
        let parsed: Unfurl = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.title, "A page");
        assert_eq!(parsed.description.as_deref(), Some("About things"));
    }

    #[test]
    fn debug_does_not_expose_handlers() {
        let payload = CapabilityPayload::LinkUnfurler(Arc::new(NullUnfurler));
        assert_eq!(format!("{payload:?}"), "CapabilityPayload(link-unfurler)");
    }
}
