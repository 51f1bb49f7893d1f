//! Capability kinds — the closed set of extension points plugins can
//! register for.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The category of extension point a descriptor registers for.
///
/// Serialized in kebab-case; the same names are used in `PLUGIN.md`
/// manifests and on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityKind {
    RouteContribution,
    AuthProvider,
    EmailTemplate,
    IssueProvider,
    EventProcessor,
    ScheduledTask,
    LinkUnfurler,
    UninstallHook,
}

impl CapabilityKind {
    /// All variants, for iteration.
    pub const ALL: &'static [CapabilityKind] = &[
        Self::RouteContribution,
        Self::AuthProvider,
        Self::EmailTemplate,
        Self::IssueProvider,
        Self::EventProcessor,
        Self::ScheduledTask,
        Self::LinkUnfurler,
        Self::UninstallHook,
    ];

    /// The kebab-case name used in manifests and on the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RouteContribution => "route-contribution",
            Self::AuthProvider => "auth-provider",
            Self::EmailTemplate => "email-template",
            Self::IssueProvider => "issue-provider",
            Self::EventProcessor => "event-processor",
            Self::ScheduledTask => "scheduled-task",
            Self::LinkUnfurler => "link-unfurler",
            Self::UninstallHook => "uninstall-hook",
        }
    }

    /// How the host consults this kind's descriptors. A fixed property of
    /// the kind, not a per-call choice.
    pub fn dispatch_shape(&self) -> DispatchShape {
        match self {
            Self::LinkUnfurler => DispatchShape::FirstMatch,
            _ => DispatchShape::FanOut,
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::malformed(format!("unknown capability kind '{s}'")))
    }
}

/// How an adapter consumes a kind's ordered descriptor sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchShape {
    /// Try descriptors in order, stop at the first that produces a result.
    FirstMatch,
    /// Invoke every enabled descriptor independently.
    FanOut,
}
