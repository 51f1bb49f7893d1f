//! Extension kernel: typed capability registration and priority-ordered
//! lookup.
//!
//! Plugins register [`PluginDescriptor`]s with the [`PluginRegistry`]; the
//! host's dispatcher adapters later pull each capability kind's ordered
//! snapshot and drive it against the relevant subsystem. The registry is a
//! typed multi-map keyed by [`CapabilityKind`] with global id uniqueness and
//! stable priority ordering.

pub mod descriptor;
pub mod error;
pub mod kind;
pub mod payload;
pub mod registry;

pub use {
    descriptor::{DEFAULT_PRIORITY, DescriptorInfo, PluginDescriptor},
    error::{Error, Result},
    kind::{CapabilityKind, DispatchShape},
    payload::{
        AuthCallback, AuthStrategySpec, CapabilityPayload, EmailTemplate, EventProcessor,
        HostEvent, IssueProvider, IssueRef, LinkUnfurler, RouteEntry, RouteHandler, RouteTable,
        TaskRunner, TaskSpec, TemplateSet, Unfurl, UninstallHook,
    },
    registry::PluginRegistry,
};
