//! Dispatcher adapters: translate each capability kind's ordered descriptor
//! sequence into action against the relevant host subsystem.
//!
//! Mounting adapters ([`routes`], [`auth`], [`email`], [`issues`],
//! [`tasks`]) run once at subsystem initialization via
//! [`DispatcherAdapter::wire`]; runtime dispatch ([`events`], [`unfurl`],
//! [`uninstall`]) consults the registry per call.

pub mod adapter;
pub mod auth;
pub mod drive;
pub mod email;
pub mod events;
pub mod issues;
pub mod routes;
pub mod tasks;
pub mod unfurl;
pub mod uninstall;

pub use {
    adapter::DispatcherAdapter,
    drive::{DispatchOutcome, fan_out, first_match},
};
