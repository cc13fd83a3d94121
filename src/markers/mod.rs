//! Declarative markers attached to listener methods.
//!
//! These are the Rust counterparts of method annotations: plain data that says
//! **what** a method participates in, never how it is executed.
//!
//! ## Contents
//! - [`Produce`] marks a zero-argument method returning the current value of a payload type
//! - [`Subscribe`] marks a one-argument method receiving events of a payload type
//! - [`ThreadAffinity`] which execution context the dispatch loop should run a method on
//!
//! ## Sentinels
//! - [`DEFAULT_TAG`] is used when a marker lists no static tags.
//! - [`DEFAULT_DYNAMIC_TAG`] is used when a subscribe marker lists no dynamic tags.

mod affinity;
mod produce;
mod subscribe;

pub use affinity::ThreadAffinity;
pub use produce::Produce;
pub use subscribe::Subscribe;

/// Tag used by markers that declare no static tags.
pub const DEFAULT_TAG: &str = "dynbus_default_tag";

/// Dynamic tag used by subscribe markers that declare no dynamic tags.
pub const DEFAULT_DYNAMIC_TAG: &str = "dynbus_default_tag_dynamic";
