//! Routing value types.
//!
//! ## Contents
//! - [`TypeKey`], [`PayloadType`], [`PayloadKind`] nominal type identities
//! - [`RoutingKey`] the `(tag, payload type)` pair events are routed by
//! - [`BoundMethod`] a discovered method before it is bound to an instance
//! - [`Payload`] the erased event value

mod key;
mod method;

pub use key::{PayloadKind, PayloadType, RoutingKey, TypeKey};
pub use method::{BoundMethod, Payload};

pub(crate) use method::{DeliverFn, Invoker, ProduceFn};
