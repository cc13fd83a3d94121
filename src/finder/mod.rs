//! Binding discovered methods to listener instances.
//!
//! ## Contents
//! - [`Finder`] the swappable strategy the dispatch loop talks to
//! - [`DeclaredFinder`] default strategy over [`Listener::declare`](crate::Listener::declare) tables
//! - [`ProducerRecord`], [`SubscriberRecord`] instance-bound, invocable records
//! - [`ProducerMap`], [`SubscriberMap`] what a finder returns

mod declared;
mod finder;
mod record;

pub use declared::DeclaredFinder;
pub use finder::{Finder, ProducerMap, SubscriberMap};
pub use record::{ProducerRecord, SubscriberRecord, Target};
