//! Method discovery and its per-type cache.
//!
//! ## Contents
//! - [`MethodDiscoverer`] validates declared methods and expands their routing keys
//! - [`DiscoveryCache`] memoizes discovery output per listener type (process-wide)
//! - [`ProducerTable`], [`SubscriberTable`], [`Discovered`], [`TypeMetadata`] the tables
//!
//! ## Quick wiring
//! ```text
//! Finder ──► DiscoveryCache ──(miss / subscribers)──► ListenerType::of::<L>()
//!                 ▲                                         │
//!                 └──────── tables ◄── MethodDiscoverer ◄───┘
//! ```

mod cache;
mod discoverer;

pub use cache::{DiscoveryCache, TypeMetadata};
pub use discoverer::{Discovered, MethodDiscoverer, ProducerTable, SubscriberTable};
