//! # dynbus
//!
//! **dynbus** is the discovery and routing-key resolution core of a typed,
//! tag-scoped publish/subscribe event bus.
//!
//! Listener types declare methods that either *produce* the latest value of a payload
//! type or *subscribe* to events of a payload type. dynbus validates those declarations,
//! expands them into routing keys `(tag, payload type)` and binds them to listener
//! instances. Delivering events and honoring thread affinity is left to the dispatch
//! loop that consumes the records.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   impl Listener for T { fn declare(table) { .. } }     (once per type)
//!                  │
//!                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  DiscoveryCache (process-wide, DashMap per listener type)         │
//! │  - producers:   memoized on first request                         │
//! │  - subscribers: rediscovered per request (scope dependent)        │
//! └──────┬─────────────────────────────────────────────────▲──────────┘
//!        │ miss / subscribers                              │ tables
//!        ▼                                                 │
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  MethodDiscoverer                                                 │
//! │  - validates signatures (arity, concrete payload, public)         │
//! │  - expands static tags, gates dynamic tags on Scope::tag          │
//! │  - rejects duplicate producer keys                                │
//! └───────────────────────────────────────────────────────────────────┘
//!                  ▲
//!                  │ find_all_producers / find_all_subscribers(instance, scope)
//! ┌────────────────┴──────────────────────────────────────────────────┐
//! │  Finder (DeclaredFinder): binds tables to the instance            │
//! └────────────────┬──────────────────────────────────────────────────┘
//!                  ▼
//!     RoutingKey ─► ProducerRecord / {SubscriberRecord}  ─► dispatch loop
//! ```
//!
//! ### Routing keys
//! ```text
//! Subscribe { tags: [A, B] }            ─► (A, T), (B, T)
//! Subscribe { }                         ─► (DEFAULT_TAG, T)
//! Subscribe { dynamic_tags: [X, Y] }    ─► (Y + suffix, T)   when scope.tag == Y
//! Subscribe { tags: [A], dynamic: [X] } ─► nothing
//! Produce   { tags: [A, B] }            ─► (A, R), (B, R)    unique per type
//! ```
//!
//! ## Features
//! | Area              | Description                                                      | Key types / traits                         |
//! |-------------------|------------------------------------------------------------------|--------------------------------------------|
//! | **Declarations**  | Describe produce/subscribe methods of a listener type.           | [`Listener`], [`MethodTable`], [`Subscribe`], [`Produce`] |
//! | **Discovery**     | Validate declarations and expand routing keys.                   | [`MethodDiscoverer`], [`RoutingKey`]       |
//! | **Caching**       | Per-type memoization, safe across threads.                       | [`DiscoveryCache`]                         |
//! | **Binding**       | Instance-bound, invocable records for the dispatch loop.         | [`Finder`], [`DeclaredFinder`]             |
//! | **Errors**        | Typed configuration and invocation errors.                       | [`DiscoveryError`], [`InvokeError`]        |
//! | **Scoping**       | Runtime tag + suffix partitioning of dynamic subscribers.        | [`Scope`]                                  |
//!
//! ## Optional features
//! - `serde`: markers and [`ThreadAffinity`] implement `Serialize`/`Deserialize`.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use dynbus::{DeclaredFinder, Finder, Listener, MethodTable, Produce, RoutingKey, Scope, Subscribe};
//!
//! struct Joined(String);
//!
//! #[derive(Default)]
//! struct Lobby {
//!     members: Mutex<Vec<String>>,
//! }
//!
//! impl Lobby {
//!     fn on_joined(&self, ev: &Joined) {
//!         self.members.lock().unwrap().push(ev.0.clone());
//!     }
//!     fn last_joined(&self) -> Joined {
//!         Joined(self.members.lock().unwrap().last().cloned().unwrap_or_default())
//!     }
//! }
//!
//! impl Listener for Lobby {
//!     fn declare(table: &mut MethodTable<Self>) {
//!         table
//!             .subscribe("on_joined", Subscribe::new().dynamic_tag("lobby"), Lobby::on_joined)
//!             .produce("last_joined", Produce::new().tag("lobby"), Lobby::last_joined);
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let lobby = Arc::new(Lobby::default());
//!     let scope = Scope::new("lobby", "#1");
//!
//!     let subs = DeclaredFinder::GLOBAL.find_all_subscribers(&lobby, &scope)?;
//!     for record in &subs[&RoutingKey::of::<Joined>("lobby#1")?] {
//!         record.deliver(&Joined("ada".into()))?;
//!     }
//!
//!     let producers = DeclaredFinder::GLOBAL.find_all_producers(&lobby, &scope)?;
//!     let latest = producers[&RoutingKey::of::<Joined>("lobby")?].produce()?;
//!     assert_eq!(latest.downcast_ref::<Joined>().map(|j| j.0.as_str()), Some("ada"));
//!     Ok(())
//! }
//! ```
mod config;
mod discovery;
mod error;
mod finder;
mod listener;
mod markers;
mod types;

// ---- Public re-exports ----

pub use config::Scope;
pub use discovery::{
    Discovered, DiscoveryCache, MethodDiscoverer, ProducerTable, SubscriberTable, TypeMetadata,
};
pub use error::{DiscoveryError, InvokeError, SignatureFault};
pub use finder::{
    DeclaredFinder, Finder, ProducerMap, ProducerRecord, SubscriberMap, SubscriberRecord, Target,
};
pub use listener::{Listener, ListenerType, MethodDescriptor, MethodTable, Visibility};
pub use markers::{DEFAULT_DYNAMIC_TAG, DEFAULT_TAG, Produce, Subscribe, ThreadAffinity};
pub use types::{BoundMethod, Payload, PayloadKind, PayloadType, RoutingKey, TypeKey};
