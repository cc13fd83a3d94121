//! # Finder strategy.
//!
//! [`Finder`] is the contract between discovery and the dispatch loop: given a listener
//! instance and its registration [`Scope`], return every producer and subscriber of that
//! instance keyed by [`RoutingKey`].
//!
//! The default strategy is [`DeclaredFinder`](crate::DeclaredFinder), which reads
//! [`Listener::declare`] tables. Other strategies (e.g. generated registries) can implement
//! the same trait and are selected through generics.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::config::Scope;
use crate::error::DiscoveryError;
use crate::listener::Listener;
use crate::types::RoutingKey;

use super::record::{ProducerRecord, SubscriberRecord};

/// Producers of one instance, by routing key.
pub type ProducerMap = HashMap<RoutingKey, ProducerRecord>;

/// Subscribers of one instance, by routing key.
pub type SubscriberMap = HashMap<RoutingKey, HashSet<SubscriberRecord>>;

/// Finds the producer and subscriber methods of a listener instance.
///
/// The methods are generic over the listener type, so the trait is not object safe:
/// swap strategies through a generic parameter (`F: Finder`), not `dyn Finder`.
pub trait Finder: Send + Sync {
    /// Every producer of `listener`, bound to it.
    fn find_all_producers<L: Listener>(
        &self,
        listener: &Arc<L>,
        scope: &Scope,
    ) -> Result<ProducerMap, DiscoveryError>;

    /// Every subscriber of `listener` for `scope`, bound to it.
    fn find_all_subscribers<L: Listener>(
        &self,
        listener: &Arc<L>,
        scope: &Scope,
    ) -> Result<SubscriberMap, DiscoveryError>;
}
