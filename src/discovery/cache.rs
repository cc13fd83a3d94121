//! # Process-wide discovery cache.
//!
//! [`DiscoveryCache`] memoizes discovery output per listener type so repeated
//! registrations skip the declaration and validation pass.
//!
//! ## Policy
//! ```text
//! producers::<L>(scope)    hit  → cached table (scope ignored)
//!                          miss → discover, store both tables
//! subscribers::<L>(scope)  always discover (dynamic tags depend on scope),
//!                          store both tables, return the fresh one
//! ```
//! Producer tables never depend on the scope, so ignoring it on a hit is safe.
//! Subscriber tables are stored for inspection only and never short-circuit work.
//!
//! ## Concurrency
//! Backed by [`DashMap`]: lookups and inserts are atomic per entry. Two threads
//! discovering the same type at once both store a result; the last write wins.
//! Failed discovery stores nothing.
//!
//! ## Lifetime
//! [`DiscoveryCache::global`] lives for the whole process and is never evicted.
//! Use [`DiscoveryCache::clear`] or a private cache for test isolation.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::config::Scope;
use crate::error::DiscoveryError;
use crate::listener::{Listener, ListenerType};
use crate::types::TypeKey;

use super::discoverer::{MethodDiscoverer, ProducerTable, SubscriberTable};

static GLOBAL: LazyLock<DiscoveryCache> = LazyLock::new(DiscoveryCache::new);

/// Both discovery tables of one listener type.
#[derive(Clone, Debug)]
pub struct TypeMetadata {
    pub producers: Arc<ProducerTable>,
    pub subscribers: Arc<SubscriberTable>,
}

/// Memoized discovery output per listener type.
#[derive(Debug, Default)]
pub struct DiscoveryCache {
    producers: DashMap<TypeKey, Arc<ProducerTable>>,
    subscribers: DashMap<TypeKey, Arc<SubscriberTable>>,
}

impl DiscoveryCache {
    /// Creates an empty, private cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache.
    pub fn global() -> &'static DiscoveryCache {
        &GLOBAL
    }

    /// Producer table of `L`, discovered on first request only.
    pub fn producers<L: Listener>(&self, scope: &Scope) -> Result<Arc<ProducerTable>, DiscoveryError> {
        if let Some(hit) = self.producers.get(&TypeKey::of::<L>()) {
            trace!(listener = std::any::type_name::<L>(), "producer cache hit");
            return Ok(Arc::clone(hit.value()));
        }
        Ok(self.discover::<L>(scope)?.producers)
    }

    /// Subscriber table of `L` for `scope`, discovered on every request.
    pub fn subscribers<L: Listener>(&self, scope: &Scope) -> Result<Arc<SubscriberTable>, DiscoveryError> {
        Ok(self.discover::<L>(scope)?.subscribers)
    }

    /// Both tables of `L`: cached producers (if any) and freshly discovered subscribers.
    pub fn get_or_discover<L: Listener>(&self, scope: &Scope) -> Result<TypeMetadata, DiscoveryError> {
        let cached = self.cached_producers(&TypeKey::of::<L>());
        let mut fresh = self.discover::<L>(scope)?;
        if let Some(producers) = cached {
            fresh.producers = producers;
        }
        Ok(fresh)
    }

    /// Last stored producer table for a type, without discovering.
    pub fn cached_producers(&self, listener: &TypeKey) -> Option<Arc<ProducerTable>> {
        self.producers.get(listener).map(|hit| Arc::clone(hit.value()))
    }

    /// Last stored subscriber table for a type, without discovering.
    pub fn cached_subscribers(&self, listener: &TypeKey) -> Option<Arc<SubscriberTable>> {
        self.subscribers.get(listener).map(|hit| Arc::clone(hit.value()))
    }

    /// Number of listener types discovered so far.
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Drops every cached table.
    pub fn clear(&self) {
        self.producers.clear();
        self.subscribers.clear();
    }

    fn discover<L: Listener>(&self, scope: &Scope) -> Result<TypeMetadata, DiscoveryError> {
        let listener = ListenerType::of::<L>();
        let found = MethodDiscoverer::discover(&listener, scope).inspect_err(|err| {
            debug!(
                listener = listener.key().name(),
                error = err.as_label(),
                "discovery failed: {err}"
            );
        })?;

        debug!(
            listener = listener.key().name(),
            producers = found.producers.len(),
            subscribers = found.subscribers.len(),
            tag = scope.tag(),
            suffix = scope.suffix(),
            "discovered listener methods"
        );

        let meta = TypeMetadata {
            producers: Arc::new(found.producers),
            subscribers: Arc::new(found.subscribers),
        };
        self.producers.insert(listener.key(), Arc::clone(&meta.producers));
        self.subscribers.insert(listener.key(), Arc::clone(&meta.subscribers));
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::listener::MethodTable;
    use crate::markers::{Produce, Subscribe};
    use crate::types::RoutingKey;

    struct Ping;

    struct Room;
    impl Listener for Room {
        fn declare(table: &mut MethodTable<Self>) {
            table
                .produce("latest", Produce::new(), |_: &Self| Ping)
                .subscribe(
                    "on_ping",
                    Subscribe::new().dynamic_tags(["X", "Y"]),
                    |_: &Self, _: &Ping| {},
                );
        }
    }

    #[test]
    fn test_producers_memoized_and_scope_ignored_on_hit() {
        let cache = DiscoveryCache::new();
        let first = cache.producers::<Room>(&Scope::new("Y", "-a")).unwrap();
        let again = cache.producers::<Room>(&Scope::new("Y", "-a")).unwrap();
        let other = cache.producers::<Room>(&Scope::new("Z", "-b")).unwrap();

        assert!(Arc::ptr_eq(&first, &again));
        assert!(Arc::ptr_eq(&first, &other));

        let expected = RoutingKey::of::<Ping>(crate::markers::DEFAULT_TAG).unwrap();
        assert_eq!(first.keys().collect::<Vec<_>>(), vec![&expected]);
        assert_eq!(cache.len(), 1);
    }

    static COUNTED_DECLARATIONS: AtomicUsize = AtomicUsize::new(0);

    // Only used by `test_producer_hit_skips_declaration`.
    struct Counted;
    impl Listener for Counted {
        fn declare(table: &mut MethodTable<Self>) {
            COUNTED_DECLARATIONS.fetch_add(1, Ordering::SeqCst);
            table.produce("latest", Produce::new(), |_: &Self| Ping);
        }
    }

    #[test]
    fn test_producer_hit_skips_declaration() {
        let cache = DiscoveryCache::new();
        cache.producers::<Counted>(&Scope::default()).unwrap();
        cache.producers::<Counted>(&Scope::tagged("other")).unwrap();
        assert_eq!(COUNTED_DECLARATIONS.load(Ordering::SeqCst), 1);

        cache.subscribers::<Counted>(&Scope::default()).unwrap();
        cache.subscribers::<Counted>(&Scope::default()).unwrap();
        assert_eq!(COUNTED_DECLARATIONS.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_subscribers_rediscovered_per_scope() {
        let cache = DiscoveryCache::new();
        let y = cache.subscribers::<Room>(&Scope::new("Y", "-s1")).unwrap();
        assert!(y.contains_key(&RoutingKey::of::<Ping>("Y-s1").unwrap()));

        let z = cache.subscribers::<Room>(&Scope::new("Z", "-s1")).unwrap();
        assert!(z.is_empty());

        let stored = cache.cached_subscribers(&TypeKey::of::<Room>()).unwrap();
        assert!(Arc::ptr_eq(&stored, &z));
    }

    #[test]
    fn test_get_or_discover_mixes_cached_producers_with_fresh_subscribers() {
        let cache = DiscoveryCache::new();
        let producers = cache.producers::<Room>(&Scope::default()).unwrap();
        let meta = cache.get_or_discover::<Room>(&Scope::tagged("X")).unwrap();
        assert!(Arc::ptr_eq(&producers, &meta.producers));
        assert!(meta.subscribers.contains_key(&RoutingKey::of::<Ping>("X").unwrap()));
    }

    struct Broken;
    impl Listener for Broken {
        fn declare(table: &mut MethodTable<Self>) {
            table
                .produce("a", Produce::new(), |_: &Self| Ping)
                .produce("b", Produce::new(), |_: &Self| Ping);
        }
    }

    #[test]
    fn test_failed_discovery_stores_nothing() {
        let cache = DiscoveryCache::new();
        assert!(cache.producers::<Broken>(&Scope::default()).is_err());
        assert!(cache.subscribers::<Broken>(&Scope::default()).is_err());
        assert!(cache.is_empty());
        assert!(cache.cached_subscribers(&TypeKey::of::<Broken>()).is_none());
    }

    #[test]
    fn test_clear_resets() {
        let cache = DiscoveryCache::new();
        cache.producers::<Room>(&Scope::default()).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.cached_producers(&TypeKey::of::<Room>()).is_none());
    }

    #[test]
    fn test_concurrent_discovery_is_consistent() {
        let cache = DiscoveryCache::new();
        std::thread::scope(|s| {
            for i in 0..8 {
                let cache = &cache;
                s.spawn(move || {
                    let tag = if i % 2 == 0 { "X" } else { "Y" };
                    let subs = cache.subscribers::<Room>(&Scope::tagged(tag)).unwrap();
                    assert!(subs.contains_key(&RoutingKey::of::<Ping>(tag).unwrap()));
                    let prods = cache.producers::<Room>(&Scope::tagged(tag)).unwrap();
                    assert_eq!(prods.len(), 1);
                });
            }
        });
        assert_eq!(cache.len(), 1);
    }
}
