//! # Declaration-driven finder.
//!
//! [`DeclaredFinder`] binds the tables produced by discovery to a concrete instance.
//! It performs no introspection itself: everything comes from the
//! [`DiscoveryCache`].
//!
//! ## Binding
//! ```text
//! producers:   (key → method)       ─► (key → ProducerRecord{instance, method})
//! subscribers: (key → [method, ..]) ─► (key → {SubscriberRecord{instance, method}, ..})
//!                                        duplicates collapse by record equality
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use tracing::trace;

use crate::config::Scope;
use crate::discovery::DiscoveryCache;
use crate::error::DiscoveryError;
use crate::listener::Listener;

use super::finder::{Finder, ProducerMap, SubscriberMap};
use super::record::{ProducerRecord, SubscriberRecord, Target};

/// Finder over [`Listener::declare`] tables.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use dynbus::{DeclaredFinder, Finder, Listener, MethodTable, RoutingKey, Scope, Subscribe};
///
/// struct Ping;
/// struct Room;
///
/// impl Listener for Room {
///     fn declare(table: &mut MethodTable<Self>) {
///         table.subscribe("on_ping", Subscribe::new().dynamic_tag("room"), |_: &Room, _: &Ping| {});
///     }
/// }
///
/// let room = Arc::new(Room);
/// let subs = DeclaredFinder::GLOBAL
///     .find_all_subscribers(&room, &Scope::new("room", "-1"))
///     .unwrap();
/// let key = RoutingKey::of::<Ping>("room-1").unwrap();
/// assert_eq!(subs[&key].len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DeclaredFinder {
    cache: Option<Arc<DiscoveryCache>>,
}

impl DeclaredFinder {
    /// Finder backed by the process-wide cache.
    pub const GLOBAL: DeclaredFinder = DeclaredFinder { cache: None };

    /// Finder backed by a private cache.
    pub fn with_cache(cache: Arc<DiscoveryCache>) -> Self {
        Self { cache: Some(cache) }
    }

    /// Cache this finder reads from.
    pub fn cache(&self) -> &DiscoveryCache {
        match &self.cache {
            Some(cache) => cache.as_ref(),
            None => DiscoveryCache::global(),
        }
    }
}

impl Finder for DeclaredFinder {
    fn find_all_producers<L: Listener>(
        &self,
        listener: &Arc<L>,
        scope: &Scope,
    ) -> Result<ProducerMap, DiscoveryError> {
        let methods = self.cache().producers::<L>(scope)?;
        let target: Target = listener.clone();

        let found: ProducerMap = methods
            .iter()
            .map(|(key, method)| {
                (
                    key.clone(),
                    ProducerRecord::new(Arc::clone(&target), method.clone()),
                )
            })
            .collect();

        trace!(
            listener = std::any::type_name::<L>(),
            producers = found.len(),
            "bound producers"
        );
        Ok(found)
    }

    fn find_all_subscribers<L: Listener>(
        &self,
        listener: &Arc<L>,
        scope: &Scope,
    ) -> Result<SubscriberMap, DiscoveryError> {
        let methods = self.cache().subscribers::<L>(scope)?;
        let target: Target = listener.clone();

        let mut found = SubscriberMap::with_capacity(methods.len());
        for (key, bound) in methods.iter() {
            let mut records = HashSet::with_capacity(bound.len());
            for method in bound {
                // equal records are kept once, first insert wins
                records.insert(SubscriberRecord::new(Arc::clone(&target), method.clone()));
            }
            found.insert(key.clone(), records);
        }

        trace!(
            listener = std::any::type_name::<L>(),
            tag = scope.tag(),
            suffix = scope.suffix(),
            keys = found.len(),
            "bound subscribers"
        );
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::error::InvokeError;
    use crate::listener::{MethodDescriptor, MethodTable};
    use crate::markers::{DEFAULT_TAG, Produce, Subscribe, ThreadAffinity};
    use crate::types::{PayloadType, RoutingKey};

    #[derive(Debug, PartialEq)]
    struct Reading(u32);

    struct Sensor {
        value: AtomicU32,
        seen: Mutex<Vec<u32>>,
    }

    impl Sensor {
        fn new(value: u32) -> Arc<Self> {
            Arc::new(Self {
                value: AtomicU32::new(value),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn current(&self) -> Reading {
            Reading(self.value.load(Ordering::SeqCst))
        }

        fn on_reading(&self, reading: &Reading) {
            self.seen.lock().unwrap().push(reading.0);
        }
    }

    impl Listener for Sensor {
        fn declare(table: &mut MethodTable<Self>) {
            table
                .produce("current", Produce::new().on(ThreadAffinity::Io), Sensor::current)
                .subscribe("on_reading", Subscribe::new().tags(["a", "b"]), Sensor::on_reading)
                .subscribe(
                    "on_reading",
                    Subscribe::new().on(ThreadAffinity::Single).dynamic_tag("zone"),
                    Sensor::on_reading,
                );
        }
    }

    fn finder() -> DeclaredFinder {
        DeclaredFinder::with_cache(Arc::new(DiscoveryCache::new()))
    }

    fn key<E: 'static>(tag: &str) -> RoutingKey {
        RoutingKey::of::<E>(tag).unwrap()
    }

    #[test]
    fn test_producers_bound_to_instance() {
        let sensor = Sensor::new(7);
        let producers = finder().find_all_producers(&sensor, &Scope::default()).unwrap();

        let record = &producers[&key::<Reading>(DEFAULT_TAG)];
        assert_eq!(record.affinity(), ThreadAffinity::Io);
        assert_eq!(record.method().name(), "current");

        let value = record.produce().unwrap();
        assert_eq!(value.downcast_ref::<Reading>(), Some(&Reading(7)));
    }

    #[test]
    fn test_subscribers_bound_and_delivered() {
        let sensor = Sensor::new(0);
        let subs = finder()
            .find_all_subscribers(&sensor, &Scope::new("zone", "-7"))
            .unwrap();

        assert_eq!(subs.len(), 3);
        for tag in ["a", "b", "zone-7"] {
            let records = &subs[&key::<Reading>(tag)];
            assert_eq!(records.len(), 1, "tag {tag}");
            for record in records {
                record.deliver(&Reading(1)).unwrap();
            }
        }
        assert_eq!(*sensor.seen.lock().unwrap(), vec![1, 1, 1]);

        let zone = subs[&key::<Reading>("zone-7")].iter().next().unwrap();
        assert_eq!(zone.affinity(), ThreadAffinity::Single);
    }

    #[test]
    fn test_deliver_wrong_payload_fails() {
        let sensor = Sensor::new(0);
        let subs = finder().find_all_subscribers(&sensor, &Scope::default()).unwrap();
        let record = subs[&key::<Reading>("a")].iter().next().unwrap();
        let err = record.deliver(&"not a reading").unwrap_err();
        assert!(matches!(err, InvokeError::PayloadMismatch { .. }));
    }

    #[test]
    fn test_records_are_per_instance() {
        let finder = finder();
        let one = Sensor::new(1);
        let two = Sensor::new(2);
        let a = finder.find_all_subscribers(&one, &Scope::default()).unwrap();
        let b = finder.find_all_subscribers(&two, &Scope::default()).unwrap();
        let again = finder.find_all_subscribers(&one, &Scope::default()).unwrap();

        let ra = a[&key::<Reading>("a")].iter().next().unwrap();
        let rb = b[&key::<Reading>("a")].iter().next().unwrap();
        let ra2 = again[&key::<Reading>("a")].iter().next().unwrap();
        assert_ne!(ra, rb);
        assert_eq!(ra, ra2);

        let p1 = finder.find_all_producers(&one, &Scope::default()).unwrap();
        let p2 = finder.find_all_producers(&two, &Scope::default()).unwrap();
        let v1 = p1[&key::<Reading>(DEFAULT_TAG)].produce().unwrap();
        let v2 = p2[&key::<Reading>(DEFAULT_TAG)].produce().unwrap();
        assert_eq!(v1.downcast_ref::<Reading>(), Some(&Reading(1)));
        assert_eq!(v2.downcast_ref::<Reading>(), Some(&Reading(2)));
    }

    struct Echo;
    impl Listener for Echo {
        fn declare(table: &mut MethodTable<Self>) {
            table
                .subscribe("on_reading", Subscribe::new().tags(["a", "a"]), |_: &Echo, _: &Reading| {})
                .subscribe(
                    "on_reading",
                    Subscribe::new().dynamic_tags(["room", "room"]),
                    |_: &Echo, _: &Reading| {},
                );
        }
    }

    #[test]
    fn test_duplicate_bindings_collapse() {
        let echo = Arc::new(Echo);
        let subs = finder()
            .find_all_subscribers(&echo, &Scope::new("room", "-1"))
            .unwrap();
        assert_eq!(subs[&key::<Reading>("a")].len(), 1);
        assert_eq!(subs[&key::<Reading>("room-1")].len(), 1);
    }

    struct Thermometer;
    impl Listener for Thermometer {
        fn declare(table: &mut MethodTable<Self>) {
            table
                .produce("current", Produce::new().tag("t"), |_: &Thermometer| Reading(20))
                .subscribe("on_reading", Subscribe::new().dynamic_tag("zone"), |_: &Thermometer, _: &Reading| {});
        }
    }

    #[test]
    fn test_producer_keys_stable_across_scopes() {
        let finder = finder();
        let t = Arc::new(Thermometer);

        let first = finder.find_all_producers(&t, &Scope::new("zone", "-1")).unwrap();
        let again = finder.find_all_producers(&t, &Scope::new("zone", "-1")).unwrap();
        let other = finder.find_all_producers(&t, &Scope::new("elsewhere", "-2")).unwrap();

        let keys = |m: &ProducerMap| {
            let mut k: Vec<String> = m.keys().map(|k| k.tag().to_string()).collect();
            k.sort();
            k
        };
        assert_eq!(keys(&first), vec!["t"]);
        assert_eq!(keys(&first), keys(&again));
        assert_eq!(keys(&first), keys(&other));

        let subs = finder.find_all_subscribers(&t, &Scope::new("elsewhere", "-2")).unwrap();
        assert!(subs.is_empty());
    }

    struct Opaque;
    impl Listener for Opaque {
        fn declare(table: &mut MethodTable<Self>) {
            table.method(
                MethodDescriptor::new("snapshot")
                    .returns(PayloadType::of::<Reading>())
                    .produce(Produce::new()),
            );
        }
    }

    #[test]
    fn test_raw_producer_binds_but_is_not_invocable() {
        let producers = finder()
            .find_all_producers(&Arc::new(Opaque), &Scope::default())
            .unwrap();
        let err = producers[&key::<Reading>(DEFAULT_TAG)].produce().unwrap_err();
        assert_eq!(err.as_label(), "invoke_not_invocable");
    }

    fn current_reading<F: Finder>(finder: &F, sensor: &Arc<Sensor>) -> Reading {
        let producers = finder.find_all_producers(sensor, &Scope::default()).unwrap();
        let value = producers[&key::<Reading>(DEFAULT_TAG)].produce().unwrap();
        Reading(value.downcast_ref::<Reading>().unwrap().0)
    }

    #[test]
    fn test_finder_swapped_through_generics() {
        let sensor = Sensor::new(5);
        assert_eq!(current_reading(&finder(), &sensor), Reading(5));
        assert_eq!(current_reading(&DeclaredFinder::GLOBAL, &sensor), Reading(5));
    }

    #[test]
    fn test_global_finder_uses_global_cache() {
        struct GlobalOnly;
        impl Listener for GlobalOnly {
            fn declare(table: &mut MethodTable<Self>) {
                table.produce("v", Produce::new(), |_: &GlobalOnly| Reading(3));
            }
        }

        DeclaredFinder::GLOBAL
            .find_all_producers(&Arc::new(GlobalOnly), &Scope::default())
            .unwrap();
        let cached = DiscoveryCache::global().cached_producers(&crate::types::TypeKey::of::<GlobalOnly>());
        assert!(cached.is_some());
    }
}
