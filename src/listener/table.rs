//! # Per-type declaration table.
//!
//! [`MethodTable`] is the builder handed to [`Listener::declare`](crate::Listener::declare).
//! The typed helpers cover the common case; [`MethodTable::method`] accepts any raw
//! [`MethodDescriptor`].
//!
//! ## Rules
//! - Declaration order is preserved.
//! - Nothing is validated here; discovery validates on first use.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::markers::{Produce, Subscribe};

use super::{Listener, MethodDescriptor};

/// Declared methods of listener type `L`.
pub struct MethodTable<L> {
    methods: Vec<MethodDescriptor>,
    _listener: PhantomData<fn(&L)>,
}

impl<L: Listener> MethodTable<L> {
    pub(crate) fn new() -> Self {
        Self {
            methods: Vec::new(),
            _listener: PhantomData,
        }
    }

    /// Declares a subscriber `fn(&L, &E)`.
    pub fn subscribe<E, F>(&mut self, name: impl Into<Arc<str>>, marker: Subscribe, f: F) -> &mut Self
    where
        E: Send + Sync + 'static,
        F: Fn(&L, &E) + Send + Sync + 'static,
    {
        self.method(MethodDescriptor::subscriber(name, marker, f))
    }

    /// Declares a producer `fn(&L) -> E`.
    pub fn produce<E, F>(&mut self, name: impl Into<Arc<str>>, marker: Produce, f: F) -> &mut Self
    where
        E: Send + Sync + 'static,
        F: Fn(&L) -> E + Send + Sync + 'static,
    {
        self.method(MethodDescriptor::producer(name, marker, f))
    }

    /// Declares a raw method.
    pub fn method(&mut self, method: MethodDescriptor) -> &mut Self {
        self.methods.push(method);
        self
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub(crate) fn into_methods(self) -> Vec<MethodDescriptor> {
        self.methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::ListenerType;
    use crate::types::{PayloadType, TypeKey};

    struct Ping;

    struct Audit;

    impl Audit {
        fn on_ping(&self, _ping: &Ping) {}
    }

    impl Listener for Audit {
        fn declare(table: &mut MethodTable<Self>) {
            table
                .subscribe("on_ping", Subscribe::new(), Audit::on_ping)
                .produce("last", Produce::new(), |_: &Audit| Ping)
                .method(MethodDescriptor::new("helper"));
        }
    }

    #[test]
    fn test_typed_helpers_record_shapes_in_order() {
        let ty = ListenerType::of::<Audit>();
        assert_eq!(ty.key(), TypeKey::of::<Audit>());

        let names: Vec<&str> = ty.methods().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["on_ping", "last", "helper"]);

        let on_ping = &ty.methods()[0];
        assert_eq!(on_ping.params(), &[PayloadType::of::<Ping>()]);
        assert!(on_ping.is_public());
        assert!(on_ping.subscribe_marker().is_some());

        let last = &ty.methods()[1];
        assert!(last.params().is_empty());
        assert_eq!(last.return_type(), PayloadType::of::<Ping>());
        assert!(last.produce_marker().is_some());

        let helper = &ty.methods()[2];
        assert!(helper.subscribe_marker().is_none() && helper.produce_marker().is_none());
    }

    #[test]
    fn test_raw_descriptor_flags() {
        let m = MethodDescriptor::new("bridge").private().synthetic();
        assert!(!m.is_public());
        assert!(m.is_synthetic());
        assert!(m.return_type().is_unit());
    }
}
