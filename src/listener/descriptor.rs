//! # Method descriptors.
//!
//! A [`MethodDescriptor`] is everything discovery needs to know about one declared
//! method: name, parameter and return payload types, visibility, whether it is a
//! synthetic bridge, its markers, and (for typed declarations) an erased body.
//!
//! Descriptors are usually created through [`MethodTable`](crate::MethodTable)'s typed
//! helpers. Raw descriptors built with [`MethodDescriptor::new`] can describe any shape,
//! including invalid ones, and carry no body.

use std::any::{Any, type_name};
use std::sync::Arc;

use crate::error::InvokeError;
use crate::listener::Listener;
use crate::markers::{Produce, Subscribe};
use crate::types::{DeliverFn, Invoker, Payload, PayloadType, ProduceFn};

/// Whether a method is externally callable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Declared shape and markers of one listener method.
#[derive(Clone)]
pub struct MethodDescriptor {
    name: Arc<str>,
    params: Vec<PayloadType>,
    returns: PayloadType,
    visibility: Visibility,
    synthetic: bool,
    subscribe: Option<Subscribe>,
    produce: Option<Produce>,
    pub(crate) invoker: Invoker,
}

impl MethodDescriptor {
    /// Raw descriptor: public, no parameters, unit return, no markers, no body.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: PayloadType::unit(),
            visibility: Visibility::Public,
            synthetic: false,
            subscribe: None,
            produce: None,
            invoker: Invoker::Opaque,
        }
    }

    /// Typed subscriber: `fn(&L, &E)` marked with `marker`.
    pub fn subscriber<L, E, F>(name: impl Into<Arc<str>>, marker: Subscribe, f: F) -> Self
    where
        L: Listener,
        E: Send + Sync + 'static,
        F: Fn(&L, &E) + Send + Sync + 'static,
    {
        let deliver: Arc<DeliverFn> = Arc::new(move |target: &dyn Any, payload: &dyn Any| -> Result<(), InvokeError> {
            let listener = target
                .downcast_ref::<L>()
                .ok_or(InvokeError::ListenerMismatch {
                    expected: type_name::<L>(),
                })?;
            let event = payload
                .downcast_ref::<E>()
                .ok_or(InvokeError::PayloadMismatch {
                    expected: type_name::<E>(),
                })?;
            f(listener, event);
            Ok(())
        });

        let mut method = Self::new(name).param(PayloadType::of::<E>()).subscribe(marker);
        method.invoker = Invoker::Deliver(deliver);
        method
    }

    /// Typed producer: `fn(&L) -> E` marked with `marker`.
    pub fn producer<L, E, F>(name: impl Into<Arc<str>>, marker: Produce, f: F) -> Self
    where
        L: Listener,
        E: Send + Sync + 'static,
        F: Fn(&L) -> E + Send + Sync + 'static,
    {
        let produce: Arc<ProduceFn> = Arc::new(move |target: &dyn Any| -> Result<Payload, InvokeError> {
            let listener = target
                .downcast_ref::<L>()
                .ok_or(InvokeError::ListenerMismatch {
                    expected: type_name::<L>(),
                })?;
            Ok(Arc::new(f(listener)) as Payload)
        });

        let mut method = Self::new(name).returns(PayloadType::of::<E>()).produce(marker);
        method.invoker = Invoker::Produce(produce);
        method
    }

    /// Appends a parameter type.
    pub fn param(mut self, ty: PayloadType) -> Self {
        self.params.push(ty);
        self
    }

    /// Sets the return type.
    pub fn returns(mut self, ty: PayloadType) -> Self {
        self.returns = ty;
        self
    }

    /// Marks the method as not externally callable.
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Marks the method as a synthetic bridge; discovery skips it entirely.
    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    /// Attaches a subscribe marker.
    pub fn subscribe(mut self, marker: Subscribe) -> Self {
        self.subscribe = Some(marker);
        self
    }

    /// Attaches a produce marker.
    pub fn produce(mut self, marker: Produce) -> Self {
        self.produce = Some(marker);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn params(&self) -> &[PayloadType] {
        &self.params
    }

    pub fn return_type(&self) -> PayloadType {
        self.returns
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        matches!(self.visibility, Visibility::Public)
    }

    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn subscribe_marker(&self) -> Option<&Subscribe> {
        self.subscribe.as_ref()
    }

    pub fn produce_marker(&self) -> Option<&Produce> {
        self.produce.as_ref()
    }
}

impl std::fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("visibility", &self.visibility)
            .field("synthetic", &self.synthetic)
            .field("subscribe", &self.subscribe)
            .field("produce", &self.produce)
            .finish_non_exhaustive()
    }
}
