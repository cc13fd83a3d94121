//! # Instance-bound producer and subscriber records.
//!
//! Records pair a listener instance with one [`BoundMethod`]. They are created fresh
//! by every [`Finder`](crate::Finder) call and owned by the caller; the cache keeps no
//! reference to them.
//!
//! ## Equality
//! [`SubscriberRecord`] equality is `(instance identity, method name, declaring type,
//! thread affinity)`, so the same method bound to the same instance is stored once per
//! routing key.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::InvokeError;
use crate::markers::ThreadAffinity;
use crate::types::{BoundMethod, Payload};

/// Erased listener instance.
pub type Target = Arc<dyn Any + Send + Sync>;

/// A producer method bound to a listener instance.
#[derive(Clone)]
pub struct ProducerRecord {
    target: Target,
    method: BoundMethod,
}

impl ProducerRecord {
    pub(crate) fn new(target: Target, method: BoundMethod) -> Self {
        Self { target, method }
    }

    /// Discovered method this record invokes.
    pub fn method(&self) -> &BoundMethod {
        &self.method
    }

    /// Execution context the dispatch loop should invoke on.
    pub fn affinity(&self) -> ThreadAffinity {
        self.method.affinity()
    }

    /// Listener instance the method is bound to.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Calls the producer and returns its current value.
    pub fn produce(&self) -> Result<Payload, InvokeError> {
        self.method.invoke_produce(self.target.as_ref())
    }
}

impl fmt::Debug for ProducerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProducerRecord")
            .field("target", &Arc::as_ptr(&self.target))
            .field("method", &self.method)
            .finish()
    }
}

/// A subscriber method bound to a listener instance.
#[derive(Clone)]
pub struct SubscriberRecord {
    target: Target,
    method: BoundMethod,
}

impl SubscriberRecord {
    pub(crate) fn new(target: Target, method: BoundMethod) -> Self {
        Self { target, method }
    }

    /// Discovered method this record invokes.
    pub fn method(&self) -> &BoundMethod {
        &self.method
    }

    /// Execution context the dispatch loop should invoke on.
    pub fn affinity(&self) -> ThreadAffinity {
        self.method.affinity()
    }

    /// Listener instance the method is bound to.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Delivers one event to the subscriber.
    ///
    /// Fails with [`InvokeError::PayloadMismatch`] when `payload` is not the subscribed type.
    pub fn deliver(&self, payload: &dyn Any) -> Result<(), InvokeError> {
        self.method.invoke_deliver(self.target.as_ref(), payload)
    }

    fn target_addr(&self) -> *const () {
        Arc::as_ptr(&self.target) as *const ()
    }
}

impl PartialEq for SubscriberRecord {
    fn eq(&self, other: &Self) -> bool {
        self.target_addr() == other.target_addr()
            && self.method.name() == other.method.name()
            && self.method.declaring_type() == other.method.declaring_type()
            && self.method.affinity() == other.method.affinity()
    }
}

impl Eq for SubscriberRecord {}

impl Hash for SubscriberRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target_addr().hash(state);
        self.method.name().hash(state);
        self.method.declaring_type().hash(state);
        self.method.affinity().hash(state);
    }
}

impl fmt::Debug for SubscriberRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRecord")
            .field("target", &self.target_addr())
            .field("method", &self.method)
            .finish()
    }
}
