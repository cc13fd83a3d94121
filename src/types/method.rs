//! # Discovered methods, before they are bound to an instance.
//!
//! A [`BoundMethod`] pairs one declared method with the thread affinity its marker
//! asked for. It carries a type-erased invoker so that binding to an instance later
//! is a cheap clone.
//!
//! ## Identity policy
//! Two bound methods are considered the same when they share the method name, the
//! declaring type and the declaring type of their thread affinity. Parameter types
//! do **not** take part, so two differently typed methods with the same name on the
//! same listener collapse into one.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::InvokeError;
use crate::markers::ThreadAffinity;

use super::key::{PayloadType, TypeKey};

/// Event value handed between producers, the dispatch loop and subscribers.
pub type Payload = Arc<dyn Any + Send + Sync>;

pub(crate) type ProduceFn = dyn Fn(&dyn Any) -> Result<Payload, InvokeError> + Send + Sync;
pub(crate) type DeliverFn = dyn Fn(&dyn Any, &dyn Any) -> Result<(), InvokeError> + Send + Sync;

/// Erased callable attached to a declared method.
#[derive(Clone)]
pub(crate) enum Invoker {
    Produce(Arc<ProduceFn>),
    Deliver(Arc<DeliverFn>),
    /// Declared without a body (raw descriptors).
    Opaque,
}

/// One discoverable method of a listener type, not yet bound to an instance.
#[derive(Clone)]
pub struct BoundMethod {
    affinity: ThreadAffinity,
    name: Arc<str>,
    declaring_type: TypeKey,
    payload: PayloadType,
    invoker: Invoker,
}

impl BoundMethod {
    pub(crate) fn new(
        affinity: ThreadAffinity,
        name: Arc<str>,
        declaring_type: TypeKey,
        payload: PayloadType,
        invoker: Invoker,
    ) -> Self {
        Self {
            affinity,
            name,
            declaring_type,
            payload,
            invoker,
        }
    }

    /// Execution context the method asked for.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Listener type the method is declared on.
    pub fn declaring_type(&self) -> TypeKey {
        self.declaring_type
    }

    /// Subscriber parameter type or producer return type.
    pub fn payload(&self) -> PayloadType {
        self.payload
    }

    /// `Type::method`, for diagnostics.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.declaring_type.name(), self.name)
    }

    /// True when both methods share name, declaring type and the affinity's declaring type.
    pub fn is_equivalent(&self, other: &BoundMethod) -> bool {
        self.name == other.name
            && self.declaring_type == other.declaring_type
            && self.affinity.declaring_type() == other.affinity.declaring_type()
    }

    pub(crate) fn invoke_produce(&self, target: &dyn Any) -> Result<Payload, InvokeError> {
        match &self.invoker {
            Invoker::Produce(f) => f(target),
            _ => Err(InvokeError::NotInvocable {
                method: self.qualified_name(),
            }),
        }
    }

    pub(crate) fn invoke_deliver(&self, target: &dyn Any, payload: &dyn Any) -> Result<(), InvokeError> {
        match &self.invoker {
            Invoker::Deliver(f) => f(target, payload),
            _ => Err(InvokeError::NotInvocable {
                method: self.qualified_name(),
            }),
        }
    }
}

impl PartialEq for BoundMethod {
    fn eq(&self, other: &Self) -> bool {
        self.is_equivalent(other)
    }
}

impl Eq for BoundMethod {}

impl Hash for BoundMethod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.declaring_type.hash(state);
        self.affinity.declaring_type().hash(state);
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("name", &self.name)
            .field("declaring_type", &self.declaring_type.name())
            .field("payload", &self.payload.name())
            .field("affinity", &self.affinity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Audit;
    struct Other;
    struct Ping;
    struct Pong;

    fn method<L: 'static, E: 'static>(name: &str, affinity: ThreadAffinity) -> BoundMethod {
        BoundMethod::new(
            affinity,
            name.into(),
            TypeKey::of::<L>(),
            PayloadType::of::<E>(),
            Invoker::Opaque,
        )
    }

    #[test]
    fn test_equivalence_ignores_payload_and_affinity_variant() {
        let a = method::<Audit, Ping>("on_event", ThreadAffinity::Main);
        let b = method::<Audit, Pong>("on_event", ThreadAffinity::Io);
        assert!(a.is_equivalent(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_equivalence_respects_name_and_owner() {
        let a = method::<Audit, Ping>("on_event", ThreadAffinity::Main);
        assert!(!a.is_equivalent(&method::<Audit, Ping>("on_other", ThreadAffinity::Main)));
        assert!(!a.is_equivalent(&method::<Other, Ping>("on_event", ThreadAffinity::Main)));
    }

    #[test]
    fn test_opaque_method_is_not_invocable() {
        let m = method::<Audit, Ping>("on_event", ThreadAffinity::Main);
        let err = m.invoke_deliver(&Audit, &Ping).unwrap_err();
        assert_eq!(err.as_label(), "invoke_not_invocable");
        assert!(m.invoke_produce(&Audit).is_err());
    }
}
