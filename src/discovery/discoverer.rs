//! # Method discovery: validation and routing-key expansion.
//!
//! [`MethodDiscoverer::discover`] walks the methods a listener type declares and
//! builds two tables:
//! - [`ProducerTable`]: routing key → the single producer method for it
//! - [`SubscriberTable`]: routing key → subscriber methods, in insertion order
//!
//! ## Expansion
//! ```text
//! for method in listener.methods():
//!   ├─ synthetic              → skip
//!   ├─ subscribe marker       → validate (1 param, concrete, public)
//!   │    ├─ no dynamic tags   → for tag in tags.rev() or [DEFAULT_TAG]:
//!   │    │                         push (tag, T)
//!   │    └─ no static tags    → for d in dynamic_tags.rev() or [DEFAULT_DYNAMIC_TAG]:
//!   │                              d != scope.tag → skip
//!   │                              push (d + suffix, T) unless an equivalent is present
//!   └─ produce marker         → validate (0 params, concrete non-unit return, public)
//!                                for tag in tags.rev() or [DEFAULT_TAG]:
//!                                  (tag, R) taken → DuplicateProducer
//! ```
//!
//! ## Rules
//! - A method carrying both markers is a subscriber only.
//! - A subscriber declaring both static and dynamic tags expands to nothing.
//! - Discovery is all-or-nothing: on error no table is returned.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::config::Scope;
use crate::error::{DiscoveryError, SignatureFault};
use crate::listener::{ListenerType, MethodDescriptor};
use crate::markers::{DEFAULT_DYNAMIC_TAG, DEFAULT_TAG, Produce, Subscribe, ThreadAffinity};
use crate::types::{BoundMethod, PayloadType, RoutingKey, TypeKey};

/// Producer methods of one listener type, by routing key.
pub type ProducerTable = HashMap<RoutingKey, BoundMethod>;

/// Subscriber methods of one listener type, by routing key.
pub type SubscriberTable = HashMap<RoutingKey, Vec<BoundMethod>>;

/// Output of one discovery pass.
#[derive(Clone, Debug, Default)]
pub struct Discovered {
    pub producers: ProducerTable,
    pub subscribers: SubscriberTable,
}

/// Stateless discovery engine.
pub struct MethodDiscoverer;

impl MethodDiscoverer {
    /// Validates and expands every method declared directly on `listener`.
    pub fn discover(listener: &ListenerType, scope: &Scope) -> Result<Discovered, DiscoveryError> {
        let mut found = Discovered::default();
        let owner = listener.key();

        for method in listener.methods() {
            if method.is_synthetic() {
                continue;
            }
            if let Some(marker) = method.subscribe_marker() {
                load_subscriber(owner, method, marker, scope, &mut found.subscribers)?;
            } else if let Some(marker) = method.produce_marker() {
                load_producer(owner, method, marker, &mut found.producers)?;
            }
        }
        Ok(found)
    }
}

fn load_subscriber(
    owner: TypeKey,
    method: &MethodDescriptor,
    marker: &Subscribe,
    scope: &Scope,
    subscribers: &mut SubscriberTable,
) -> Result<(), DiscoveryError> {
    let payload = subscriber_payload(owner, method)?;
    let bound = bind(owner, method, marker.thread, payload);

    if marker.dynamic_tags.is_empty() {
        for tag in newest_first(&marker.tags, DEFAULT_TAG) {
            let key = RoutingKey::new(tag, payload)?;
            subscribers.entry(key).or_default().push(bound.clone());
        }
    }

    if marker.tags.is_empty() {
        for dynamic in newest_first(&marker.dynamic_tags, DEFAULT_DYNAMIC_TAG) {
            if dynamic != scope.tag() {
                continue;
            }
            let key = RoutingKey::new(scope.key_tag(dynamic), payload)?;
            let methods = subscribers.entry(key).or_default();
            if !methods.iter().any(|m| m.is_equivalent(&bound)) {
                methods.push(bound.clone());
            }
        }
    }
    Ok(())
}

fn load_producer(
    owner: TypeKey,
    method: &MethodDescriptor,
    marker: &Produce,
    producers: &mut ProducerTable,
) -> Result<(), DiscoveryError> {
    let payload = producer_payload(owner, method)?;
    let bound = bind(owner, method, marker.thread, payload);

    for tag in newest_first(&marker.tags, DEFAULT_TAG) {
        match producers.entry(RoutingKey::new(tag, payload)?) {
            Entry::Occupied(taken) => {
                return Err(DiscoveryError::DuplicateProducer {
                    method: bound.qualified_name(),
                    key: taken.key().clone(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(bound.clone());
            }
        }
    }
    Ok(())
}

fn subscriber_payload(owner: TypeKey, method: &MethodDescriptor) -> Result<PayloadType, DiscoveryError> {
    let invalid = |fault| DiscoveryError::InvalidSubscriberSignature {
        method: qualified(owner, method),
        fault,
    };

    let &[param] = method.params() else {
        return Err(invalid(SignatureFault::ParameterCount {
            expected: 1,
            found: method.params().len(),
        }));
    };
    if param.is_interface() {
        return Err(invalid(SignatureFault::InterfacePayload {
            type_name: param.name(),
        }));
    }
    if param.is_unit() {
        return Err(invalid(SignatureFault::NoPayload));
    }
    if !method.is_public() {
        return Err(invalid(SignatureFault::NotPublic));
    }
    Ok(param)
}

fn producer_payload(owner: TypeKey, method: &MethodDescriptor) -> Result<PayloadType, DiscoveryError> {
    let invalid = |fault| DiscoveryError::InvalidProducerSignature {
        method: qualified(owner, method),
        fault,
    };

    if !method.params().is_empty() {
        return Err(invalid(SignatureFault::ParameterCount {
            expected: 0,
            found: method.params().len(),
        }));
    }
    let returns = method.return_type();
    if returns.is_unit() {
        return Err(invalid(SignatureFault::NoPayload));
    }
    if returns.is_interface() {
        return Err(invalid(SignatureFault::InterfacePayload {
            type_name: returns.name(),
        }));
    }
    if !method.is_public() {
        return Err(invalid(SignatureFault::NotPublic));
    }
    Ok(returns)
}

fn bind(
    owner: TypeKey,
    method: &MethodDescriptor,
    thread: ThreadAffinity,
    payload: PayloadType,
) -> BoundMethod {
    BoundMethod::new(
        thread,
        method.shared_name(),
        owner,
        payload,
        method.invoker.clone(),
    )
}

/// Declared tags from last to first, or the sentinel alone when none are declared.
fn newest_first<'a>(tags: &'a [String], sentinel: &'a str) -> Vec<&'a str> {
    if tags.is_empty() {
        vec![sentinel]
    } else {
        tags.iter().rev().map(String::as_str).collect()
    }
}

fn qualified(owner: TypeKey, method: &MethodDescriptor) -> String {
    format!("{}::{}", owner.name(), method.name())
}
