//! Error types raised by method discovery and by instance-bound records.
//!
//! This module defines two main error enums:
//!
//! - [`DiscoveryError`]: configuration errors found while inspecting a listener's
//!   declared methods. They are raised synchronously to whoever registers the listener.
//! - [`InvokeError`]: errors raised when a bound record is invoked with the wrong
//!   listener or payload.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

use crate::types::RoutingKey;

/// What exactly is wrong with a marked method's shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureFault {
    /// The method takes the wrong number of parameters.
    #[error("requires {found} arguments, expected {expected}")]
    ParameterCount {
        /// Number of parameters the marker demands.
        expected: usize,
        /// Number of parameters the method declares.
        found: usize,
    },

    /// The payload type is an interface (trait object), not a concrete type.
    #[error("payload {type_name} is an interface, a concrete type is required")]
    InterfacePayload {
        /// Nominal name of the offending type.
        type_name: &'static str,
    },

    /// The payload type is the unit ("no value") type.
    #[error("has no payload type")]
    NoPayload,

    /// The method is not externally callable.
    #[error("is not public")]
    NotPublic,
}

/// # Errors produced by method discovery.
///
/// None of these are recoverable at runtime: the listener's declarations must be fixed.
/// Once a listener type passes discovery, cached lookups never raise them again.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// A subscribe-marked method has an unusable signature.
    #[error("method {method} has a subscribe marker but {fault}")]
    InvalidSubscriberSignature {
        /// Qualified method name (`Type::method`).
        method: String,
        /// The violated rule.
        fault: SignatureFault,
    },

    /// A produce-marked method has an unusable signature.
    #[error("method {method} has a produce marker but {fault}")]
    InvalidProducerSignature {
        /// Qualified method name (`Type::method`).
        method: String,
        /// The violated rule.
        fault: SignatureFault,
    },

    /// Two produce-methods of one listener type resolve to the same routing key.
    #[error("producer for {key} has already been registered (while adding {method})")]
    DuplicateProducer {
        /// Qualified name of the method that collided.
        method: String,
        /// The contested routing key.
        key: RoutingKey,
    },

    /// A routing key was built over the unit ("no value") type.
    #[error("routing key {tag:?} cannot carry the unit type")]
    UnitRoutingKey {
        /// Tag the key was requested for.
        tag: String,
    },
}

impl DiscoveryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use dynbus::{DiscoveryError, SignatureFault};
    ///
    /// let err = DiscoveryError::InvalidSubscriberSignature {
    ///     method: "Audit::on_ping".into(),
    ///     fault: SignatureFault::NotPublic,
    /// };
    /// assert_eq!(err.as_label(), "invalid_subscriber_signature");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DiscoveryError::InvalidSubscriberSignature { .. } => "invalid_subscriber_signature",
            DiscoveryError::InvalidProducerSignature { .. } => "invalid_producer_signature",
            DiscoveryError::DuplicateProducer { .. } => "duplicate_producer",
            DiscoveryError::UnitRoutingKey { .. } => "unit_routing_key",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DiscoveryError::InvalidSubscriberSignature { method, fault } => {
                format!("subscriber {method}: {fault}")
            }
            DiscoveryError::InvalidProducerSignature { method, fault } => {
                format!("producer {method}: {fault}")
            }
            DiscoveryError::DuplicateProducer { method, key } => {
                format!("duplicate producer {method} for {key}")
            }
            DiscoveryError::UnitRoutingKey { tag } => format!("unit payload for tag={tag:?}"),
        }
    }

    /// Returns the signature fault, if this is a signature error.
    pub fn fault(&self) -> Option<&SignatureFault> {
        match self {
            DiscoveryError::InvalidSubscriberSignature { fault, .. }
            | DiscoveryError::InvalidProducerSignature { fault, .. } => Some(fault),
            _ => None,
        }
    }
}

/// # Errors produced by invoking an instance-bound record.
///
/// These only happen when a dispatch loop hands a record the wrong payload, or
/// when the record was bound from a descriptor that carries no callable.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    /// The bound target is not an instance of the declaring listener type.
    #[error("listener is not a {expected}")]
    ListenerMismatch {
        /// Expected listener type name.
        expected: &'static str,
    },

    /// The delivered payload is not of the subscribed type.
    #[error("payload is not a {expected}")]
    PayloadMismatch {
        /// Expected payload type name.
        expected: &'static str,
    },

    /// The method was declared without a callable body.
    #[error("method {method} has no callable body")]
    NotInvocable {
        /// Qualified method name.
        method: String,
    },
}

impl InvokeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            InvokeError::ListenerMismatch { .. } => "invoke_listener_mismatch",
            InvokeError::PayloadMismatch { .. } => "invoke_payload_mismatch",
            InvokeError::NotInvocable { .. } => "invoke_not_invocable",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            InvokeError::ListenerMismatch { expected } => format!("expected listener {expected}"),
            InvokeError::PayloadMismatch { expected } => format!("expected payload {expected}"),
            InvokeError::NotInvocable { method } => format!("not invocable: {method}"),
        }
    }
}
