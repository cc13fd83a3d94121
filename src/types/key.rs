//! # Nominal type identities and routing keys.
//!
//! - [`TypeKey`] identifies a Rust type by [`TypeId`] (the name is carried for logs only).
//! - [`PayloadType`] is a [`TypeKey`] classified as concrete, interface or unit.
//! - [`RoutingKey`] is the `(tag, payload type)` pair events are routed by.
//!
//! ## Rules
//! - Payload matching is exact nominal identity: no subtype or trait matching.
//! - The unit type `()` is the "no value" sentinel and can never be routed.
//! - Keys are immutable after construction.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::DiscoveryError;

/// Nominal identity of a Rust type.
///
/// Equality and hashing use the [`TypeId`] only.
#[derive(Clone, Copy, Debug)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Identity of `T` (trait objects included).
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name as reported by the compiler (diagnostic only, not stable).
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Classification of a payload type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// A concrete, routable type.
    Concrete,
    /// An interface (trait object) type; never routable.
    Interface,
    /// The unit "no value" type; never routable.
    Unit,
}

/// A parameter or return type as seen by discovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PayloadType {
    key: TypeKey,
    kind: PayloadKind,
}

impl PayloadType {
    /// Payload type of a sized `T`; `()` is classified as [`PayloadKind::Unit`].
    pub fn of<T: 'static>() -> Self {
        let key = TypeKey::of::<T>();
        let kind = if key.id == TypeId::of::<()>() {
            PayloadKind::Unit
        } else {
            PayloadKind::Concrete
        };
        Self { key, kind }
    }

    /// Payload type of an interface, typically `dyn Trait`.
    pub fn interface<T: ?Sized + 'static>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            kind: PayloadKind::Interface,
        }
    }

    /// The "no value" sentinel.
    pub fn unit() -> Self {
        Self::of::<()>()
    }

    /// Nominal identity of the type.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Concrete, interface or unit.
    pub fn kind(&self) -> PayloadKind {
        self.kind
    }

    /// Type name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.key.name
    }

    #[inline]
    pub fn is_unit(&self) -> bool {
        matches!(self.kind, PayloadKind::Unit)
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, PayloadKind::Interface)
    }
}

/// Routing identity of an event channel: `(tag, payload type)`.
///
/// ## Example
/// ```rust
/// use dynbus::RoutingKey;
///
/// struct Ping;
///
/// let a = RoutingKey::of::<Ping>("alerts").unwrap();
/// let b = RoutingKey::of::<Ping>("alerts").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.tag(), "alerts");
/// assert!(RoutingKey::of::<()>("alerts").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RoutingKey {
    tag: Arc<str>,
    payload: TypeKey,
}

impl RoutingKey {
    /// Creates a key; fails with [`DiscoveryError::UnitRoutingKey`] for the unit type.
    pub fn new(tag: impl Into<Arc<str>>, payload: PayloadType) -> Result<Self, DiscoveryError> {
        let tag = tag.into();
        if payload.is_unit() {
            return Err(DiscoveryError::UnitRoutingKey {
                tag: tag.to_string(),
            });
        }
        Ok(Self {
            tag,
            payload: payload.key,
        })
    }

    /// Shorthand for `RoutingKey::new(tag, PayloadType::of::<E>())`.
    pub fn of<E: 'static>(tag: impl Into<Arc<str>>) -> Result<Self, DiscoveryError> {
        Self::new(tag, PayloadType::of::<E>())
    }

    /// Routing tag (static tag, or dynamic tag + suffix).
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Nominal payload type.
    pub fn payload(&self) -> TypeKey {
        self.payload
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[tag={:?} type={}]", self.tag, self.payload.name)
    }
}
