//! # Listener trait and its erased type description.
//!
//! [`Listener`] is how a type declares its produce/subscribe methods. Declaration
//! runs once per type, on the first discovery request, and feeds [`ListenerType`],
//! the erased, instance-independent description discovery works on.

use crate::types::TypeKey;

use super::{MethodDescriptor, MethodTable};

/// A type whose methods can produce or subscribe to bus events.
///
/// # Example
/// ```
/// use dynbus::{Listener, MethodTable, Produce, Subscribe};
///
/// struct Temperature(f64);
///
/// struct Thermostat;
///
/// impl Thermostat {
///     fn on_temperature(&self, _t: &Temperature) {}
///     fn current(&self) -> Temperature {
///         Temperature(21.5)
///     }
/// }
///
/// impl Listener for Thermostat {
///     fn declare(table: &mut MethodTable<Self>) {
///         table
///             .subscribe("on_temperature", Subscribe::new().tag("outdoor"), Thermostat::on_temperature)
///             .produce("current", Produce::new(), Thermostat::current);
///     }
/// }
/// ```
pub trait Listener: Sized + Send + Sync + 'static {
    /// Records every method of `Self` that carries a marker (others may be recorded too).
    fn declare(table: &mut MethodTable<Self>);
}

/// Erased description of a listener type: its identity and declared methods.
#[derive(Clone, Debug)]
pub struct ListenerType {
    key: TypeKey,
    methods: Vec<MethodDescriptor>,
}

impl ListenerType {
    /// Runs `L::declare` and captures the result.
    pub fn of<L: Listener>() -> Self {
        let mut table = MethodTable::<L>::new();
        L::declare(&mut table);
        Self {
            key: TypeKey::of::<L>(),
            methods: table.into_methods(),
        }
    }

    /// Builds a description from already collected descriptors.
    pub fn from_parts(key: TypeKey, methods: Vec<MethodDescriptor>) -> Self {
        Self { key, methods }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Methods declared directly on this type, in declaration order.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }
}
