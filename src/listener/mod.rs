//! Listener declarations.
//!
//! This module provides the declaration side of discovery:
//! - [`Listener`] - trait through which a type declares its methods
//! - [`MethodTable`] - builder passed to [`Listener::declare`]
//! - [`MethodDescriptor`], [`Visibility`] - shape and markers of one method
//! - [`ListenerType`] - erased per-type description consumed by discovery

mod descriptor;
mod listener;
mod table;

pub use descriptor::{MethodDescriptor, Visibility};
pub use listener::{Listener, ListenerType};
pub use table::MethodTable;
