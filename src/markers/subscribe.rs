//! # Subscribe marker.
//!
//! A subscribe-marked method takes exactly one argument, the payload.
//!
//! ## Static vs dynamic tags
//! ```text
//! tags only          → one key per static tag            (tag, T)
//! dynamic_tags only  → one key per matching dynamic tag   (dynamic + suffix, T)
//! neither            → (DEFAULT_TAG, T) and, for the unscoped partition,
//!                      (DEFAULT_DYNAMIC_TAG + suffix, T)
//! both               → no keys at all
//! ```
//! A dynamic tag only matches when it equals the runtime tag of the registration
//! scope (see [`Scope`](crate::Scope)).

use crate::markers::ThreadAffinity;

/// Marks a method as a subscriber of its parameter type.
///
/// ## Example
/// ```rust
/// use dynbus::Subscribe;
///
/// let room = Subscribe::new().dynamic_tag("room");
/// assert!(room.tags.is_empty());
/// assert_eq!(room.dynamic_tags, vec!["room".to_string()]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Subscribe {
    /// Execution context for delivering events.
    pub thread: ThreadAffinity,
    /// Static tags, in declaration order.
    pub tags: Vec<String>,
    /// Dynamic tags, in declaration order.
    pub dynamic_tags: Vec<String>,
}

impl Subscribe {
    /// Marker with default affinity and no tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the marker with the given thread affinity.
    pub fn on(mut self, thread: ThreadAffinity) -> Self {
        self.thread = thread;
        self
    }

    /// Appends a static tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Appends several static tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Appends a dynamic tag.
    pub fn dynamic_tag(mut self, tag: impl Into<String>) -> Self {
        self.dynamic_tags.push(tag.into());
        self
    }

    /// Appends several dynamic tags.
    pub fn dynamic_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dynamic_tags.extend(tags.into_iter().map(Into::into));
        self
    }
}
