//! # Produce marker.
//!
//! A produce-marked method takes no arguments and returns the latest value of its
//! payload type. The bus can replay that value to subscribers registered later.
//! Produce markers have no dynamic tags.

use crate::markers::ThreadAffinity;

/// Marks a method as the producer of its return type.
///
/// ## Example
/// ```rust
/// use dynbus::{Produce, ThreadAffinity};
///
/// let marker = Produce::new().on(ThreadAffinity::Io).tag("a").tag("b");
/// assert_eq!(marker.tags, vec!["a".to_string(), "b".to_string()]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Produce {
    /// Execution context for invoking the producer.
    pub thread: ThreadAffinity,
    /// Static tags, in declaration order. Empty means [`DEFAULT_TAG`](crate::markers::DEFAULT_TAG).
    pub tags: Vec<String>,
}

impl Produce {
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
}
