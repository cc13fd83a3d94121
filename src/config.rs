//! # Registration scope.
//!
//! Provides [`Scope`], the caller-supplied partition parameters every discovery and
//! binding call takes.
//!
//! Scope is used in two ways:
//! 1. **Dynamic-tag gating**: a subscriber's dynamic tag only matches when it equals `tag`.
//! 2. **Key namespacing**: matched dynamic tags are routed under `dynamic + suffix`, so two
//!    bus instances sharing a dynamic tag value still get separate partitions.
//!
//! ## Sentinel values
//! - `tag = DEFAULT_DYNAMIC_TAG` → the unscoped partition (matches subscribers that
//!   declare no dynamic tags)
//! - `suffix = ""` → matched dynamic tags are used verbatim

use std::sync::Arc;

use crate::markers::DEFAULT_DYNAMIC_TAG;

/// Partition parameters of one registration.
///
/// ## Field semantics
/// - `tag`: runtime tag matched against declared dynamic tags
/// - `suffix`: appended to each matched dynamic tag to build its routing tag
///
/// ## Example
/// ```rust
/// use dynbus::Scope;
///
/// let scope = Scope::new("room", "-s1");
/// assert_eq!(scope.key_tag("room"), "room-s1");
/// assert!(Scope::default().is_unscoped());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Scope {
    tag: Arc<str>,
    suffix: Arc<str>,
}

impl Scope {
    /// Creates a scope with an explicit runtime tag and suffix.
    pub fn new(tag: impl Into<Arc<str>>, suffix: impl Into<Arc<str>>) -> Self {
        Self {
            tag: tag.into(),
            suffix: suffix.into(),
        }
    }

    /// Creates a scope for `tag` with an empty suffix.
    pub fn tagged(tag: impl Into<Arc<str>>) -> Self {
        Self::new(tag, "")
    }

    /// Returns the scope with its suffix replaced.
    pub fn with_suffix(mut self, suffix: impl Into<Arc<str>>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Runtime tag matched against declared dynamic tags.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Appended to matched dynamic tags.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// True for the partition of subscribers that declare no dynamic tags.
    #[inline]
    pub fn is_unscoped(&self) -> bool {
        &*self.tag == DEFAULT_DYNAMIC_TAG
    }

    /// Routing tag for a matched dynamic tag: `dynamic + suffix`.
    #[inline]
    pub fn key_tag(&self, dynamic: &str) -> String {
        let mut tag = String::with_capacity(dynamic.len() + self.suffix.len());
        tag.push_str(dynamic);
        tag.push_str(&self.suffix);
        tag
    }
}

impl Default for Scope {
    /// Default scope:
    ///
    /// - `tag = DEFAULT_DYNAMIC_TAG` (unscoped partition)
    /// - `suffix = ""`
    ///
    /// Subscribers declaring no tags at all match this partition through their implicit
    /// dynamic tag, so under the default scope they get two keys:
    /// `(DEFAULT_TAG, T)` and `(DEFAULT_DYNAMIC_TAG + suffix, T)`. Any other scope tag
    /// leaves them with `(DEFAULT_TAG, T)` only.
    fn default() -> Self {
        Self::new(DEFAULT_DYNAMIC_TAG, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_tag_concatenates_suffix() {
        let scope = Scope::tagged("Y").with_suffix("-s1");
        assert_eq!(scope.key_tag("Y"), "Y-s1");
        assert_eq!(Scope::tagged("Y").key_tag("Y"), "Y");
    }

    #[test]
    fn test_default_is_unscoped() {
        let scope = Scope::default();
        assert_eq!(scope.tag(), DEFAULT_DYNAMIC_TAG);
        assert_eq!(scope.suffix(), "");
        assert!(!Scope::tagged("room").is_unscoped());
    }
}
