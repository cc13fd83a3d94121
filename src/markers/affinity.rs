//! # Thread affinity of a listener method.
//!
//! [`ThreadAffinity`] is recorded by discovery and handed to the dispatch loop with
//! every bound record. Discovery itself never executes anything.

use crate::types::TypeKey;

/// Execution context a bound method wants to be invoked on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ThreadAffinity {
    /// The application's main thread (default).
    #[default]
    Main,
    /// A freshly spawned thread per call.
    NewThread,
    /// Pool sized for blocking I/O.
    Io,
    /// Pool sized for CPU-bound work.
    Computation,
    /// Queued on the calling thread, run after the current call finishes.
    Trampoline,
    /// Inline on the publishing thread.
    Immediate,
    /// One shared background thread, FIFO.
    Single,
    /// Any background worker.
    Background,
}

impl ThreadAffinity {
    /// Nominal type this affinity value is declared by.
    ///
    /// Used by the bound-method identity policy; every variant reports the same type.
    pub fn declaring_type(&self) -> TypeKey {
        TypeKey::of::<ThreadAffinity>()
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ThreadAffinity::Main => "main",
            ThreadAffinity::NewThread => "new_thread",
            ThreadAffinity::Io => "io",
            ThreadAffinity::Computation => "computation",
            ThreadAffinity::Trampoline => "trampoline",
            ThreadAffinity::Immediate => "immediate",
            ThreadAffinity::Single => "single",
            ThreadAffinity::Background => "background",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_variants_share_declaring_type() {
        assert_eq!(
            ThreadAffinity::Main.declaring_type(),
            ThreadAffinity::Background.declaring_type()
        );
        assert_eq!(ThreadAffinity::default(), ThreadAffinity::Main);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_labels_match_as_label() {
        let json = serde_json::to_string(&ThreadAffinity::NewThread).unwrap();
        assert_eq!(json, "\"new_thread\"");
        let back: ThreadAffinity = serde_json::from_str("\"io\"").unwrap();
        assert_eq!(back.as_label(), "io");
    }
}
