//! Out-of-band symbol values
//!
//! Symbols cannot travel inside a JSON description; only their label can.
//! Reconstruction substitutes real symbols back in from a caller-supplied
//! table keyed by map entry.

use std::fmt;
use std::sync::Arc;

/// An opaque value with identity semantics.
///
/// Two symbols are equal only when they share an origin: clones of a symbol
/// compare equal, independently created symbols with the same label do not.
#[derive(Debug, Clone)]
pub struct Symbol {
    label: Arc<str>,
}

impl Symbol {
    /// Creates a fresh symbol carrying a display label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Arc::from(label.into().into_boxed_str()),
        }
    }

    /// The display label, used as the non-portable stand-in in descriptions.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.label, &other.label)
    }
}

impl Eq for Symbol {}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_identity() {
        let sym = Symbol::new("token");
        let clone = sym.clone();
        assert_eq!(sym, clone);
    }

    #[test]
    fn test_same_label_distinct_identity() {
        let a = Symbol::new("token");
        let b = Symbol::new("token");
        assert_ne!(a, b);
        assert_eq!(a.label(), b.label());
    }
}
