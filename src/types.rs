//! Core types for spark-testing-library.
//!
//! Small identity and flag types shared by the DOM, the engine and the
//! query layer.

use std::fmt;

// =============================================================================
// Node Identity
// =============================================================================

/// Stable identity of a DOM node.
///
/// Ids are never reused, so two nodes with the same id are the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Mount Anchor
// =============================================================================

/// Opaque token the engine hands out for a container it rendered into.
///
/// The anchor is the only way to address a mounted tree for teardown. It is
/// never reconstructed from the container itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountAnchor(pub(crate) u64);

// =============================================================================
// Node Type
// =============================================================================

/// Kind of a DOM node, mirroring the DOM `nodeType` values we support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
    Document,
    Fragment,
}

// =============================================================================
// Text Match Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Options controlling how text is normalized and compared.
    ///
    /// Combine with bitwise OR: `MatchFlags::TRIM | MatchFlags::EXACT`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MatchFlags: u8 {
        /// Full-string, case-sensitive comparison. Without it, matching is a
        /// case-insensitive substring search.
        const EXACT = 1 << 0;
        /// Strip leading and trailing whitespace before comparing.
        const TRIM = 1 << 1;
        /// Collapse runs of whitespace into a single space.
        const COLLAPSE_WHITESPACE = 1 << 2;
    }
}

impl Default for MatchFlags {
    fn default() -> Self {
        MatchFlags::all()
    }
}

impl MatchFlags {
    /// Default normalization with a loose (substring, case-insensitive) match.
    pub fn loose() -> Self {
        MatchFlags::TRIM | MatchFlags::COLLAPSE_WHITESPACE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_flags_default() {
        let flags = MatchFlags::default();
        assert!(flags.contains(MatchFlags::EXACT));
        assert!(flags.contains(MatchFlags::TRIM));
        assert!(flags.contains(MatchFlags::COLLAPSE_WHITESPACE));

        let loose = MatchFlags::loose();
        assert!(!loose.contains(MatchFlags::EXACT));
        assert!(loose.contains(MatchFlags::TRIM));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(7).to_string(), "#7");
    }
}
