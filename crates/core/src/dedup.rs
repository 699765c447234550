//! One representative function per type signature.

use std::collections::HashSet;

use crate::record::FunctionSpec;

/// The function standing in for every function that shares its signature.
pub type FormatEntry = FunctionSpec;

/// Collects the first function seen for each signature key.
///
/// Feed functions in ascending name order and the representative of each
/// signature is the lexicographically smallest name in its group.
#[derive(Debug, Default)]
pub struct SignatureDeduplicator {
    seen: HashSet<String>,
    formats: Vec<FormatEntry>,
}

impl SignatureDeduplicator {
    /// An empty deduplicator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `function`; returns `true` if it became a new representative.
    pub fn observe(&mut self, function: &FunctionSpec) -> bool {
        if self.seen.contains(&function.signature) {
            return false;
        }
        self.seen.insert(function.signature.clone());
        self.formats.push(function.clone());
        true
    }

    /// Number of distinct signatures seen so far.
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Whether nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Representatives in first-seen order.
    pub fn into_formats(self) -> Vec<FormatEntry> {
        self.formats
    }
}
