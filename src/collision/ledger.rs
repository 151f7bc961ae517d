//! Bodies that touched during the most recent physics advance

use ahash::AHashSet;
use serde::Serialize;

use crate::core::types::Handle;

/// Unordered pair of contact participants
///
/// `None` stands for static world geometry, which has no handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ContactPair {
    pub low: Option<Handle>,
    pub high: Option<Handle>,
}

impl ContactPair {
    pub fn new(a: Option<Handle>, b: Option<Handle>) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn involves(&self, handle: Handle) -> bool {
        self.low == Some(handle) || self.high == Some(handle)
    }
}

/// Pair-level contact record, rebuilt once per tick
#[derive(Debug, Clone, Default)]
pub struct ContactLedger {
    pairs: AHashSet<ContactPair>,
}

impl ContactLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Record a touching pair; returns false if it was already present
    pub fn record(&mut self, a: Option<Handle>, b: Option<Handle>) -> bool {
        self.pairs.insert(ContactPair::new(a, b))
    }

    pub fn contains(&self, a: Option<Handle>, b: Option<Handle>) -> bool {
        self.pairs.contains(&ContactPair::new(a, b))
    }

    /// Whether the body touched anything
    pub fn touched(&self, handle: Handle) -> bool {
        self.pairs.iter().any(|pair| pair.involves(handle))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in a stable order
    pub fn sorted_pairs(&self) -> Vec<ContactPair> {
        let mut pairs: Vec<ContactPair> = self.pairs.iter().copied().collect();
        pairs.sort();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_unordered() {
        let a = Some(Handle(1));
        let b = Some(Handle(4));
        assert_eq!(ContactPair::new(a, b), ContactPair::new(b, a));
    }

    #[test]
    fn test_record_once_per_pair() {
        let mut ledger = ContactLedger::new();
        assert!(ledger.record(Some(Handle(0)), Some(Handle(1))));
        assert!(!ledger.record(Some(Handle(1)), Some(Handle(0))));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_touched_includes_static_contacts() {
        let mut ledger = ContactLedger::new();
        ledger.record(None, Some(Handle(3)));
        assert!(ledger.touched(Handle(3)));
        assert!(!ledger.touched(Handle(2)));
        assert!(ledger.contains(Some(Handle(3)), None));
    }

    #[test]
    fn test_clear() {
        let mut ledger = ContactLedger::new();
        ledger.record(Some(Handle(0)), Some(Handle(1)));
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(!ledger.touched(Handle(0)));
    }
}
