//! Received-item ledger for idempotent stream reapplication.
//!
//! The server resends the complete item list rather than deltas (on
//! reconnect, and after the data package). The ledger records which grants
//! have already been applied so a resend never double-counts a board cell.

use bingo_protocol::ItemGrant;
use std::collections::HashSet;

/// Ordered record of the item grants applied this session.
///
/// Keyed by the grant's identity attributes (item, source location, sending
/// player, flags). Insertion order is preserved alongside a hash index so
/// duplicate checks stay O(1) while the applied sequence remains inspectable.
#[derive(Debug, Clone, Default)]
pub struct ReceivedLedger {
    entries: Vec<ItemGrant>,
    seen: HashSet<ItemGrant>,
}

impl ReceivedLedger {
    /// Creates an empty ledger for a fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this grant has already been applied.
    pub fn contains(&self, grant: &ItemGrant) -> bool {
        self.seen.contains(grant)
    }

    /// Records a grant as applied. Returns `false` if it was already recorded.
    pub fn record(&mut self, grant: ItemGrant) -> bool {
        if !self.seen.insert(grant) {
            return false;
        }
        self.entries.push(grant);
        true
    }

    /// The applied grants in application order.
    pub fn entries(&self) -> &[ItemGrant] {
        &self.entries
    }

    /// Number of distinct grants applied.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no grants have been applied yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bingo_protocol::{ItemId, LocationId};

    fn grant(item: i64) -> ItemGrant {
        ItemGrant {
            item: ItemId(item),
            location: LocationId(item * 10),
            player: 1,
            flags: 0,
        }
    }

    #[test]
    fn duplicate_grants_are_rejected() {
        let mut ledger = ReceivedLedger::new();
        assert!(ledger.record(grant(1)));
        assert!(!ledger.record(grant(1)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn application_order_is_preserved() {
        let mut ledger = ReceivedLedger::new();
        ledger.record(grant(3));
        ledger.record(grant(1));
        ledger.record(grant(2));
        let items: Vec<i64> = ledger.entries().iter().map(|g| g.item.0).collect();
        assert_eq!(items, vec![3, 1, 2]);
    }
}
