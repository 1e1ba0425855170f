//! Append-only audit trail of ledger changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::LedgerEvent;

/// What kind of change an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Added,
    Removed,
    Purchased,
    BatchAdded,
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            AuditAction::Added => "added",
            AuditAction::Removed => "removed",
            AuditAction::Purchased => "purchased",
            AuditAction::BatchAdded => "batch_added",
        };
        f.write_str(label)
    }
}

/// One immutable record of a past change.
///
/// `quantity` is the amount involved in the action, never the resulting
/// total. For purchases it is the requested amount, even when the stock was
/// clamped at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    sequence: u64,
    timestamp: DateTime<Utc>,
    action: AuditAction,
    product: String,
    quantity: i64,
}

impl AuditEntry {
    /// 1-based position in the log.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn action(&self) -> AuditAction {
        self.action
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

/// Action and quantity an event contributes to the audit trail.
pub(crate) fn describe(event: &LedgerEvent) -> (AuditAction, i64) {
    match event {
        LedgerEvent::StockAdded(e) => (AuditAction::Added, e.quantity),
        LedgerEvent::BatchItemAdded(e) => (AuditAction::BatchAdded, e.quantity),
        LedgerEvent::ProductRemoved(e) => (AuditAction::Removed, e.quantity),
        LedgerEvent::StockPurchased(e) => (AuditAction::Purchased, e.requested),
    }
}

/// Ordered, append-only sequence of [`AuditEntry`].
///
/// No removal, no compaction, no size cap. Only the owning session appends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return it.
    ///
    /// Timestamps never go backwards: if `at` is earlier than the last entry,
    /// the last entry's timestamp is used instead.
    pub(crate) fn append(
        &mut self,
        action: AuditAction,
        product: impl Into<String>,
        quantity: i64,
        at: DateTime<Utc>,
    ) -> &AuditEntry {
        let timestamp = match self.entries.last() {
            Some(last) if last.timestamp > at => last.timestamp,
            _ => at,
        };

        self.entries.push(AuditEntry {
            sequence: self.entries.len() as u64 + 1,
            timestamp,
            action,
            product: product.into(),
            quantity,
        });

        // Just pushed, so `last` is present.
        &self.entries[self.entries.len() - 1]
    }

    /// Read-only view of the full log.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Owned copy of the log as of this call.
    pub fn snapshot(&self) -> Vec<AuditEntry> {
        self.entries.clone()
    }

    /// Entries recorded after `sequence` (exclusive).
    pub fn since(&self, sequence: u64) -> &[AuditEntry] {
        let start = usize::try_from(sequence)
            .unwrap_or(usize::MAX)
            .min(self.entries.len());
        &self.entries[start..]
    }

    pub fn last(&self) -> Option<&AuditEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn append_numbers_entries_from_one() {
        let mut log = AuditLog::new();
        log.append(AuditAction::Added, "A", 5, at(0));
        let second = log.append(AuditAction::Removed, "A", 5, at(1)).clone();

        assert_eq!(second.sequence(), 2);
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].sequence(), 1);
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let mut log = AuditLog::new();
        log.append(AuditAction::Added, "A", 1, at(10));
        let entry = log.append(AuditAction::Added, "A", 1, at(3)).clone();

        assert_eq!(entry.timestamp(), at(10));
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let mut log = AuditLog::new();
        log.append(AuditAction::Purchased, "Headset", 50, at(0));
        let snapshot = log.snapshot();
        log.append(AuditAction::Added, "Headset", 1, at(1));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].quantity(), 50);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn since_returns_tail_after_sequence() {
        let mut log = AuditLog::new();
        for i in 0..4 {
            log.append(AuditAction::Added, "A", i + 1, at(i));
        }

        let tail: Vec<_> = log.since(2).iter().map(|e| e.sequence()).collect();
        assert_eq!(tail, vec![3, 4]);
        assert!(log.since(4).is_empty());
        assert!(log.since(99).is_empty());
        assert_eq!(log.since(0).len(), 4);
    }

    #[test]
    fn entries_serialize_with_history_columns() {
        let mut log = AuditLog::new();
        let entry = log.append(AuditAction::BatchAdded, "Webcam Full HD", 12, at(0));

        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(json["action"], "batch_added");
        assert_eq!(json["product"], "Webcam Full HD");
        assert_eq!(json["quantity"], 12);
        assert_eq!(json["sequence"], 1);
        assert!(json["timestamp"].is_string());
    }
}
