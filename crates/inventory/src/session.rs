//! Session-scoped state holder: one ledger, one audit log, one change bus.
//!
//! A session is created at start-up from a [`SessionConfig`], lives for as long
//! as its owner keeps it, and is never persisted. Every mutation goes through
//! a ledger command; each event the ledger emits becomes exactly one audit
//! entry and one published [`ChangeEnvelope`]. The clock is read once per
//! command and the audit entry is stamped with the event's `occurred_at`.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use stockledger_core::{AggregateRoot, DomainResult, SessionId};
use stockledger_events::{
    Event, EventBus, EventEnvelope, InMemoryEventBus, Subscription, execute,
};

use crate::audit::{self, AuditEntry, AuditLog};
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, SeedItem, SessionConfig};
use crate::ledger::{
    AddOrIncrement, BatchAdd, InventoryLedger, LedgerCommand, ProductEntry, Purchase, Remove,
};

/// Notification published after each applied change.
///
/// The envelope's sequence number equals the audit entry's sequence, which
/// is also the session version right after that change.
pub type ChangeEnvelope = EventEnvelope<AuditEntry>;

#[derive(Debug)]
pub struct InventorySession<C: Clock = SystemClock> {
    ledger: InventoryLedger,
    audit: AuditLog,
    config: SessionConfig,
    clock: C,
    bus: Arc<InMemoryEventBus<ChangeEnvelope>>,
}

impl InventorySession<SystemClock> {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> InventorySession<C> {
    pub fn with_clock(config: SessionConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let id = SessionId::new();
        let ledger = InventoryLedger::seeded(
            id,
            config.seed.iter().cloned().map(ProductEntry::from),
        );
        debug!(session_id = %id, products = ledger.len(), "inventory session started");

        Ok(Self {
            ledger,
            audit: AuditLog::new(),
            config,
            clock,
            bus: Arc::new(InMemoryEventBus::new()),
        })
    }

    pub fn id(&self) -> SessionId {
        *self.ledger.id()
    }

    /// Number of changes applied so far. Unchanged by no-ops and rejections.
    pub fn version(&self) -> u64 {
        self.ledger.version()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Current rows, in display order.
    pub fn current_entries(&self) -> Vec<ProductEntry> {
        self.ledger.entries().to_vec()
    }

    /// Full history as of this call.
    pub fn history(&self) -> Vec<AuditEntry> {
        self.audit.snapshot()
    }

    /// Receive a [`ChangeEnvelope`] for every change applied from now on.
    pub fn subscribe(&self) -> Subscription<ChangeEnvelope> {
        self.bus.subscribe()
    }

    /// Add `quantity` units of `name`, creating the product if needed.
    ///
    /// Returns `Ok(None)` for a blank name. Rejects `quantity <= 0`.
    pub fn add_or_increment(
        &mut self,
        name: &str,
        quantity: i64,
    ) -> DomainResult<Option<AuditEntry>> {
        let command = LedgerCommand::AddOrIncrement(AddOrIncrement {
            name: name.to_string(),
            quantity,
            occurred_at: self.clock.now(),
        });
        Ok(self.dispatch(command)?.pop())
    }

    /// Delete `name` entirely. `Ok(None)` if it does not exist.
    pub fn remove(&mut self, name: &str) -> DomainResult<Option<AuditEntry>> {
        let command = LedgerCommand::Remove(Remove {
            name: name.to_string(),
            occurred_at: self.clock.now(),
        });
        Ok(self.dispatch(command)?.pop())
    }

    /// Take `quantity` units of `name`, clamping stock at zero.
    ///
    /// The audit entry records `quantity` as requested, not the clamped
    /// amount actually taken. `Ok(None)` if `name` does not exist.
    pub fn purchase(&mut self, name: &str, quantity: i64) -> DomainResult<Option<AuditEntry>> {
        let command = LedgerCommand::Purchase(Purchase {
            name: name.to_string(),
            quantity,
            occurred_at: self.clock.now(),
        });
        Ok(self.dispatch(command)?.pop())
    }

    /// Add every item in order, one audit entry each.
    ///
    /// Duplicate names accumulate. If any item has a non-positive quantity the
    /// whole batch is rejected and nothing is applied.
    pub fn batch_add<I, T>(&mut self, items: I) -> DomainResult<Vec<AuditEntry>>
    where
        I: IntoIterator<Item = T>,
        T: Into<SeedItem>,
    {
        let command = LedgerCommand::BatchAdd(BatchAdd {
            items: items
                .into_iter()
                .map(|item| {
                    let item: SeedItem = item.into();
                    ProductEntry::from(item)
                })
                .collect(),
            occurred_at: self.clock.now(),
        });
        self.dispatch(command)
    }

    /// Apply the batch payload from the session config.
    pub fn batch_add_configured(&mut self) -> DomainResult<Vec<AuditEntry>> {
        let items = self.config.batch.clone();
        self.batch_add(items)
    }

    /// Products with stock strictly below `threshold`.
    pub fn low_stock_alert(&self, threshold: i64) -> Vec<String> {
        self.ledger.low_stock(threshold)
    }

    /// Products below the configured threshold.
    pub fn low_stock(&self) -> Vec<String> {
        self.low_stock_alert(self.config.low_stock_threshold)
    }

    fn dispatch(&mut self, command: LedgerCommand) -> DomainResult<Vec<AuditEntry>> {
        let events = execute(&mut self.ledger, &command).inspect_err(|err| {
            warn!(session_id = %self.ledger.id(), error = %err, "ledger command rejected");
        })?;

        if events.is_empty() {
            debug!(session_id = %self.ledger.id(), ?command, "ledger command was a no-op");
            return Ok(Vec::new());
        }

        let mut recorded = Vec::with_capacity(events.len());
        for event in &events {
            let (action, quantity) = audit::describe(event);
            let entry = self
                .audit
                .append(action, event.product(), quantity, event.occurred_at())
                .clone();

            debug!(
                session_id = %self.ledger.id(),
                sequence = entry.sequence(),
                action = %entry.action(),
                product = entry.product(),
                quantity = entry.quantity(),
                "inventory change recorded"
            );

            self.publish(&entry);
            recorded.push(entry);
        }

        Ok(recorded)
    }

    fn publish(&self, entry: &AuditEntry) {
        let envelope = EventEnvelope::new(
            Uuid::now_v7(),
            *self.ledger.id(),
            entry.sequence(),
            entry.clone(),
        );

        // Notification is best-effort; the audit log already holds the change.
        if let Err(err) = self.bus.publish(envelope) {
            warn!(session_id = %self.ledger.id(), error = ?err, "failed to publish change");
        }
    }
}
