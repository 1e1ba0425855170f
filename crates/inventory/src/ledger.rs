use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{Aggregate, AggregateRoot, DomainError, SessionId};
use stockledger_events::Event;

/// One row of the ledger: a product and how many units are in stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub name: String,
    pub quantity: i64,
}

impl ProductEntry {
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Aggregate root: InventoryLedger.
///
/// Holds the product table in insertion order. Names are unique; quantities
/// never drop below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLedger {
    id: SessionId,
    entries: Vec<ProductEntry>,
    version: u64,
}

impl InventoryLedger {
    /// Empty ledger for a fresh session.
    pub fn empty(id: SessionId) -> Self {
        Self {
            id,
            entries: Vec::new(),
            version: 0,
        }
    }

    /// Ledger pre-filled with starter stock.
    ///
    /// Seeding is not a change: the version stays at zero. Callers are
    /// expected to pass unique names with non-negative quantities (see
    /// `SessionConfig::validate`).
    pub fn seeded(id: SessionId, entries: impl IntoIterator<Item = ProductEntry>) -> Self {
        Self {
            id,
            entries: entries.into_iter().collect(),
            version: 0,
        }
    }

    /// Current rows, in display order.
    pub fn entries(&self) -> &[ProductEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn quantity_of(&self, name: &str) -> Option<i64> {
        self.find(name).map(|e| e.quantity)
    }

    /// Total units across all products.
    pub fn total_units(&self) -> i64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Names whose quantity is strictly below `threshold`, in display order.
    ///
    /// Names are unique, so the result has set semantics. Empty when nothing
    /// qualifies.
    pub fn low_stock(&self, threshold: i64) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.quantity < threshold)
            .map(|e| e.name.clone())
            .collect()
    }

    fn find(&self, name: &str) -> Option<&ProductEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut ProductEntry> {
        self.entries.iter_mut().find(|e| e.name == name)
    }
}

impl AggregateRoot for InventoryLedger {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddOrIncrement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOrIncrement {
    pub name: String,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remove {
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub name: String,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: BatchAdd.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAdd {
    pub items: Vec<ProductEntry>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCommand {
    AddOrIncrement(AddOrIncrement),
    Remove(Remove),
    Purchase(Purchase),
    BatchAdd(BatchAdd),
}

/// Event: StockAdded (single add, or one item of a batch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdded {
    pub name: String,
    /// Units added (the delta, not the resulting total).
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRemoved {
    pub name: String,
    /// Units the entry held when it was removed.
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockPurchased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPurchased {
    pub name: String,
    /// Units the caller asked for. Not clamped.
    pub requested: i64,
    /// Stock left after the purchase, `max(0, current - requested)`.
    pub remaining: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    StockAdded(StockAdded),
    BatchItemAdded(StockAdded),
    ProductRemoved(ProductRemoved),
    StockPurchased(StockPurchased),
}

impl LedgerEvent {
    /// Product the event is about.
    pub fn product(&self) -> &str {
        match self {
            LedgerEvent::StockAdded(e) | LedgerEvent::BatchItemAdded(e) => &e.name,
            LedgerEvent::ProductRemoved(e) => &e.name,
            LedgerEvent::StockPurchased(e) => &e.name,
        }
    }
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::StockAdded(_) => "inventory.stock.added",
            LedgerEvent::BatchItemAdded(_) => "inventory.stock.batch_added",
            LedgerEvent::ProductRemoved(_) => "inventory.product.removed",
            LedgerEvent::StockPurchased(_) => "inventory.stock.purchased",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::StockAdded(e) | LedgerEvent::BatchItemAdded(e) => e.occurred_at,
            LedgerEvent::ProductRemoved(e) => e.occurred_at,
            LedgerEvent::StockPurchased(e) => e.occurred_at,
        }
    }
}

impl Aggregate for InventoryLedger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::StockAdded(e) | LedgerEvent::BatchItemAdded(e) => {
                match self.find_mut(&e.name) {
                    Some(entry) => entry.quantity += e.quantity,
                    None => self.entries.push(ProductEntry::new(e.name.clone(), e.quantity)),
                }
            }
            LedgerEvent::ProductRemoved(e) => {
                self.entries.retain(|entry| entry.name != e.name);
            }
            LedgerEvent::StockPurchased(e) => {
                if let Some(entry) = self.find_mut(&e.name) {
                    entry.quantity = e.remaining;
                }
            }
        }

        // +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::AddOrIncrement(cmd) => self.handle_add(cmd),
            LedgerCommand::Remove(cmd) => Ok(self.handle_remove(cmd)),
            LedgerCommand::Purchase(cmd) => Ok(self.handle_purchase(cmd)),
            LedgerCommand::BatchAdd(cmd) => self.handle_batch(cmd),
        }
    }
}

/// Whitespace-only names count as blank too, not just the empty string.
fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

fn ensure_positive(quantity: i64) -> Result<(), DomainError> {
    if quantity <= 0 {
        return Err(DomainError::invalid_quantity(quantity));
    }
    Ok(())
}

fn checked_total(current: i64, delta: i64, name: &str) -> Result<i64, DomainError> {
    current
        .checked_add(delta)
        .ok_or_else(|| DomainError::validation(format!("stock of '{name}' would overflow")))
}

impl InventoryLedger {
    fn handle_add(&self, cmd: &AddOrIncrement) -> Result<Vec<LedgerEvent>, DomainError> {
        if is_blank(&cmd.name) {
            return Ok(Vec::new());
        }
        ensure_positive(cmd.quantity)?;
        checked_total(self.quantity_of(&cmd.name).unwrap_or(0), cmd.quantity, &cmd.name)?;

        Ok(vec![LedgerEvent::StockAdded(StockAdded {
            name: cmd.name.clone(),
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &Remove) -> Vec<LedgerEvent> {
        let Some(entry) = self.find(&cmd.name) else {
            return Vec::new();
        };

        vec![LedgerEvent::ProductRemoved(ProductRemoved {
            name: entry.name.clone(),
            quantity: entry.quantity,
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_purchase(&self, cmd: &Purchase) -> Vec<LedgerEvent> {
        let Some(entry) = self.find(&cmd.name) else {
            return Vec::new();
        };

        let remaining = entry.quantity.saturating_sub(cmd.quantity).max(0);

        vec![LedgerEvent::StockPurchased(StockPurchased {
            name: entry.name.clone(),
            requested: cmd.quantity,
            remaining,
            occurred_at: cmd.occurred_at,
        })]
    }

    /// All-or-nothing validation, then one event per item in input order.
    fn handle_batch(&self, cmd: &BatchAdd) -> Result<Vec<LedgerEvent>, DomainError> {
        let items: Vec<&ProductEntry> = cmd.items.iter().filter(|i| !is_blank(&i.name)).collect();

        for item in &items {
            ensure_positive(item.quantity)?;
        }

        // Running totals so duplicate names within one batch accumulate.
        let mut totals: HashMap<&str, i64> = HashMap::new();
        for item in &items {
            let current = match totals.get(item.name.as_str()) {
                Some(total) => *total,
                None => self.quantity_of(&item.name).unwrap_or(0),
            };
            let total = checked_total(current, item.quantity, &item.name)?;
            totals.insert(item.name.as_str(), total);
        }

        Ok(items
            .into_iter()
            .map(|item| {
                LedgerEvent::BatchItemAdded(StockAdded {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    occurred_at: cmd.occurred_at,
                })
            })
            .collect())
    }
}
