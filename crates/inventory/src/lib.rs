//! Inventory domain module.
//!
//! This crate contains the in-memory stock ledger, its append-only audit log
//! and the session object that owns both. Everything here is deterministic
//! domain logic (no IO beyond loading a config file, no HTTP, no storage).

pub mod audit;
pub mod clock;
pub mod config;
pub mod ledger;
pub mod session;

pub use audit::{AuditAction, AuditEntry, AuditLog};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, SeedItem, SessionConfig};
pub use ledger::{
    AddOrIncrement, BatchAdd, InventoryLedger, LedgerCommand, LedgerEvent, ProductEntry,
    ProductRemoved, Purchase, Remove, StockAdded, StockPurchased,
};
pub use session::{ChangeEnvelope, InventorySession};
