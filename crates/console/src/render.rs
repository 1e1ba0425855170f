//! JSON shapes written to stdout.

use serde_json::{Value, json};

use stockledger_inventory::{AuditEntry, ProductEntry};

pub fn entries_to_json(entries: &[ProductEntry], total_units: i64) -> Value {
    json!({
        "products": entries,
        "total_units": total_units,
    })
}

pub fn history_to_json(history: &[AuditEntry]) -> Value {
    json!({ "history": history })
}

pub fn low_stock_to_json(threshold: i64, names: &[String]) -> Value {
    json!({
        "low_stock": names,
        "threshold": threshold,
    })
}

/// Result of a mutating command. `recorded` is empty for a no-op.
pub fn change_to_json(recorded: &[AuditEntry], version: u64) -> Value {
    json!({
        "applied": !recorded.is_empty(),
        "recorded": recorded,
        "version": version,
    })
}

pub fn error_to_json(code: &str, message: impl std::fmt::Display) -> Value {
    json!({
        "error": code,
        "message": message.to_string(),
    })
}
