//! Session configuration: starter stock, batch payload and alert threshold.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::ProductEntry;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A `(name, quantity)` pair used for seeding and batch-adds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedItem {
    pub name: String,
    pub quantity: i64,
}

impl SeedItem {
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

impl From<SeedItem> for ProductEntry {
    fn from(item: SeedItem) -> Self {
        ProductEntry::new(item.name, item.quantity)
    }
}

impl<S: Into<String>> From<(S, i64)> for SeedItem {
    fn from((name, quantity): (S, i64)) -> Self {
        Self::new(name, quantity)
    }
}

/// Everything a session needs at start-up.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "low_stock_threshold": 3 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Products present when the session starts. Not recorded in the audit log.
    pub seed: Vec<SeedItem>,
    /// Payload applied by a configured batch-add.
    pub batch: Vec<SeedItem>,
    /// Products with stock strictly below this are reported as low.
    pub low_stock_threshold: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: vec![
                SeedItem::new("Mouse Gamer", 25),
                SeedItem::new("Teclado Mecânico", 15),
                SeedItem::new("Monitor 27''", 10),
                SeedItem::new("Notebook i5", 8),
                SeedItem::new("Headset", 30),
            ],
            batch: vec![
                SeedItem::new("Webcam Full HD", 12),
                SeedItem::new("Mousepad XL", 20),
                SeedItem::new("Cadeira Gamer", 3),
            ],
            low_stock_threshold: 5,
        }
    }
}

impl SessionConfig {
    /// Empty ledger, empty batch, default threshold.
    pub fn empty() -> Self {
        Self {
            seed: Vec::new(),
            batch: Vec::new(),
            ..Self::default()
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Seed names must be unique and non-blank with non-negative stock;
    /// batch items must be non-blank with positive quantities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for item in &self.seed {
            if item.name.trim().is_empty() {
                return Err(ConfigError::Invalid("seed item with blank name".into()));
            }
            if item.quantity < 0 {
                return Err(ConfigError::Invalid(format!(
                    "seed item '{}' has negative quantity {}",
                    item.name, item.quantity
                )));
            }
            if !seen.insert(item.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "seed item '{}' listed twice",
                    item.name
                )));
            }
        }

        for item in &self.batch {
            if item.name.trim().is_empty() {
                return Err(ConfigError::Invalid("batch item with blank name".into()));
            }
            if item.quantity <= 0 {
                return Err(ConfigError::Invalid(format!(
                    "batch item '{}' must have a positive quantity, got {}",
                    item.name, item.quantity
                )));
            }
        }

        Ok(())
    }
}
