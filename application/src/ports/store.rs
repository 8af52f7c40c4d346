//! Shared types for storage ports
//!
//! Stores publish per-project [`Snapshot`]s through `tokio::sync::watch`
//! channels. Consumers pull the latest value or await the next change;
//! intermediate values may be coalesced but the latest is always observed.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;

/// Errors reported by storage adapters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A versioned view of a project's records.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    /// Strictly increasing per subscription source
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    /// The empty snapshot every channel starts from.
    pub fn initial() -> Self {
        Self {
            items: Vec::new(),
            sequence: 0,
            timestamp: Utc::now(),
        }
    }

    /// Successor snapshot carrying `items`.
    pub fn next(&self, items: Vec<T>) -> Self {
        Self {
            items,
            sequence: self.sequence + 1,
            timestamp: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Receiving end of a subscription.
pub type Subscription<T> = watch::Receiver<Snapshot<T>>;
