//! Structured run report produced by one synchronization pass.

use serde::{Deserialize, Serialize};

use crate::EntityKind;

/// One field-level difference detected between an incoming document and the
/// stored row. Values are the canonical serialized forms used for
/// comparison (`"null"` for absent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub slug: String,
    pub kind: EntityKind,
    pub field: String,
    pub old: String,
    pub new: String,
}

/// The sole programmatic output of a sync run: per-kind processed counts,
/// created/updated/unchanged totals, the ordered field-change list, and the
/// ordered non-fatal error list. Rendering is the caller's concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    pub games_processed: usize,
    pub studios_processed: usize,
    pub publishers_processed: usize,
    pub designers_processed: usize,
    /// Catalog rows that survived parsing (not all of them insert a row).
    pub catalog_rows: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub changes: Vec<FieldChange>,
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a non-fatal error without aborting the run.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Total documents processed across all kinds.
    pub fn total_processed(&self) -> usize {
        self.games_processed
            + self.studios_processed
            + self.publishers_processed
            + self.designers_processed
    }
}
