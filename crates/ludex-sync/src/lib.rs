//! ludex-sync: The synchronization engine.
//!
//! One run is a single linear pass: discover documents, parse and validate
//! them, diff against the persisted rows, and apply the result inside one
//! transaction. Per-document failures are recorded and skipped; a storage
//! failure rolls the whole run back.

pub mod discovery;
pub mod engine;

pub use discovery::{discover_documents, DiscoveredDocs, VaultPaths};
pub use engine::{PendingRefs, SyncEngine};
