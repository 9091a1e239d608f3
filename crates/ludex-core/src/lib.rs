//! ludex-core: Shared types, errors, and configuration for the Ludex sync engine.

pub mod config;
pub mod error;
pub mod report;
pub mod types;

pub use config::*;
pub use error::*;
pub use report::*;
pub use types::*;
