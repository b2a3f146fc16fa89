//! Infrastructure layer for blueprint-interview
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, plus configuration file loading.

pub mod config;
pub mod oracle;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileOracleConfig, FileReplConfig};
pub use oracle::{HttpOracle, OracleSetupError};
