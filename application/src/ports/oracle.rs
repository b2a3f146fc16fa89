//! Text-generation oracle port
//!
//! Defines the interface to the external text-generation service. The
//! oracle is non-deterministic and its output is untrusted: even when
//! asked for JSON it may return anything, so every call site applies the
//! defensive parsing from [`blueprint_domain::parsing`].

use async_trait::async_trait;
use blueprint_domain::Message;
use thiserror::Error;

/// Errors that can occur while calling the oracle
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway to the text-generation service
///
/// One operation: turn a role-tagged prompt into free-form text.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait TextOracle: Send + Sync {
    async fn generate(&self, messages: &[Message]) -> Result<String, OracleError>;
}
