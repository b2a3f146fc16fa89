//! Oracle adapters

pub mod http;

use thiserror::Error;

/// Errors raised while constructing an oracle adapter
#[derive(Error, Debug)]
pub enum OracleSetupError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

pub use http::HttpOracle;
