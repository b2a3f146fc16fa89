//! Application layer for blueprint-interview
//!
//! This crate contains the Interview State Machine, the ports it depends
//! on, and the Session Router that serializes turns per session. It
//! depends only on the domain layer.

pub mod ports;
pub mod router;
pub mod use_cases;

// Re-export commonly used types
pub use ports::oracle::{OracleError, TextOracle};
pub use ports::turn_sink::{TurnSink, TurnStream};
pub use router::SessionRouter;
pub use use_cases::run_interview::{InterviewEngine, MISSING_INTENT_ERROR, SYNTHESIS_APOLOGY};
