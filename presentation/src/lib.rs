//! Presentation layer for blueprint-interview
//!
//! CLI definitions, the interactive chat REPL (the transport
//! collaborator), and console output formatting.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::Cli;
pub use output::ConsoleFormatter;
