//! Interactive chat REPL

pub mod repl;

pub use repl::ChatRepl;
