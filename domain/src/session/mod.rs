//! Interview session domain.
//!
//! - [`entities::Session`] - one interview conversation and its state
//! - [`entities::Question`] - a single architecture-decision question
//! - [`message::Message`] - role-tagged prompt messages for the oracle
//! - [`stream::TurnEvent`] - output stream events for one turn

pub mod entities;
pub mod message;
pub mod stream;
