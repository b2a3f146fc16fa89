//! Domain layer for blueprint-interview
//!
//! This crate contains the core business logic of the interview: the
//! session model, the defensive parsing of oracle output, the built-in
//! question catalog, and the prompt templates. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core concepts
//!
//! - **Session**: one conversation, advancing through the fixed phases
//!   Intent -> QuestionPlanning -> Interview -> Confirmation -> Synthesis.
//! - **Oracle output**: free-form text that should be JSON but often is
//!   not; everything in [`parsing`] assumes it is untrusted.

pub mod catalog;
pub mod core;
pub mod parsing;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use catalog::{builtin_catalog, CATEGORIES, MIN_QUESTIONS};
pub use core::error::DomainError;
pub use parsing::{
    extract_json_object, is_proceed_message, parse_answer_mappings, parse_intent,
    parse_planned_questions, parse_structured, AnswerMapping, PlannedQuestion,
    CONFIDENCE_THRESHOLD, PROCEED_KEYWORDS,
};
pub use prompt::InterviewPromptTemplate;
pub use session::{
    entities::{Intent, Phase, Question, Session},
    message::{Message, Role},
    stream::TurnEvent,
};
