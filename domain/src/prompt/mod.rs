//! Prompt templates for the oracle tasks

pub mod template;

pub use template::InterviewPromptTemplate;
