//! Prompt templates for the four oracle tasks.
//!
//! The oracle is instructed to answer in JSON, but the instructions are
//! best-effort only; every response still goes through the defensive
//! parsing in [`crate::parsing`].

use crate::catalog::CATEGORIES;
use crate::session::entities::{Intent, Question};

/// Templates for generating prompts at each interview stage
pub struct InterviewPromptTemplate;

impl InterviewPromptTemplate {
    /// System prompt for intent extraction
    pub fn intent_system() -> &'static str {
        r#"You are an assistant that extracts structured project intent from a user's opening message.
Respond with a single JSON object and nothing else:
{"projectName": "string", "scope": "string", "goals": ["string", ...]}
Use short, concrete values. If the message names no project, infer a working title."#
    }

    /// User prompt for intent extraction
    pub fn intent_prompt(user_text: &str) -> String {
        format!(
            r#"Extract the project intent from this message:

{}"#,
            user_text
        )
    }

    /// System prompt for question planning
    pub fn planning_system() -> String {
        format!(
            r#"You are an experienced software architect planning an architecture-decision interview.
Produce 8 to 12 questions spanning these categories: {}.
Respond with a single JSON object and nothing else:
{{"questions": [{{"id": "string", "text": "string", "category": "string"}}, ...]}}
Ids must be short and unique. Every question must be answerable in one or two sentences."#,
            CATEGORIES.join(", ")
        )
    }

    /// User prompt for question planning
    pub fn planning_prompt(intent: &Intent) -> String {
        format!(
            r#"Plan the interview questions for this project:

Project: {}
Scope: {}
Goals:
{}"#,
            intent.project_name,
            intent.scope,
            bullet_list(&intent.goals)
        )
    }

    /// System prompt for answer mapping
    pub fn mapping_system() -> &'static str {
        r#"You map a user's free-form message onto open interview questions.
Respond with a single JSON object and nothing else:
{"mappings": [{"questionId": "string", "answer": "string", "confidence": 0.0}, ...]}
Confidence is a number between 0 and 1. Only include mappings with confidence 0.5 or higher.
A message may answer several questions, one question, or none. Answers may update questions that already have an answer."#
    }

    /// User prompt for answer mapping
    ///
    /// Enumerates every candidate question with its current answer so the
    /// oracle can distinguish fresh answers from corrections.
    pub fn mapping_prompt(candidates: &[&Question], message: &str) -> String {
        let mut prompt = String::from("Candidate questions:\n");
        for question in candidates {
            prompt.push_str(&format!(
                "- id: {} | category: {} | question: {} | current answer: {}\n",
                question.id(),
                question.category(),
                question.text(),
                question.answer().unwrap_or("(none)")
            ));
        }
        prompt.push_str(&format!("\nUser message:\n{}", message));
        prompt
    }

    /// System prompt for document synthesis
    pub fn synthesis_system() -> &'static str {
        r#"You are a software architect writing a design document from a completed interview.
Write a markdown document with exactly these sections, in this order:
1. Executive Summary
2. System Overview
3. Key Decisions
4. Technical Stack
5. Next Steps
Base everything on the interview transcript. Be specific; do not invent requirements that contradict the answers."#
    }

    /// User prompt for document synthesis
    pub fn synthesis_prompt(
        intent: &Intent,
        questions: &[Question],
        extra_notes: &[String],
    ) -> String {
        let mut prompt = format!(
            r#"Project: {}
Scope: {}
Goals:
{}

Interview transcript:
"#,
            intent.project_name,
            intent.scope,
            bullet_list(&intent.goals)
        );

        for question in questions {
            prompt.push_str(&format!(
                "[{}] {}\nAnswer: {}\n\n",
                question.category(),
                question.text(),
                question.answer().unwrap_or("(not answered)")
            ));
        }

        if !extra_notes.is_empty() {
            prompt.push_str("Additional notes from the user:\n");
            prompt.push_str(&bullet_list(extra_notes));
        }

        prompt
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
