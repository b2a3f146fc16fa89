//! Built-in question catalog used to repair planner output.
//!
//! The planner must never leave a session with fewer than
//! [`MIN_QUESTIONS`] questions. When the oracle returns too few usable
//! items, catalog entries are appended deterministically (one per
//! category, fixed ids, fixed order) until the floor is met.

use crate::session::entities::Question;

/// Minimum number of questions a planned session must have.
pub const MIN_QUESTIONS: usize = 8;

/// Fixed interview categories, in catalog order.
pub const CATEGORIES: &[&str] = &[
    "stack",
    "scalability",
    "data",
    "security",
    "integrations",
    "deployment",
    "ux",
    "api design",
];

/// The built-in catalog: one question per category, stable ids.
pub fn builtin_catalog() -> Vec<Question> {
    vec![
        Question::new(
            "builtin-stack",
            "Which languages, frameworks, and runtimes should the system be built on?",
            "stack",
        ),
        Question::new(
            "builtin-scalability",
            "What load should the system handle at launch and at the one-year horizon?",
            "scalability",
        ),
        Question::new(
            "builtin-data",
            "What are the core data entities, and which storage technology should hold them?",
            "data",
        ),
        Question::new(
            "builtin-security",
            "How are users authenticated and authorized, and what data needs protection at rest?",
            "security",
        ),
        Question::new(
            "builtin-integrations",
            "Which external services or third-party systems must the system integrate with?",
            "integrations",
        ),
        Question::new(
            "builtin-deployment",
            "Where and how will the system be deployed, and what does the release process look like?",
            "deployment",
        ),
        Question::new(
            "builtin-ux",
            "Who are the primary users and what are the most important user-facing flows?",
            "ux",
        ),
        Question::new(
            "builtin-api",
            "What API style (REST, GraphQL, gRPC, events) should the system expose, and to whom?",
            "api design",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_covers_every_category_once() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.len(), CATEGORIES.len());
        let categories: Vec<&str> = catalog.iter().map(|q| q.category()).collect();
        assert_eq!(categories, CATEGORIES.to_vec());
    }

    #[test]
    fn catalog_ids_are_unique_and_meet_the_floor() {
        let catalog = builtin_catalog();
        let ids: HashSet<&str> = catalog.iter().map(|q| q.id()).collect();
        assert_eq!(ids.len(), catalog.len());
        assert!(catalog.len() >= MIN_QUESTIONS);
    }

    #[test]
    fn catalog_questions_start_unanswered() {
        assert!(builtin_catalog().iter().all(|q| !q.is_answered()));
    }
}
