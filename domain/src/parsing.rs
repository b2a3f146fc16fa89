//! Defensive parsing of oracle output.
//!
//! The oracle is asked for JSON but treated as an untrusted text source:
//! every call site extracts the first balanced-brace object from the raw
//! text, attempts a typed parse, and falls back to a safe default. No
//! unparsed shape propagates past a handler boundary.
//!
//! | Function | Oracle task | Fallback |
//! |----------|-------------|----------|
//! | [`parse_intent`] | Intent extraction | `Intent::fallback(raw)` |
//! | [`parse_planned_questions`] | Question planning | empty list (caller repairs) |
//! | [`parse_answer_mappings`] | Answer mapping | empty list (caller falls back) |

use crate::session::entities::Intent;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Minimum confidence for an answer mapping to be applied.
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Phrases that advance the Confirmation phase to Synthesis.
///
/// Matching is case-insensitive substring over the trimmed message.
pub const PROCEED_KEYWORDS: &[&str] = &["yes", "proceed", "generate", "go ahead", "continue", "ready"];

/// A question proposed by the planning oracle call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedQuestion {
    pub id: String,
    pub text: String,
    pub category: String,
}

/// One answer-to-question attribution proposed by the mapping oracle call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerMapping {
    pub question_id: String,
    pub answer: String,
    pub confidence: f64,
}

impl AnswerMapping {
    pub fn is_confident(&self) -> bool {
        self.confidence >= CONFIDENCE_THRESHOLD
    }
}

/// Extract the first top-level balanced-brace JSON object substring.
///
/// Scans from the first `{`, tracking string literals and escapes so braces
/// inside strings don't affect the depth count. Returns `None` when the
/// object never balances.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse a typed value out of untrusted oracle text, or return `fallback`.
///
/// Locates the first balanced-brace object in `text` and deserializes it;
/// any extraction or parse failure yields the fallback unchanged.
pub fn parse_structured<T: DeserializeOwned>(text: &str, fallback: T) -> T {
    extract_json_object(text)
        .and_then(|json| serde_json::from_str(json).ok())
        .unwrap_or(fallback)
}

/// Parse the intent-extraction response.
///
/// The raw user message is threaded through so the fallback record keeps it
/// as the single goal.
pub fn parse_intent(text: &str, raw_message: &str) -> Intent {
    parse_structured(text, Intent::fallback(raw_message))
}

/// Parse the question-planning response.
///
/// Expected shape: `{"questions": [{"id", "text", "category"}, ...]}`.
/// Malformed items, items with empty id or text, and duplicate ids are
/// skipped rather than failing the whole response. An unusable response
/// yields an empty list; the planner repairs from the built-in catalog.
pub fn parse_planned_questions(text: &str) -> Vec<PlannedQuestion> {
    let Some(json) = extract_json_object(text) else {
        return Vec::new();
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(json) else {
        return Vec::new();
    };
    let Some(items) = value.get("questions").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    let mut questions: Vec<PlannedQuestion> = Vec::new();
    for item in items {
        let Ok(question) = serde_json::from_value::<PlannedQuestion>(item.clone()) else {
            continue;
        };
        if question.id.trim().is_empty() || question.text.trim().is_empty() {
            continue;
        }
        if questions.iter().any(|q| q.id == question.id) {
            continue;
        }
        questions.push(question);
    }
    questions
}

/// Parse the answer-mapping response.
///
/// Expected shape: `{"mappings": [{"questionId", "answer", "confidence"},
/// ...]}`. Malformed items are skipped; integer confidences are accepted.
/// Any parse failure yields an empty mapping; the caller decides whether
/// the single-question fallback applies.
pub fn parse_answer_mappings(text: &str) -> Vec<AnswerMapping> {
    let Some(json) = extract_json_object(text) else {
        return Vec::new();
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(json) else {
        return Vec::new();
    };
    let Some(items) = value.get("mappings").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| serde_json::from_value::<AnswerMapping>(item.clone()).ok())
        .filter(|m| !m.question_id.trim().is_empty())
        .collect()
}

/// Does the message ask to proceed to document generation?
///
/// Case-insensitive substring match against [`PROCEED_KEYWORDS`] over the
/// trimmed message.
pub fn is_proceed_message(message: &str) -> bool {
    let normalized = message.trim().to_lowercase();
    PROCEED_KEYWORDS
        .iter()
        .any(|keyword| normalized.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== extract_json_object ====================

    #[test]
    fn extracts_bare_object() {
        assert_eq!(extract_json_object(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn extracts_object_from_surrounding_prose() {
        let text = "Sure! Here you go:\n```json\n{\"a\": {\"b\": 2}}\n```\nAnything else?";
        assert_eq!(extract_json_object(text), Some("{\"a\": {\"b\": 2}}"));
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_depth() {
        let text = r#"{"note": "use {braces} and \"quotes\" freely", "n": 1}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn unbalanced_object_yields_none() {
        assert_eq!(extract_json_object(r#"{"a": 1"#), None);
        assert_eq!(extract_json_object("no json here"), None);
    }

    #[test]
    fn returns_first_object_only() {
        let text = r#"{"first": 1} {"second": 2}"#;
        assert_eq!(extract_json_object(text), Some(r#"{"first": 1}"#));
    }

    // ==================== parse_structured / parse_intent ====================

    #[test]
    fn parse_intent_happy_path() {
        let text = r#"Extracted: {"projectName": "Chat App", "scope": "Realtime", "goals": ["low latency"]}"#;
        let intent = parse_intent(text, "raw");
        assert_eq!(intent.project_name, "Chat App");
        assert_eq!(intent.scope, "Realtime");
        assert_eq!(intent.goals, vec!["low latency".to_string()]);
    }

    #[test]
    fn parse_intent_falls_back_on_garbage() {
        let intent = parse_intent("I could not produce JSON, sorry.", "I want a chat app");
        assert_eq!(intent.project_name, "Unknown");
        assert_eq!(intent.scope, "General");
        assert_eq!(intent.goals, vec!["I want a chat app".to_string()]);
    }

    #[test]
    fn parse_intent_falls_back_on_wrong_shape() {
        let intent = parse_intent(r#"{"name": "missing required fields"}"#, "raw text");
        assert_eq!(intent.project_name, "Unknown");
    }

    // ==================== parse_planned_questions ====================

    #[test]
    fn parses_valid_question_list() {
        let text = r#"{"questions": [
            {"id": "q1", "text": "Which stack?", "category": "stack"},
            {"id": "q2", "text": "Which database?", "category": "data"}
        ]}"#;
        let questions = parse_planned_questions(text);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id, "q1");
        assert_eq!(questions[1].category, "data");
    }

    #[test]
    fn skips_malformed_and_duplicate_questions() {
        let text = r#"{"questions": [
            {"id": "q1", "text": "Which stack?", "category": "stack"},
            {"id": "q1", "text": "duplicate id", "category": "stack"},
            {"id": "", "text": "empty id", "category": "data"},
            {"id": "q3", "text": "", "category": "data"},
            {"text": "missing id", "category": "data"},
            {"id": "q4", "text": "How deployed?", "category": "deployment"}
        ]}"#;
        let questions = parse_planned_questions(text);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id, "q1");
        assert_eq!(questions[0].text, "Which stack?");
        assert_eq!(questions[1].id, "q4");
    }

    #[test]
    fn unusable_planning_response_yields_empty() {
        assert!(parse_planned_questions("no json").is_empty());
        assert!(parse_planned_questions(r#"{"items": []}"#).is_empty());
        assert!(parse_planned_questions(r#"{"questions": "not an array"}"#).is_empty());
    }

    // ==================== parse_answer_mappings ====================

    #[test]
    fn parses_mapping_list() {
        let text = r#"{"mappings": [
            {"questionId": "q1", "answer": "Postgres", "confidence": 0.9}
        ]}"#;
        let mappings = parse_answer_mappings(text);
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].question_id, "q1");
        assert_eq!(mappings[0].answer, "Postgres");
        assert!(mappings[0].is_confident());
    }

    #[test]
    fn integer_confidence_is_accepted() {
        let text = r#"{"mappings": [{"questionId": "q1", "answer": "yes", "confidence": 1}]}"#;
        let mappings = parse_answer_mappings(text);
        assert_eq!(mappings.len(), 1);
        assert!(mappings[0].is_confident());
    }

    #[test]
    fn low_confidence_is_parsed_but_not_confident() {
        let text = r#"{"mappings": [{"questionId": "q1", "answer": "maybe", "confidence": 0.3}]}"#;
        let mappings = parse_answer_mappings(text);
        assert_eq!(mappings.len(), 1);
        assert!(!mappings[0].is_confident());
    }

    #[test]
    fn malformed_mapping_response_yields_empty() {
        assert!(parse_answer_mappings("nope").is_empty());
        assert!(parse_answer_mappings(r#"{"mappings": [{"questionId": "q1"}]}"#).is_empty());
    }

    // ==================== is_proceed_message ====================

    #[test]
    fn proceed_keywords_match_case_insensitively() {
        assert!(is_proceed_message("YES"));
        assert!(is_proceed_message("Proceed"));
        assert!(is_proceed_message("  go ahead  "));
        assert!(is_proceed_message("looks good, generate it"));
        assert!(is_proceed_message("I'm ready"));
    }

    #[test]
    fn non_proceed_messages_do_not_match() {
        assert!(!is_proceed_message("actually change the database to MySQL"));
        assert!(!is_proceed_message("wait"));
        assert!(!is_proceed_message(""));
    }
}
