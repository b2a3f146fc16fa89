//! Interview session entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Stage of the interview dialogue protocol
///
/// Phases advance monotonically with two sanctioned loops:
/// Confirmation may repeat itself while the user keeps adding detail, and
/// Synthesis drops back to Confirmation when the user edits after the
/// document was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Extracting the project intent from the opening message
    Intent,
    /// Planning the question set (no user-facing turn of its own)
    QuestionPlanning,
    /// Walking the user through the unanswered questions
    Interview,
    /// All questions answered; waiting for go-ahead or corrections
    Confirmation,
    /// Document generated (or generation attempted)
    Synthesis,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Intent => "Intent",
            Phase::QuestionPlanning => "Question Planning",
            Phase::Interview => "Interview",
            Phase::Confirmation => "Confirmation",
            Phase::Synthesis => "Synthesis",
        };
        write!(f, "{}", name)
    }
}

/// Project intent extracted from the user's opening message (Value Object)
///
/// Set once during the Intent phase and immutable afterwards; document
/// edits never touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub project_name: String,
    pub scope: String,
    pub goals: Vec<String>,
}

impl Intent {
    pub fn new(
        project_name: impl Into<String>,
        scope: impl Into<String>,
        goals: Vec<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            scope: scope.into(),
            goals,
        }
    }

    /// Fallback intent used when the oracle output cannot be parsed.
    ///
    /// The raw user message becomes the single goal so nothing is lost.
    pub fn fallback(raw_message: impl Into<String>) -> Self {
        Self {
            project_name: "Unknown".to_string(),
            scope: "General".to_string(),
            goals: vec![raw_message.into()],
        }
    }
}

/// A single interview question (Entity)
///
/// Identity is the `id`, unique within a session. Only `answer` mutates
/// after planning; order within the session is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: String,
    text: String,
    category: String,
    answer: Option<String>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category: category.into(),
            answer: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }

    /// Record or overwrite the answer. Last write wins; answers never
    /// transition back to unanswered.
    pub fn set_answer(&mut self, answer: impl Into<String>) {
        self.answer = Some(answer.into());
    }
}

/// An interview session (Aggregate Root)
///
/// One per conversation. The active run holds exclusive mutable access;
/// the router hands out clones as read-only snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: String,
    phase: Phase,
    intent: Option<Intent>,
    questions: Vec<Question>,
    extra_notes: Vec<String>,
    final_doc: Option<String>,
    awaiting_confirmation: bool,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            phase: Phase::Intent,
            intent: None,
            questions: Vec::new(),
            extra_notes: Vec::new(),
            final_doc: None,
            awaiting_confirmation: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn intent(&self) -> Option<&Intent> {
        self.intent.as_ref()
    }

    /// The intent, or an error for phases that must not run without one.
    pub fn require_intent(&self) -> Result<&Intent, DomainError> {
        self.intent.as_ref().ok_or(DomainError::MissingIntent)
    }

    /// Set the intent. Intended to be called exactly once, during the
    /// Intent phase; later calls are ignored to keep the record immutable.
    pub fn set_intent(&mut self, intent: Intent) {
        if self.intent.is_none() {
            self.intent = Some(intent);
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Install the planned question set. Order is preserved as given and
    /// never changes afterwards.
    pub fn set_questions(&mut self, questions: Vec<Question>) {
        self.questions = questions;
    }

    /// Answer (or re-answer) the question with the given id.
    ///
    /// The session is untouched when no such question exists.
    pub fn answer_question(&mut self, id: &str, answer: impl Into<String>) -> Result<(), DomainError> {
        match self.questions.iter_mut().find(|q| q.id() == id) {
            Some(question) => {
                question.set_answer(answer);
                Ok(())
            }
            None => Err(DomainError::UnknownQuestion(id.to_string())),
        }
    }

    /// First question in planning order that has no answer yet.
    pub fn first_unanswered(&self) -> Option<&Question> {
        self.questions.iter().find(|q| !q.is_answered())
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }

    pub fn all_answered(&self) -> bool {
        !self.questions.is_empty() && self.questions.iter().all(|q| q.is_answered())
    }

    pub fn extra_notes(&self) -> &[String] {
        &self.extra_notes
    }

    pub fn add_extra_note(&mut self, note: impl Into<String>) {
        self.extra_notes.push(note.into());
    }

    pub fn final_doc(&self) -> Option<&str> {
        self.final_doc.as_deref()
    }

    /// Store the synthesized document. Re-runs overwrite the previous one.
    pub fn set_final_doc(&mut self, doc: impl Into<String>) {
        self.final_doc = Some(doc.into());
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.awaiting_confirmation
    }

    pub fn set_awaiting_confirmation(&mut self, awaiting: bool) {
        self.awaiting_confirmation = awaiting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_questions() -> Session {
        let mut session = Session::new("s1");
        session.set_questions(vec![
            Question::new("q1", "Which database?", "data"),
            Question::new("q2", "How many users?", "scalability"),
        ]);
        session
    }

    #[test]
    fn new_session_starts_in_intent_phase() {
        let session = Session::new("s1");
        assert_eq!(session.phase(), Phase::Intent);
        assert!(session.intent().is_none());
        assert!(session.questions().is_empty());
        assert!(session.final_doc().is_none());
        assert!(!session.awaiting_confirmation());
    }

    #[test]
    fn intent_is_set_once() {
        let mut session = Session::new("s1");
        session.set_intent(Intent::new("Chat App", "Realtime messaging", vec![]));
        session.set_intent(Intent::fallback("second attempt"));
        assert_eq!(session.intent().unwrap().project_name, "Chat App");
    }

    #[test]
    fn answer_question_by_id() {
        let mut session = session_with_questions();
        assert!(session.answer_question("q1", "Postgres").is_ok());
        assert_eq!(session.questions()[0].answer(), Some("Postgres"));
        assert_eq!(session.questions()[1].answer(), None);
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn answer_unknown_id_is_a_no_op() {
        let mut session = session_with_questions();
        let err = session.answer_question("nope", "text").unwrap_err();
        assert!(matches!(err, DomainError::UnknownQuestion(id) if id == "nope"));
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn answers_overwrite_but_never_clear() {
        let mut session = session_with_questions();
        session.answer_question("q1", "MySQL").unwrap();
        session.answer_question("q1", "Postgres").unwrap();
        assert_eq!(session.questions()[0].answer(), Some("Postgres"));
    }

    #[test]
    fn first_unanswered_follows_planning_order() {
        let mut session = session_with_questions();
        assert_eq!(session.first_unanswered().unwrap().id(), "q1");
        session.answer_question("q1", "Postgres").unwrap();
        assert_eq!(session.first_unanswered().unwrap().id(), "q2");
        session.answer_question("q2", "10k").unwrap();
        assert!(session.first_unanswered().is_none());
        assert!(session.all_answered());
    }

    #[test]
    fn require_intent_errors_until_set() {
        let mut session = Session::new("s1");
        assert!(matches!(
            session.require_intent(),
            Err(DomainError::MissingIntent)
        ));
        session.set_intent(Intent::new("Chat App", "Realtime", vec![]));
        assert_eq!(session.require_intent().unwrap().project_name, "Chat App");
    }

    #[test]
    fn all_answered_is_false_for_empty_question_set() {
        let session = Session::new("s1");
        assert!(!session.all_answered());
    }

    #[test]
    fn final_doc_overwrites_on_resynthesis() {
        let mut session = session_with_questions();
        session.set_final_doc("v1");
        session.set_final_doc("v2");
        assert_eq!(session.final_doc(), Some("v2"));
    }

    #[test]
    fn fallback_intent_keeps_raw_message_as_goal() {
        let intent = Intent::fallback("I want a chat app");
        assert_eq!(intent.project_name, "Unknown");
        assert_eq!(intent.scope, "General");
        assert_eq!(intent.goals, vec!["I want a chat app".to_string()]);
    }
}
