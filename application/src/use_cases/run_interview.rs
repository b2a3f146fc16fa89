//! The Interview State Machine.
//!
//! [`InterviewEngine`] executes exactly one turn to completion per inbound
//! message. A turn dispatches on the session's current phase to one
//! handler; handlers either yield back to the transport or ask the
//! dispatcher to continue with the null sentinel (no user input), which is
//! how the Intent -> Planning -> first-question chain and the
//! Confirmation/Synthesis loops are expressed without nested handler
//! calls.
//!
//! ```text
//! Intent --> QuestionPlanning --> Interview --> Confirmation <--> Synthesis
//!                                                   ^  |
//!                                                   +--+  (corrections)
//! ```
//!
//! All oracle failures are absorbed here: malformed output falls back to
//! safe defaults, transport failures fall back where a default exists and
//! surface as a single apology line where none does (synthesis). Nothing
//! escapes a turn as an error.

use crate::ports::oracle::TextOracle;
use crate::ports::turn_sink::TurnSink;
use blueprint_domain::{
    builtin_catalog, is_proceed_message, parse_answer_mappings, parse_intent,
    parse_planned_questions, InterviewPromptTemplate, Message, Phase, Question, Session,
    MIN_QUESTIONS, PROCEED_KEYWORDS,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Apology emitted when the synthesis call fails. The phase stays at
/// Synthesis; a follow-up message re-enters the confirmation loop.
pub const SYNTHESIS_APOLOGY: &str = "Sorry - I couldn't generate the document just now. \
Your answers are safe; send another message to review them and ask me to generate again.";

/// Error emitted when planning is reached without an intent.
pub const MISSING_INTENT_ERROR: &str =
    "I don't have a project intent yet. Please describe your project first.";

/// What the dispatcher should do after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Re-dispatch on the (possibly updated) phase with the null sentinel.
    Continue,
    /// The turn is complete; hand the stream back to the transport.
    Yield,
}

/// The fixed confirmation prompt, listing the recognized proceed phrases.
fn confirmation_prompt() -> String {
    format!(
        "All questions are answered. Reply with anything you want to add or correct, \
or say one of: {} - and I'll write the design document.",
        PROCEED_KEYWORDS.join(", ")
    )
}

/// Phase-driven interview engine.
///
/// Holds the oracle port; all session state is passed in per turn, so one
/// engine serves every session.
#[derive(Clone)]
pub struct InterviewEngine {
    oracle: Arc<dyn TextOracle>,
}

impl InterviewEngine {
    pub fn new(oracle: Arc<dyn TextOracle>) -> Self {
        Self { oracle }
    }

    /// Execute one turn to completion.
    ///
    /// `message` is the inbound user text, or `None` for "no user input,
    /// proceed automatically". Output chunks are appended to `sink`; the
    /// caller owns the terminal close signal.
    pub async fn run_turn(&self, session: &mut Session, message: Option<&str>, sink: &TurnSink) {
        let mut input = message;
        loop {
            let phase = session.phase();
            debug!(session = %session.id(), %phase, has_input = input.is_some(), "dispatching turn");
            let flow = match phase {
                Phase::Intent => self.handle_intent(session, input, sink).await,
                Phase::QuestionPlanning => self.handle_planning(session, sink).await,
                Phase::Interview => self.handle_interview(session, input, sink).await,
                Phase::Confirmation => self.handle_confirmation(session, input, sink).await,
                Phase::Synthesis => self.handle_synthesis(session, input, sink).await,
            };
            match flow {
                Flow::Continue => input = None,
                Flow::Yield => break,
            }
        }
    }

    /// Intent phase: extract the structured project intent from the
    /// opening message, then chain into planning.
    async fn handle_intent(
        &self,
        session: &mut Session,
        input: Option<&str>,
        sink: &TurnSink,
    ) -> Flow {
        let Some(text) = input else {
            sink.emit("Tell me about the project you'd like to design.")
                .await;
            return Flow::Yield;
        };

        let messages = [
            Message::system(InterviewPromptTemplate::intent_system()),
            Message::user(InterviewPromptTemplate::intent_prompt(text)),
        ];
        let intent = match self.oracle.generate(&messages).await {
            Ok(raw) => parse_intent(&raw, text),
            Err(error) => {
                warn!(%error, "intent extraction call failed; using fallback intent");
                blueprint_domain::Intent::fallback(text)
            }
        };

        info!(project = %intent.project_name, "intent captured");
        sink.emit(format!(
            "Here's what I understood:\n  Project: {}\n  Scope: {}\n  Goals: {}\nLet me line up the right questions.",
            intent.project_name,
            intent.scope,
            intent.goals.join("; ")
        ))
        .await;

        session.set_intent(intent);
        session.set_phase(Phase::QuestionPlanning);
        Flow::Continue
    }

    /// Planning phase: ask the oracle for the question set and repair it
    /// from the built-in catalog until at least [`MIN_QUESTIONS`] remain.
    async fn handle_planning(&self, session: &mut Session, sink: &TurnSink) -> Flow {
        let intent = match session.require_intent() {
            Ok(intent) => intent.clone(),
            Err(error) => {
                warn!(%error, "planning dispatched on an incomplete session");
                sink.emit(MISSING_INTENT_ERROR).await;
                return Flow::Yield;
            }
        };

        let messages = [
            Message::system(InterviewPromptTemplate::planning_system()),
            Message::user(InterviewPromptTemplate::planning_prompt(&intent)),
        ];
        let planned = match self.oracle.generate(&messages).await {
            Ok(raw) => parse_planned_questions(&raw),
            Err(error) => {
                warn!(%error, "question planning call failed; using built-in catalog");
                Vec::new()
            }
        };

        let mut questions: Vec<Question> = planned
            .into_iter()
            .map(|p| Question::new(p.id, p.text, p.category))
            .collect();
        for item in builtin_catalog() {
            if questions.len() >= MIN_QUESTIONS {
                break;
            }
            if questions.iter().any(|q| q.id() == item.id()) {
                continue;
            }
            questions.push(item);
        }

        info!(count = questions.len(), "question set planned");
        session.set_questions(questions);
        session.set_phase(Phase::Interview);
        Flow::Continue
    }

    /// Interview phase: map inbound answers, then emit the next unanswered
    /// question or advance to confirmation.
    async fn handle_interview(
        &self,
        session: &mut Session,
        input: Option<&str>,
        sink: &TurnSink,
    ) -> Flow {
        if let Some(text) = input {
            self.map_answers(session, text).await;
            return Flow::Continue;
        }

        match session.first_unanswered() {
            Some(question) => {
                sink.emit(format!("[{}] {}", question.category(), question.text()))
                    .await;
                Flow::Yield
            }
            None => {
                session.set_phase(Phase::Confirmation);
                Flow::Continue
            }
        }
    }

    /// Confirmation phase. Entry (null input) re-arms the confirmation
    /// prompt; a turn either proceeds to synthesis or treats the message
    /// as corrective input and loops.
    async fn handle_confirmation(
        &self,
        session: &mut Session,
        input: Option<&str>,
        sink: &TurnSink,
    ) -> Flow {
        let Some(text) = input else {
            session.set_awaiting_confirmation(true);
            sink.emit(confirmation_prompt()).await;
            return Flow::Yield;
        };

        if is_proceed_message(text) {
            session.set_awaiting_confirmation(false);
            session.set_phase(Phase::Synthesis);
            Flow::Continue
        } else {
            self.map_answers(session, text).await;
            Flow::Continue
        }
    }

    /// Synthesis phase. Entry (null input) runs the synthesizer once; a
    /// message after generation is an edit and re-enters confirmation.
    async fn handle_synthesis(
        &self,
        session: &mut Session,
        input: Option<&str>,
        sink: &TurnSink,
    ) -> Flow {
        if let Some(text) = input {
            sink.emit("Noted - I'll fold that into the decisions. Let's re-confirm before regenerating.")
                .await;
            self.map_answers(session, text).await;
            session.set_phase(Phase::Confirmation);
            return Flow::Continue;
        }

        let intent = match session.require_intent() {
            Ok(intent) => intent.clone(),
            Err(error) => {
                warn!(%error, "synthesis dispatched on an incomplete session");
                sink.emit(SYNTHESIS_APOLOGY).await;
                return Flow::Yield;
            }
        };

        let prompt = InterviewPromptTemplate::synthesis_prompt(
            &intent,
            session.questions(),
            session.extra_notes(),
        );
        let messages = [
            Message::system(InterviewPromptTemplate::synthesis_system()),
            Message::user(prompt),
        ];
        match self.oracle.generate(&messages).await {
            Ok(doc) => {
                info!(chars = doc.len(), "document synthesized");
                session.set_final_doc(doc.clone());
                sink.emit(doc).await;
            }
            Err(error) => {
                // Absorbing state: no retry, no phase rollback.
                warn!(%error, "synthesis call failed");
                sink.emit(SYNTHESIS_APOLOGY).await;
            }
        }
        Flow::Yield
    }

    /// Reconcile one free-form message against the candidate question set.
    ///
    /// Candidates are the unanswered questions during Interview and the
    /// entire set otherwise (corrections allowed). Returns the number of
    /// answers applied. Questions the mapping does not mention are never
    /// touched.
    async fn map_answers(&self, session: &mut Session, message: &str) -> usize {
        let in_interview = session.phase() == Phase::Interview;
        let prompt = {
            let candidates: Vec<&Question> = if in_interview {
                session
                    .questions()
                    .iter()
                    .filter(|q| !q.is_answered())
                    .collect()
            } else {
                session.questions().iter().collect()
            };
            InterviewPromptTemplate::mapping_prompt(&candidates, message)
        };

        let messages = [
            Message::system(InterviewPromptTemplate::mapping_system()),
            Message::user(prompt),
        ];
        let mappings = match self.oracle.generate(&messages).await {
            Ok(raw) => parse_answer_mappings(&raw),
            Err(error) => {
                warn!(%error, "answer mapping call failed; assigning to first unanswered");
                return self.assign_to_first_unanswered(session, message);
            }
        };

        let mut applied = 0;
        for mapping in mappings.iter().filter(|m| m.is_confident()) {
            match session.answer_question(&mapping.question_id, &mapping.answer) {
                Ok(()) => applied += 1,
                Err(error) => debug!(%error, "mapping ignored"),
            }
        }

        if applied == 0 {
            if in_interview {
                // Known precision gap, kept for compatibility: an unmapped
                // message is attributed wholesale to the first unanswered
                // question so the interview always moves forward.
                applied = self.assign_to_first_unanswered(session, message);
            } else {
                debug!("message mapped to no question; keeping it as an extra note");
                session.add_extra_note(message);
            }
        }
        applied
    }

    fn assign_to_first_unanswered(&self, session: &mut Session, message: &str) -> usize {
        let Some(id) = session.first_unanswered().map(|q| q.id().to_string()) else {
            return 0;
        };
        match session.answer_question(&id, message) {
            Ok(()) => 1,
            Err(_) => 0,
        }
    }
}
