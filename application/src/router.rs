//! Session router: maps opaque session ids onto interview sessions.
//!
//! One router serves the whole process. Sessions are created lazily on
//! first submit and live until the process is torn down; there is no
//! explicit end-of-session operation.
//!
//! # Concurrency contract
//!
//! Turns for one session are serialized behind a per-session lock: a
//! second message arriving mid-run queues behind the first. Each run works
//! on an owned copy of the session and commits it when the run finishes,
//! so no other code holds a writable alias during a run, and
//! [`snapshot`](SessionRouter::snapshot) reads the committed state at any
//! time without blocking on an in-flight oracle call.

use crate::ports::oracle::TextOracle;
use crate::ports::turn_sink::{TurnSink, TurnStream};
use crate::use_cases::run_interview::InterviewEngine;
use blueprint_domain::Session;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

/// Output channel depth per turn.
const TURN_BUFFER: usize = 64;

struct SessionSlot {
    /// Serializes turns; held for the whole run.
    turn_lock: AsyncMutex<()>,
    /// Committed session state; locked only for copy-in/copy-out.
    state: Mutex<Session>,
}

impl SessionSlot {
    fn new(id: &str) -> Self {
        Self {
            turn_lock: AsyncMutex::new(()),
            state: Mutex::new(Session::new(id)),
        }
    }
}

/// Routes inbound messages to per-session interview runs.
pub struct SessionRouter {
    engine: InterviewEngine,
    sessions: Mutex<HashMap<String, Arc<SessionSlot>>>,
}

impl SessionRouter {
    pub fn new(oracle: Arc<dyn TextOracle>) -> Self {
        Self {
            engine: InterviewEngine::new(oracle),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, session_id: &str) -> Arc<SessionSlot> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session = session_id, "creating session");
                Arc::new(SessionSlot::new(session_id))
            })
            .clone()
    }

    /// Submit a message for a session and stream back the response.
    ///
    /// The returned stream yields ordered chunks and ends with a terminal
    /// close signal, including when the run fails internally.
    pub fn submit(&self, session_id: &str, message: &str) -> TurnStream {
        let slot = self.slot(session_id);
        let (sink, stream) = TurnSink::channel(TURN_BUFFER);
        let engine = self.engine.clone();
        let message = message.to_string();

        tokio::spawn(async move {
            let _turn = slot.turn_lock.lock().await;
            let mut session = slot.state.lock().unwrap().clone();
            engine.run_turn(&mut session, Some(&message), &sink).await;
            *slot.state.lock().unwrap() = session;
            sink.close().await;
        });

        stream
    }

    /// Point-in-time snapshot of a session's committed state.
    ///
    /// Never creates a session, never blocks on a running turn's oracle
    /// calls, never calls the oracle itself.
    pub fn snapshot(&self, session_id: &str) -> Option<Session> {
        let slot = self.sessions.lock().unwrap().get(session_id).cloned()?;
        let session = slot.state.lock().unwrap().clone();
        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::oracle::OracleError;
    use blueprint_domain::{Message, Phase};
    use std::collections::VecDeque;

    struct ScriptedOracle {
        responses: Mutex<VecDeque<Result<String, OracleError>>>,
    }

    impl ScriptedOracle {
        fn new(responses: Vec<Result<String, OracleError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
            })
        }
    }

    #[async_trait::async_trait]
    impl TextOracle for ScriptedOracle {
        async fn generate(&self, _messages: &[Message]) -> Result<String, OracleError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(OracleError::Other("script exhausted".to_string())))
        }
    }

    fn intent_json() -> String {
        r#"{"projectName": "Chat App", "scope": "Realtime", "goals": ["low latency"]}"#.to_string()
    }

    fn planning_json() -> String {
        let items: Vec<String> = (1..=8)
            .map(|i| {
                format!(r#"{{"id": "q{i}", "text": "Planned question {i}?", "category": "stack"}}"#)
            })
            .collect();
        format!(r#"{{"questions": [{}]}}"#, items.join(", "))
    }

    #[tokio::test]
    async fn submit_creates_session_and_streams_to_close() {
        let oracle = ScriptedOracle::new(vec![Ok(intent_json()), Ok(planning_json())]);
        let router = SessionRouter::new(oracle);

        let chunks = router
            .submit("s1", "I want a chat app")
            .collect_chunks()
            .await;

        assert_eq!(chunks.len(), 2);
        let snapshot = router.snapshot("s1").expect("session exists");
        assert_eq!(snapshot.phase(), Phase::Interview);
        assert_eq!(snapshot.questions().len(), 8);
    }

    #[tokio::test]
    async fn snapshot_never_creates_a_session() {
        let oracle = ScriptedOracle::new(vec![]);
        let router = SessionRouter::new(oracle);

        assert!(router.snapshot("missing").is_none());
        assert!(router.snapshot("missing").is_none());
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let oracle = ScriptedOracle::new(vec![
            Ok(intent_json()),
            Ok(planning_json()),
            Ok(intent_json()),
            Ok(planning_json()),
        ]);
        let router = SessionRouter::new(oracle);

        router.submit("a", "chat app").collect_chunks().await;
        router.submit("b", "billing system").collect_chunks().await;

        let a = router.snapshot("a").unwrap();
        let b = router.snapshot("b").unwrap();
        assert_eq!(a.id(), "a");
        assert_eq!(b.id(), "b");
        assert_eq!(a.phase(), Phase::Interview);
        assert_eq!(b.phase(), Phase::Interview);
    }

    #[tokio::test]
    async fn queued_turns_apply_in_sequence_without_lost_updates() {
        // First turn sets up the interview; the two follow-ups return no
        // mappings, so each falls back to the first unanswered question.
        let oracle = ScriptedOracle::new(vec![
            Ok(intent_json()),
            Ok(planning_json()),
            Ok(r#"{"mappings": []}"#.to_string()),
            Ok(r#"{"mappings": []}"#.to_string()),
        ]);
        let router = SessionRouter::new(oracle);

        router.submit("s1", "I want a chat app").collect_chunks().await;

        let first = router.submit("s1", "first answer");
        let second = router.submit("s1", "second answer");
        first.collect_chunks().await;
        second.collect_chunks().await;

        let snapshot = router.snapshot("s1").unwrap();
        assert_eq!(snapshot.answered_count(), 2);
        let answers: Vec<Option<&str>> =
            snapshot.questions()[..2].iter().map(|q| q.answer()).collect();
        assert!(answers.contains(&Some("first answer")));
        assert!(answers.contains(&Some("second answer")));
    }
}
