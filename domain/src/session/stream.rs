//! Streaming events for a single interview turn.
//!
//! [`TurnEvent`] is the unit of output from a handler run to the transport
//! layer. Chunks arrive in order and the stream always ends with a single
//! [`Closed`](TurnEvent::Closed), including on error; errors are written
//! as ordinary chunks, never thrown past the stream boundary.

/// An event in the output stream of one interview turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// A text chunk appended to the response.
    Chunk(String),
    /// Terminal close signal; the run has finished.
    Closed,
}

impl TurnEvent {
    /// Returns the text content if this is a chunk.
    pub fn text(&self) -> Option<&str> {
        match self {
            TurnEvent::Chunk(s) => Some(s),
            TurnEvent::Closed => None,
        }
    }

    /// Returns true if this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnEvent::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_carries_text_and_is_not_terminal() {
        let event = TurnEvent::Chunk("hello".to_string());
        assert_eq!(event.text(), Some("hello"));
        assert!(!event.is_terminal());
    }

    #[test]
    fn closed_is_terminal_without_text() {
        assert!(TurnEvent::Closed.is_terminal());
        assert_eq!(TurnEvent::Closed.text(), None);
    }
}
