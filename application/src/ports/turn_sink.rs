//! Turn output stream plumbing.
//!
//! [`TurnSink`] is the handler-side writer: an append-only sequence of
//! [`TurnEvent::Chunk`]s followed by exactly one [`TurnEvent::Closed`].
//! [`TurnStream`] is the transport-side reader. Write failures (receiver
//! dropped) are logged and swallowed; a run always proceeds to its close
//! signal, and errors are emitted as chunks rather than thrown across the
//! stream boundary.

use blueprint_domain::TurnEvent;
use tokio::sync::mpsc;
use tracing::warn;

/// Handler-side writer for one turn's output stream.
pub struct TurnSink {
    tx: mpsc::Sender<TurnEvent>,
}

impl TurnSink {
    pub fn new(tx: mpsc::Sender<TurnEvent>) -> Self {
        Self { tx }
    }

    /// Create a connected sink/stream pair.
    pub fn channel(buffer: usize) -> (TurnSink, TurnStream) {
        let (tx, rx) = mpsc::channel(buffer);
        (TurnSink::new(tx), TurnStream::new(rx))
    }

    /// Append a text chunk to the stream.
    pub async fn emit(&self, text: impl Into<String>) {
        if self.tx.send(TurnEvent::Chunk(text.into())).await.is_err() {
            warn!("turn stream receiver dropped; chunk discarded");
        }
    }

    /// Send the terminal close signal.
    pub async fn close(&self) {
        if self.tx.send(TurnEvent::Closed).await.is_err() {
            warn!("turn stream receiver dropped before close");
        }
    }
}

/// Transport-side reader for one turn's output stream.
pub struct TurnStream {
    receiver: mpsc::Receiver<TurnEvent>,
}

impl TurnStream {
    pub fn new(receiver: mpsc::Receiver<TurnEvent>) -> Self {
        Self { receiver }
    }

    /// Receive the next event, or `None` once the channel is closed.
    pub async fn next_event(&mut self) -> Option<TurnEvent> {
        self.receiver.recv().await
    }

    /// Collect every chunk until the close signal (or channel end).
    pub async fn collect_chunks(mut self) -> Vec<String> {
        let mut chunks = Vec::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                TurnEvent::Chunk(text) => chunks.push(text),
                TurnEvent::Closed => break,
            }
        }
        chunks
    }

    /// Collect the whole turn as one newline-joined string.
    pub async fn collect_text(self) -> String {
        self.collect_chunks().await.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn chunks_arrive_in_order_and_stop_at_close() {
        let (sink, stream) = TurnSink::channel(8);
        sink.emit("first").await;
        sink.emit("second").await;
        sink.close().await;
        assert_eq!(stream.collect_chunks().await, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn emit_after_receiver_drop_does_not_panic() {
        let (sink, stream) = TurnSink::channel(8);
        drop(stream);
        sink.emit("into the void").await;
        sink.close().await;
    }

    #[tokio::test]
    async fn collect_text_joins_chunks() {
        let (sink, stream) = TurnSink::channel(8);
        sink.emit("a").await;
        sink.emit("b").await;
        sink.close().await;
        assert_eq!(stream.collect_text().await, "a\nb");
    }
}
