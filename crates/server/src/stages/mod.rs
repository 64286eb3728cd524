//! Pipeline stages and the channels between them.
//!
//! Stages are connected by unbounded, ordered channels carrying
//! [`StageMessage`]s. The end of a stream is an explicit
//! [`StageMessage::EndOfStream`] marker. [`StageOutput`] sends it when the
//! stage finishes, and again from `Drop` if the stage returned early or
//! panicked, so downstream stages always terminate.

pub mod analysis;
pub mod engagement;
pub mod sourcing;

pub use analysis::{AnalysisStage, Evidence, EvidenceSource, GitHubEvidence};
pub use engagement::EngagementStage;
pub use sourcing::{SearchSettings, SourcingStage};

use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum StageMessage<T> {
    Item(T),
    EndOfStream,
}

/// Create a connected output/input pair.
pub fn stage_channel<T>() -> (StageOutput<T>, StageInput<T>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        StageOutput {
            sender,
            finished: false,
        },
        StageInput { receiver },
    )
}

/// Sending half. Emits `EndOfStream` exactly once.
pub struct StageOutput<T> {
    sender: mpsc::UnboundedSender<StageMessage<T>>,
    finished: bool,
}

impl<T> StageOutput<T> {
    /// Forward an item. Returns `false` once the receiver is gone.
    pub fn send(&self, item: T) -> bool {
        self.sender.send(StageMessage::Item(item)).is_ok()
    }

    /// End the stream.
    pub fn finish(mut self) {
        self.end();
    }

    fn end(&mut self) {
        if !self.finished {
            self.finished = true;
            let _ = self.sender.send(StageMessage::EndOfStream);
        }
    }
}

impl<T> Drop for StageOutput<T> {
    fn drop(&mut self) {
        self.end();
    }
}

/// Receiving half.
pub struct StageInput<T> {
    receiver: mpsc::UnboundedReceiver<StageMessage<T>>,
}

impl<T> StageInput<T> {
    /// Next message. A closed channel reads as `EndOfStream`.
    pub async fn recv(&mut self) -> StageMessage<T> {
        self.receiver
            .recv()
            .await
            .unwrap_or(StageMessage::EndOfStream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_items_then_end_of_stream() {
        let (output, mut input) = stage_channel();
        assert!(output.send(1));
        assert!(output.send(2));
        output.finish();

        assert_eq!(input.recv().await, StageMessage::Item(1));
        assert_eq!(input.recv().await, StageMessage::Item(2));
        assert_eq!(input.recv().await, StageMessage::EndOfStream);
        // Still ended after the sender is gone.
        assert_eq!(input.recv().await, StageMessage::EndOfStream);
    }

    #[tokio::test]
    async fn test_end_of_stream_sent_once() {
        let (output, mut input) = stage_channel::<u32>();
        output.finish();

        assert_eq!(input.recv().await, StageMessage::EndOfStream);
        assert!(input.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_panicking_stage_still_ends_stream() {
        let (output, mut input) = stage_channel::<u32>();

        let handle = tokio::spawn(async move {
            output.send(7);
            panic!("stage crashed");
        });
        assert!(handle.await.is_err());

        assert_eq!(input.recv().await, StageMessage::Item(7));
        assert_eq!(input.recv().await, StageMessage::EndOfStream);
    }
}
