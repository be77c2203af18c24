//! Display change notifications
//!
//! Observers are registered explicitly on an engine and called synchronously,
//! under the engine lock, each time the displayed text changes.

use serde::Serialize;
use tokio::sync::mpsc;

use super::types::GlitchPhase;

/// Unique identifier for an engine instance
pub type EngineId = String;

/// Handle returned by `GlitchEngine::observe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

/// Emitted whenever an engine's displayed text changes
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DisplayChange {
    pub engine_id: EngineId,
    pub text: String,
    pub phase: GlitchPhase,
}

/// Receives display changes. Must not block.
pub trait DisplayObserver: Send + Sync {
    fn on_display_change(&self, change: &DisplayChange);
}

impl<F> DisplayObserver for F
where
    F: Fn(&DisplayChange) + Send + Sync,
{
    fn on_display_change(&self, change: &DisplayChange) {
        self(change)
    }
}

/// Forwards changes into an unbounded channel
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<DisplayChange>,
}

impl ChannelObserver {
    pub fn new(sender: mpsc::UnboundedSender<DisplayChange>) -> Self {
        Self { sender }
    }

    /// Create an observer together with the receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DisplayChange>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl DisplayObserver for ChannelObserver {
    fn on_display_change(&self, change: &DisplayChange) {
        if self.sender.send(change.clone()).is_err() {
            tracing::trace!(engine_id = %change.engine_id, "Display change receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn change(text: &str) -> DisplayChange {
        DisplayChange {
            engine_id: "engine-1".to_string(),
            text: text.to_string(),
            phase: GlitchPhase::Corrupted,
        }
    }

    #[test]
    fn test_closure_observer() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let observer = move |_: &DisplayChange| {
            counter.fetch_add(1, Ordering::SeqCst);
        };

        observer.on_display_change(&change("A"));
        observer.on_display_change(&change("B"));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_channel_observer_forwards() {
        let (observer, mut rx) = ChannelObserver::channel();
        observer.on_display_change(&change("AGEZT-TOGA"));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.text, "AGEZT-TOGA");
        assert_eq!(received.phase, GlitchPhase::Corrupted);
    }

    #[test]
    fn test_channel_observer_survives_dropped_receiver() {
        let (observer, rx) = ChannelObserver::channel();
        drop(rx);
        observer.on_display_change(&change("X"));
    }

    #[test]
    fn test_change_serializes() {
        let json = serde_json::to_value(change("LIVE_FEED")).unwrap();
        assert_eq!(json["phase"], "corrupted");
        assert_eq!(json["text"], "LIVE_FEED");
    }
}
