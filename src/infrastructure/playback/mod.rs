pub mod mulaw;
pub mod rodio_player;

pub use rodio_player::RodioAudioPlayer;

use crate::domain::tts::SynthesisResult;
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

/// How a playback ended
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackOutcome {
    Finished,
    Stopped,
    Failed(String),
}

/// Local audio output.
///
/// Implementations start playback as soon as the audio is loaded and release
/// every resource tied to it once playback ends, reporting the end through
/// the returned handle exactly once.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Load and start playing the audio.
    ///
    /// # Errors
    /// `AppError::Playback` if the payload cannot be decoded or no output
    /// device is available.
    async fn play(&self, audio: SynthesisResult) -> AppResult<PlaybackHandle>;
}

/// Shared flag asking a running playback to stop early
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Caller side of one playback
#[derive(Debug)]
pub struct PlaybackHandle {
    stop: StopSignal,
    outcome: oneshot::Receiver<PlaybackOutcome>,
}

/// Player side of one playback. Reports the outcome once, either through
/// `complete` or, if dropped first, from `Drop`.
#[derive(Debug)]
pub struct CompletionNotifier {
    stop: StopSignal,
    tx: Option<oneshot::Sender<PlaybackOutcome>>,
}

impl PlaybackHandle {
    /// Create a linked handle / notifier pair
    pub fn channel() -> (PlaybackHandle, CompletionNotifier) {
        let stop = StopSignal::default();
        let (tx, rx) = oneshot::channel();
        (
            PlaybackHandle {
                stop: stop.clone(),
                outcome: rx,
            },
            CompletionNotifier { stop, tx: Some(tx) },
        )
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Wait for playback to end
    pub async fn finished(self) -> PlaybackOutcome {
        self.outcome
            .await
            .unwrap_or_else(|_| PlaybackOutcome::Failed("player vanished".to_string()))
    }
}

impl CompletionNotifier {
    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_stop_requested()
    }

    pub fn complete(mut self, outcome: PlaybackOutcome) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(outcome);
        }
    }
}

impl Drop for CompletionNotifier {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let outcome = if self.stop.is_stop_requested() {
                PlaybackOutcome::Stopped
            } else {
                PlaybackOutcome::Failed("playback ended without reporting".to_string())
            };
            let _ = tx.send(outcome);
        }
    }
}
