use super::error::SessionError;
use super::state::{FailureReason, RequestState, SessionDefaults, Selections};
use crate::domain::tts::{AudioEncoding, SynthesisRequest, SynthesisResult, Voice};
use crate::infrastructure::playback::{AudioPlayer, PlaybackOutcome, StopSignal};
use crate::infrastructure::repositories::{TtsRepository, VoiceCatalogRepository};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the session state machine and sequences the catalog, synthesis and
/// playback collaborators.
///
/// At most one synthesis and one playback are in flight: `submit` claims the
/// session with an atomic check-and-set on the state, and the state only
/// returns to a non-busy value once playback has ended.
pub struct SpeechSession {
    catalog: Arc<dyn VoiceCatalogRepository>,
    tts_repo: Arc<dyn TtsRepository>,
    player: Arc<dyn AudioPlayer>,
    state: Arc<watch::Sender<RequestState>>,
    last_outcome: Arc<watch::Sender<Option<PlaybackOutcome>>>,
    language_code: String,
    voices: Mutex<Vec<Voice>>,
    selections: Mutex<Selections>,
    active_playback: Arc<Mutex<Option<StopSignal>>>,
}

impl SpeechSession {
    pub fn new(
        catalog: Arc<dyn VoiceCatalogRepository>,
        tts_repo: Arc<dyn TtsRepository>,
        player: Arc<dyn AudioPlayer>,
        defaults: SessionDefaults,
    ) -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        let (last_outcome, _) = watch::channel(None);

        Self {
            catalog,
            tts_repo,
            player,
            state: Arc::new(state),
            last_outcome: Arc::new(last_outcome),
            language_code: defaults.language_code,
            voices: Mutex::new(Vec::new()),
            selections: Mutex::new(Selections {
                voice_name: None,
                audio_encoding: defaults.audio_encoding,
            }),
            active_playback: Arc::new(Mutex::new(None)),
        }
    }

    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    /// Follow state transitions
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    /// Follow playback endings. Holds the outcome of the most recent
    /// playback; a `Failed` value is a playback that broke after it started.
    pub fn subscribe_playback(&self) -> watch::Receiver<Option<PlaybackOutcome>> {
        self.last_outcome.subscribe()
    }

    pub fn last_playback_outcome(&self) -> Option<PlaybackOutcome> {
        self.last_outcome.borrow().clone()
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    pub fn voices(&self) -> Vec<Voice> {
        self.voices.lock().clone()
    }

    pub fn selections(&self) -> Selections {
        self.selections.lock().clone()
    }

    /// Fetch the voice catalog. Runs once per session; later calls return
    /// the already loaded voice count.
    pub async fn start(&self) -> Result<usize, SessionError> {
        let claimed = self.state.send_if_modified(|state| {
            if *state == RequestState::Idle {
                *state = RequestState::AwaitingVoices;
                true
            } else {
                false
            }
        });
        if !claimed {
            tracing::debug!("Voice catalog already requested for this session");
            return Ok(self.voices.lock().len());
        }

        match self.catalog.list_voices().await {
            Ok(voices) => {
                let count = voices.len();
                let default_voice = voices.first().map(|v| v.name.clone());
                *self.voices.lock() = voices;

                if let Some(name) = default_voice {
                    let mut selections = self.selections.lock();
                    if selections.voice_name.is_none() {
                        tracing::info!(voice = %name, "Default voice selected");
                        selections.voice_name = Some(name);
                    }
                }

                self.leave_awaiting_voices(RequestState::Ready);
                Ok(count)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load voices");
                self.leave_awaiting_voices(RequestState::Failed(FailureReason::VoicesUnavailable));
                Err(SessionError::VoicesUnavailable(e))
            }
        }
    }

    /// Select a voice from the loaded catalog
    pub fn select_voice(&self, name: &str) -> Result<(), SessionError> {
        let known = self.voices.lock().iter().any(|v| v.name == name);
        if !known {
            return Err(SessionError::Invalid(format!("Unknown voice: {}", name)));
        }
        self.selections.lock().voice_name = Some(name.to_string());
        tracing::debug!(voice = name, "Voice selected");
        Ok(())
    }

    /// Let the provider pick its default voice
    pub fn clear_voice(&self) {
        self.selections.lock().voice_name = None;
    }

    pub fn select_encoding(&self, encoding: AudioEncoding) {
        self.selections.lock().audio_encoding = encoding;
        tracing::debug!(encoding = %encoding, "Encoding selected");
    }

    /// Synthesize `text` with the current selections and start playing it.
    ///
    /// Returns once playback has started; the session goes back to `Ready`
    /// when playback ends. Blank text and submits while busy are rejected
    /// without contacting the provider.
    pub async fn submit(&self, text: &str) -> Result<(), SessionError> {
        let selections = self.selections();
        let request =
            SynthesisRequest::new(text, selections.voice_name, selections.audio_encoding)
                .map_err(|e| {
                    tracing::warn!(error = %e, "Rejected blank input");
                    SessionError::from(e)
                })?
                .with_language_code(self.language_code.clone());

        let claimed = self.state.send_if_modified(|state| {
            if state.accepts_submit() {
                *state = RequestState::Synthesizing;
                true
            } else {
                false
            }
        });
        if !claimed {
            tracing::warn!(state = %self.state(), "Submit ignored while busy");
            return Err(SessionError::Busy);
        }
        tracing::debug!("Session state -> synthesizing");
        let claim = SubmitClaim::new(&self.state);

        let audio = match self.tts_repo.synthesize(&request).await {
            Ok(audio) => audio,
            Err(e) => {
                tracing::error!(error = %e, "Failed to synthesize speech");
                self.set_state(RequestState::Failed(FailureReason::SynthesisError));
                claim.release();
                return Err(SessionError::Synthesis(e));
            }
        };

        let result = SynthesisResult::new(audio, request.audio_encoding());
        let handle = match self.player.play(result).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(error = %e, "Failed to start playback");
                self.set_state(RequestState::Ready);
                claim.release();
                return Err(SessionError::Playback(e));
            }
        };

        *self.active_playback.lock() = Some(handle.stop_signal());
        // Playing must be published before the watcher can reset to Ready.
        self.set_state(RequestState::Playing);

        let state = self.state.clone();
        let last_outcome = self.last_outcome.clone();
        let active_playback = self.active_playback.clone();
        tokio::spawn(async move {
            let outcome = handle.finished().await;
            match &outcome {
                PlaybackOutcome::Finished => tracing::info!("Playback finished"),
                PlaybackOutcome::Stopped => tracing::info!("Playback stopped"),
                PlaybackOutcome::Failed(reason) => {
                    tracing::error!(reason = %reason, "Playback failed")
                }
            }
            active_playback.lock().take();
            last_outcome.send_replace(Some(outcome));
            state.send_replace(RequestState::Ready);
            tracing::debug!("Session state -> ready");
        });
        claim.release();

        Ok(())
    }

    /// Acknowledge a failure notice, returning the session to `Ready`
    pub fn dismiss_failure(&self) {
        self.state.send_if_modified(|state| {
            if matches!(state, RequestState::Failed(_)) {
                *state = RequestState::Ready;
                true
            } else {
                false
            }
        });
    }

    /// Stop the active playback, if any. Returns whether one was running.
    pub fn stop(&self) -> bool {
        match self.active_playback.lock().as_ref() {
            Some(signal) => {
                signal.request_stop();
                tracing::info!("Stop requested for active playback");
                true
            }
            None => false,
        }
    }

    /// Wait until neither synthesis nor playback is in flight
    pub async fn wait_until_idle(&self) -> RequestState {
        let mut rx = self.subscribe();
        let settled = rx.wait_for(|state| !state.is_busy()).await;
        match settled {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    fn set_state(&self, next: RequestState) {
        tracing::debug!(state = %next, "Session state changed");
        self.state.send_replace(next);
    }

    /// Catalog results never clobber a submit that started meanwhile
    fn leave_awaiting_voices(&self, next: RequestState) {
        self.state.send_if_modified(|state| {
            if *state == RequestState::AwaitingVoices {
                *state = next;
                true
            } else {
                false
            }
        });
    }
}

/// Held while a submit owns the busy state. If the submit future is dropped
/// before playback is handed to the completion watcher, the session goes
/// back to `Ready`.
struct SubmitClaim<'a> {
    state: &'a watch::Sender<RequestState>,
    armed: bool,
}

impl<'a> SubmitClaim<'a> {
    fn new(state: &'a watch::Sender<RequestState>) -> Self {
        Self { state, armed: true }
    }

    fn release(mut self) {
        self.armed = false;
    }
}

impl Drop for SubmitClaim<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Submit cancelled before playback started");
            self.state.send_replace(RequestState::Ready);
        }
    }
}

impl Drop for SpeechSession {
    fn drop(&mut self) {
        self.stop();
    }
}
