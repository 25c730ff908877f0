use crate::domain::tts::AudioEncoding;

/// Why the session last failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    VoicesUnavailable,
    SynthesisError,
}

/// Session-scoped request state. There is no terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    AwaitingVoices,
    Ready,
    Synthesizing,
    Playing,
    Failed(FailureReason),
}

impl RequestState {
    /// A synthesis or a playback is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, RequestState::Synthesizing | RequestState::Playing)
    }

    pub fn accepts_submit(&self) -> bool {
        !self.is_busy()
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestState::Idle => write!(f, "idle"),
            RequestState::AwaitingVoices => write!(f, "loading voices"),
            RequestState::Ready => write!(f, "ready"),
            RequestState::Synthesizing => write!(f, "processing"),
            RequestState::Playing => write!(f, "playing"),
            RequestState::Failed(FailureReason::VoicesUnavailable) => {
                write!(f, "ready (voices unavailable)")
            }
            RequestState::Failed(FailureReason::SynthesisError) => {
                write!(f, "ready (last request failed)")
            }
        }
    }
}

/// Defaults a session starts from. Kept explicit so callers and tests can
/// override them.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDefaults {
    /// Locale sent with every synthesis request
    pub language_code: String,
    pub audio_encoding: AudioEncoding,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            language_code: "en-US".to_string(),
            audio_encoding: AudioEncoding::Linear16,
        }
    }
}

/// The user's current picks
#[derive(Debug, Clone, PartialEq)]
pub struct Selections {
    pub voice_name: Option<String>,
    pub audio_encoding: AudioEncoding,
}
