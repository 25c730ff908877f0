use crate::error::AppError;
use crate::infrastructure::playback::PlaybackOutcome;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("a request is already in progress")]
    Busy,
    #[error("voice catalog unavailable: {0}")]
    VoicesUnavailable(#[source] AppError),
    #[error("synthesis failed: {0}")]
    Synthesis(#[source] AppError),
    #[error("playback failed: {0}")]
    Playback(#[source] AppError),
}

impl From<AppError> for SessionError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(msg) => SessionError::Invalid(msg),
            AppError::Playback(_) => SessionError::Playback(err),
            _ => SessionError::Synthesis(err),
        }
    }
}

impl SessionError {
    /// The notice a finished playback should raise, if any
    pub fn from_playback_outcome(outcome: &PlaybackOutcome) -> Option<Self> {
        match outcome {
            PlaybackOutcome::Failed(reason) => {
                Some(SessionError::Playback(AppError::Playback(reason.clone())))
            }
            PlaybackOutcome::Finished | PlaybackOutcome::Stopped => None,
        }
    }

    /// Short heading for the notice shown to the user
    pub fn title(&self) -> &'static str {
        match self {
            SessionError::Invalid(_) => "Input Required",
            SessionError::Busy => "Busy",
            _ => "Error",
        }
    }

    /// Generic notice for the user. Error detail goes to the log only.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Invalid(msg) => msg.clone(),
            SessionError::Busy => "Please wait for the current speech to finish.".to_string(),
            SessionError::VoicesUnavailable(_) => "Failed to load voices.".to_string(),
            SessionError::Synthesis(_) => "Failed to synthesize speech.".to_string(),
            SessionError::Playback(_) => "Failed to play speech.".to_string(),
        }
    }
}
