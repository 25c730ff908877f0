/// Main application error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Transport error{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Unexpected provider response: {0}")]
    Protocol(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// True when the provider rejected the credential
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                status: Some(401) | Some(403),
                ..
            }
        )
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
