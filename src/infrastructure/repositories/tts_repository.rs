use crate::domain::tts::{SynthesisRequest, Voice};
use crate::error::AppResult;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider.
///
/// Implementations are responsible for:
/// - Mapping the request onto the provider's wire format
/// - Decoding the provider's audio payload into raw bytes
/// - Reporting HTTP and network failures as `AppError::Transport`
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize the request's text with its voice and encoding.
    ///
    /// Returns the raw audio bytes in the requested encoding.
    ///
    /// # Errors
    /// `Transport` on network or HTTP failure, `Protocol` if the response
    /// does not carry a decodable audio payload. Never retries.
    async fn synthesize(&self, request: &SynthesisRequest) -> AppResult<Vec<u8>>;
}

/// Repository for the provider's voice catalog
#[async_trait]
pub trait VoiceCatalogRepository: Send + Sync {
    /// List every voice the provider offers, in provider order
    async fn list_voices(&self) -> AppResult<Vec<Voice>>;
}
