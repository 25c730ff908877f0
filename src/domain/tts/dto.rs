use super::encoding::AudioEncoding;
use crate::error::{AppError, AppResult};

/// A validated synthesis request. Text is never blank.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    text: String,
    language_code: Option<String>,
    voice_name: Option<String>,
    audio_encoding: AudioEncoding,
}

impl SynthesisRequest {
    pub fn new(
        text: impl Into<String>,
        voice_name: Option<String>,
        audio_encoding: AudioEncoding,
    ) -> AppResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AppError::Validation(
                "Please enter some text to convert to speech.".to_string(),
            ));
        }

        Ok(Self {
            text,
            language_code: None,
            voice_name: voice_name.filter(|name| !name.trim().is_empty()),
            audio_encoding,
        })
    }

    /// Request a specific locale instead of the client's default
    pub fn with_language_code(mut self, language_code: impl Into<String>) -> Self {
        let language_code = language_code.into();
        self.language_code = Some(language_code).filter(|code| !code.trim().is_empty());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language_code(&self) -> Option<&str> {
        self.language_code.as_deref()
    }

    pub fn voice_name(&self) -> Option<&str> {
        self.voice_name.as_deref()
    }

    pub fn audio_encoding(&self) -> AudioEncoding {
        self.audio_encoding
    }
}

/// Decoded audio returned by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    pub audio: Vec<u8>,
    pub encoding: AudioEncoding,
}

impl SynthesisResult {
    pub fn new(audio: Vec<u8>, encoding: AudioEncoding) -> Self {
        Self { audio, encoding }
    }

    pub fn mime_type(&self) -> &'static str {
        self.encoding.mime_type()
    }
}
