use serde::{Deserialize, Serialize};

/// Audio encodings the provider can return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioEncoding {
    #[serde(rename = "LINEAR16")]
    Linear16,
    #[serde(rename = "MULAW")]
    Mulaw,
    #[serde(rename = "MP3")]
    Mp3,
}

impl AudioEncoding {
    pub const ALL: [AudioEncoding; 3] = [
        AudioEncoding::Linear16,
        AudioEncoding::Mulaw,
        AudioEncoding::Mp3,
    ];

    /// Provider enum value
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioEncoding::Linear16 => "LINEAR16",
            AudioEncoding::Mulaw => "MULAW",
            AudioEncoding::Mp3 => "MP3",
        }
    }

    /// Parse a user or config supplied value.
    /// Anything unrecognized falls back to MP3.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "LINEAR16" | "WAV" => AudioEncoding::Linear16,
            "MULAW" => AudioEncoding::Mulaw,
            _ => AudioEncoding::Mp3,
        }
    }

    /// MIME type of the payload returned for this encoding
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioEncoding::Linear16 => "audio/wav",
            AudioEncoding::Mulaw => "audio/mulaw",
            AudioEncoding::Mp3 => "audio/mp3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AudioEncoding::Linear16 => "LINEAR16 (WAV)",
            AudioEncoding::Mulaw => "MULAW",
            AudioEncoding::Mp3 => "MP3",
        }
    }
}

impl std::fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
