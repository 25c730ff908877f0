use crate::domain::session::SessionDefaults;
use crate::domain::tts::{AudioEncoding, SsmlGender};
use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://texttospeech.googleapis.com/v1";
pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,
    pub tts_base_url: String,
    pub language_code: String,
    pub default_encoding: AudioEncoding,
    pub ssml_gender: Option<SsmlGender>,
    pub environment: Environment,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            tts_base_url: DEFAULT_BASE_URL.to_string(),
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            default_encoding: AudioEncoding::Linear16,
            ssml_gender: None,
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    /// The API key is optional; a missing key surfaces later as a
    /// provider 401/403.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());

        let ssml_gender = match non_empty("TTS_SSML_GENDER") {
            Some(value) => Some(value.parse::<SsmlGender>()?),
            None => None,
        };

        let config = Config {
            api_key: non_empty("GOOGLE_CLOUD_API_KEY"),
            tts_base_url: non_empty("TTS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            language_code: non_empty("TTS_LANGUAGE_CODE")
                .unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.to_string()),
            default_encoding: non_empty("TTS_AUDIO_ENCODING")
                .map(|v| AudioEncoding::parse_lenient(&v))
                .unwrap_or(AudioEncoding::Linear16),
            ssml_gender,
            environment: match non_empty("ENVIRONMENT").as_deref() {
                Some("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match non_empty("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.language_code.trim().is_empty() {
            return Err(AppError::Config(
                "language code must not be empty".to_string(),
            ));
        }
        if !self.tts_base_url.starts_with("http://") && !self.tts_base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "TTS_BASE_URL must be an http(s) URL, got {}",
                self.tts_base_url
            )));
        }
        Ok(())
    }

    pub fn session_defaults(&self) -> SessionDefaults {
        SessionDefaults {
            language_code: self.language_code.clone(),
            audio_encoding: self.default_encoding,
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
