use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;

/// SSML gender as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SsmlGender {
    Male,
    Female,
    Neutral,
    #[default]
    #[serde(rename = "SSML_VOICE_GENDER_UNSPECIFIED", alias = "UNSPECIFIED")]
    Unspecified,
}

impl SsmlGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            SsmlGender::Male => "MALE",
            SsmlGender::Female => "FEMALE",
            SsmlGender::Neutral => "NEUTRAL",
            SsmlGender::Unspecified => "SSML_VOICE_GENDER_UNSPECIFIED",
        }
    }
}

impl std::fmt::Display for SsmlGender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SsmlGender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MALE" => Ok(SsmlGender::Male),
            "FEMALE" => Ok(SsmlGender::Female),
            "NEUTRAL" => Ok(SsmlGender::Neutral),
            "UNSPECIFIED" | "SSML_VOICE_GENDER_UNSPECIFIED" => Ok(SsmlGender::Unspecified),
            other => Err(AppError::Config(format!("unknown SSML gender: {}", other))),
        }
    }
}

/// A provider voice. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub gender: SsmlGender,
    pub language_code: String,
    pub natural_sample_rate_hertz: Option<u32>,
}

impl Voice {
    /// Picker label, e.g. `en-US-Wavenet-D (MALE)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.gender)
    }
}
