use super::tts_repository::{TtsRepository, VoiceCatalogRepository};
use crate::domain::tts::{AudioEncoding, SsmlGender, SynthesisRequest, Voice};
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Config;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Google Cloud Text-to-Speech (`v1` REST) implementation of both the
/// synthesis and the voice catalog repositories.
pub struct GoogleTtsRepository {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    language_code: String,
    ssml_gender: Option<SsmlGender>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeBody<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelectionParams<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams<'a> {
    language_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssml_gender: Option<SsmlGender>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: AudioEncoding,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListVoicesResponse {
    #[serde(default)]
    voices: Vec<ProviderVoice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderVoice {
    name: String,
    #[serde(default)]
    ssml_gender: SsmlGender,
    #[serde(default)]
    language_codes: Vec<String>,
    natural_sample_rate_hertz: Option<u32>,
}

impl From<ProviderVoice> for Voice {
    fn from(voice: ProviderVoice) -> Self {
        Voice {
            name: voice.name,
            gender: voice.ssml_gender,
            language_code: voice.language_codes.into_iter().next().unwrap_or_default(),
            natural_sample_rate_hertz: voice.natural_sample_rate_hertz,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: Option<String>,
    status: Option<String>,
}

impl GoogleTtsRepository {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        language_code: impl Into<String>,
        ssml_gender: Option<SsmlGender>,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            language_code: language_code.into(),
            ssml_gender,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.tts_base_url.clone(),
            config.api_key.clone(),
            config.language_code.clone(),
            config.ssml_gender,
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn build_body<'a>(&'a self, request: &'a SynthesisRequest) -> SynthesizeBody<'a> {
        SynthesizeBody {
            input: SynthesisInput {
                text: request.text(),
            },
            voice: VoiceSelectionParams {
                language_code: request.language_code().unwrap_or(&self.language_code),
                name: request.voice_name(),
                ssml_gender: self.ssml_gender,
            },
            audio_config: AudioConfig {
                audio_encoding: request.audio_encoding(),
            },
        }
    }

    /// Attach the credential, send, and turn any failure into a transport error.
    /// Returns the raw response body on success.
    async fn send(&self, builder: reqwest::RequestBuilder, operation: &str) -> AppResult<String> {
        let builder = match &self.api_key {
            Some(key) => builder.query(&[("key", key.as_str())]),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, operation, "Speech provider request failed");
            AppError::transport(
                e.status().map(|s| s.as_u16()),
                format!("{} request failed: {}", operation, e),
            )
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::transport(
                Some(status.as_u16()),
                format!("Failed to read {} response: {}", operation, e),
            )
        })?;

        if !status.is_success() {
            let detail = provider_error_message(&body);
            tracing::error!(
                status = status.as_u16(),
                detail = %detail,
                operation,
                "Speech provider returned an error status"
            );
            return Err(AppError::transport(
                Some(status.as_u16()),
                format!("{} failed: {}", operation, detail),
            ));
        }

        Ok(body)
    }
}

/// Pull the human readable message out of a provider error body
fn provider_error_message(body: &str) -> String {
    match serde_json::from_str::<ProviderErrorBody>(body) {
        Ok(parsed) => match (parsed.error.status, parsed.error.message) {
            (Some(status), Some(message)) => format!("{}: {}", status, message),
            (None, Some(message)) => message,
            (Some(status), None) => status,
            (None, None) => "Unknown error".to_string(),
        },
        Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
        Err(_) => body.chars().take(200).collect(),
    }
}

fn parse_body<T: DeserializeOwned>(body: &str, operation: &str) -> AppResult<T> {
    serde_json::from_str(body)
        .map_err(|e| AppError::Protocol(format!("Failed to parse {} response: {}", operation, e)))
}

#[async_trait]
impl TtsRepository for GoogleTtsRepository {
    async fn synthesize(&self, request: &SynthesisRequest) -> AppResult<Vec<u8>> {
        let start_time = std::time::Instant::now();
        let text = request.text();
        let text_preview: String = text.chars().take(200).collect();

        tracing::info!(
            voice = request.voice_name().unwrap_or("<provider default>"),
            language = request.language_code().unwrap_or(&self.language_code),
            encoding = %request.audio_encoding(),
            text_length = text.len(),
            text_preview = %text_preview,
            "Calling Google TTS synthesize"
        );

        let body = self.build_body(request);
        let raw = self
            .send(
                self.http_client.post(self.endpoint("text:synthesize")).json(&body),
                "text:synthesize",
            )
            .await?;

        let response: SynthesizeResponse = parse_body(&raw, "text:synthesize")?;
        let audio_content = response.audio_content.ok_or_else(|| {
            AppError::Protocol("Synthesis response carries no audioContent".to_string())
        })?;

        let audio = BASE64.decode(audio_content.trim()).map_err(|e| {
            tracing::error!(error = %e, "audioContent is not valid base64");
            AppError::Protocol(format!("audioContent is not valid base64: {}", e))
        })?;

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "google",
            encoding = %request.audio_encoding(),
            latency_ms = duration.as_millis(),
            characters_count = text.len(),
            audio_size_bytes = audio.len(),
            "TTS synthesis completed"
        );

        Ok(audio)
    }
}

#[async_trait]
impl VoiceCatalogRepository for GoogleTtsRepository {
    async fn list_voices(&self) -> AppResult<Vec<Voice>> {
        tracing::info!("Fetching voice catalog");

        let raw = self
            .send(self.http_client.get(self.endpoint("voices")), "voices")
            .await?;
        let response: ListVoicesResponse = parse_body(&raw, "voices")?;

        let voices: Vec<Voice> = response.voices.into_iter().map(Voice::from).collect();
        tracing::info!(voice_count = voices.len(), "Voice catalog fetched");

        Ok(voices)
    }
}
