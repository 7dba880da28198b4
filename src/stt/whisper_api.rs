//! `WhisperApiGateway` — OpenAI-compatible `/v1/audio/transcriptions` client.
//!
//! Works with OpenAI, Groq, faster-whisper-server, LocalAI and any other
//! provider that accepts the OpenAI multipart transcription request.
//! All connection details come from [`SttConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::audio::StagedClip;
use crate::config::SttConfig;
use crate::stt::gateway::{Transcript, TranscriptionError, TranscriptionGateway};

/// Response body of a `response_format=json` transcription.
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Sends staged clips to an OpenAI-compatible transcription endpoint.
///
/// The `Authorization: Bearer …` header is attached **only** when
/// `config.api_key` is a non-empty string, so local servers without
/// authentication work unchanged.
pub struct WhisperApiGateway {
    client: reqwest::Client,
    config: SttConfig,
}

impl WhisperApiGateway {
    /// Build a gateway from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.  A default client is used as a last-resort
    /// fallback if the builder fails.
    pub fn from_config(config: &SttConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TranscriptionGateway for WhisperApiGateway {
    async fn transcribe(
        &self,
        clip: &StagedClip,
        language: &str,
    ) -> Result<Transcript, TranscriptionError> {
        let bytes = clip
            .read()
            .await
            .map_err(|e| TranscriptionError::Clip(e.to_string()))?;

        let file = Part::bytes(bytes).file_name(clip.file_name());
        let mut form = Form::new()
            .part("file", file)
            .text("model", self.config.model.clone())
            .text("response_format", "json");
        if !language.is_empty() {
            form = form.text("language", language.to_string());
        }

        let mut req = self.client.post(self.endpoint()).multipart(form);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Parse(e.to_string()))?;

        Ok(Transcript::new(parsed.text))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
