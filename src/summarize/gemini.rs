// src/summarize/gemini.rs
use crate::summarize::Oracle;
use crate::utils::error::OracleError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const TTS_VOICE: &str = "Kore";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// --- Wire types for models/{model}:generateContent ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<RequestContent<'a>>,
    contents: Vec<RequestContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_modalities: Vec<&'a str>,
    speech_config: SpeechConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig<'a> {
    voice_config: VoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig<'a> {
    prebuilt_voice_config: PrebuiltVoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig<'a> {
    voice_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

/// REST client for the Gemini generative language API.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, OracleError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Overrides the per-call timeout applied to every request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse, OracleError> {
        let url = self.endpoint(model);
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API returned {} for model {}: {}", status, model, body);
            return Err(OracleError::Api {
                status,
                message: body.chars().take(500).collect(),
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| OracleError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Oracle for GeminiClient {
    async fn generate_text(
        &self,
        model: &str,
        system_instruction: &str,
        prompt: &str,
    ) -> Result<String, OracleError> {
        let request = GenerateContentRequest {
            system_instruction: Some(RequestContent {
                role: None,
                parts: vec![RequestPart { text: system_instruction }],
            }),
            contents: vec![RequestContent {
                role: Some("user"),
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: None,
        };
        let response = self.generate(model, &request).await?;
        response_text(response)
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, OracleError> {
        let spoken = format!("Read this summary: {}", text);
        let request = GenerateContentRequest {
            system_instruction: None,
            contents: vec![RequestContent {
                role: Some("user"),
                parts: vec![RequestPart { text: &spoken }],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig { voice_name: TTS_VOICE },
                    },
                },
            }),
        };
        let response = self.generate(TTS_MODEL, &request).await?;
        response_audio(response)
    }
}

/// Concatenated text parts of the first candidate.
fn response_text(response: GenerateContentResponse) -> Result<String, OracleError> {
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();

    let text: String = parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() {
        return Err(OracleError::EmptyResponse);
    }
    Ok(text)
}

/// Decoded inline audio of the first candidate's first audio part.
fn response_audio(response: GenerateContentResponse) -> Result<Vec<u8>, OracleError> {
    let data = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().find_map(|p| p.inline_data))
        .ok_or(OracleError::EmptyResponse)?
        .data;

    let pcm = STANDARD
        .decode(data.as_bytes())
        .map_err(|e| OracleError::Parse(format!("Invalid base64 audio payload: {}", e)))?;
    if pcm.is_empty() {
        return Err(OracleError::EmptyResponse);
    }
    Ok(pcm)
}
