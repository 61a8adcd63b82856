//! Google Gemini `generateContent` backend.
//!
//! ```text
//! POST {base_url}/v1beta/models/{model}:generateContent
//! x-goog-api-key: <key>
//! ```
//!
//! The credential comes from the environment variable named in
//! [`GenerationConfig::api_key_env`], falling back to `API_KEY`.

use async_trait::async_trait;
use exportsmart_models::config::{GenerationConfig, FALLBACK_API_KEY_ENV};
use exportsmart_models::generation::GenerationRequest;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::GenerationError;
use crate::service::GenerationService;

pub struct GeminiService {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiService {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Build from configuration, reading the credential from the environment.
    ///
    /// Fails with [`GenerationError::MissingCredential`] before any network activity.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let api_key = resolve_api_key(&config.api_key_env, |var| std::env::var(var).ok())?;
        Ok(Self::new(&config.base_url, &config.model, &api_key))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl GenerationService for GeminiService {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>, GenerationError> {
        debug!(model = %self.model, prompt_len = request.prompt.len(), "Calling Gemini generateContent");

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Gemini request failed");
            return Err(GenerationError::Transport(format!(
                "Gemini API error {status}: {body}"
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            warn!(block_reason = %reason, "Gemini blocked the prompt");
        }

        Ok(extract_text(&parsed))
    }
}

/// Look up the API key in `primary`, then in `API_KEY`. Blank values count as missing.
pub fn resolve_api_key(
    primary: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, GenerationError> {
    [primary, FALLBACK_API_KEY_ENV]
        .into_iter()
        .filter_map(|var| lookup(var))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(|| GenerationError::MissingCredential(primary.to_string()))
}

/// JSON body for `generateContent`, constrained to a JSON response with the given schema.
pub fn build_request_body(request: &GenerationRequest) -> serde_json::Value {
    serde_json::json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt }],
        }],
        "systemInstruction": {
            "parts": [{ "text": request.system_instruction }],
        },
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.response_schema,
            "temperature": request.temperature,
        },
    })
}

/// Concatenated text of the first candidate. `None` when there is no candidate or only blank text.
pub fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}
