//! Google Gemini `generateContent` client for text and image generation.
//!
//! Every call is wrapped in [`retry_with_backoff`]; transport failures and
//! 408/429/5xx responses are retried, everything else fails immediately.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use lp_core::retry::{retry_with_backoff, RetryPolicy};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ensure_success, ProviderError};

const SERVICE: &str = "Gemini";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Optional generation parameters for [`GeminiClient::generate_text`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextOptions {
    pub system_instruction: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

/// Result of a text generation call.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedText {
    pub text: String,
    pub model: String,
}

/// Decoded image bytes returned by the image model.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub model: String,
}

/// HTTP client for the Gemini REST API.
///
/// The API key is passed per call since it may be the user's own key or the
/// platform key.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    text_model: String,
    image_model: String,
    retry: RetryPolicy,
}

impl GeminiClient {
    pub fn new(text_model: Option<String>, image_model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: text_model.unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: image_model.unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            retry: RetryPolicy::default(),
        }
    }

    /// Point the client at a different host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    /// Generate text for `prompt` with the configured text model.
    pub async fn generate_text(
        &self,
        api_key: &str,
        prompt: &str,
        options: &TextOptions,
    ) -> Result<GeneratedText, ProviderError> {
        let body = text_request_body(prompt, options);
        let response = self
            .generate_content(api_key, &self.text_model, &body)
            .await?;
        let text = extract_text(&response)?;
        Ok(GeneratedText {
            text,
            model: self.text_model.clone(),
        })
    }

    /// Generate a single image for `prompt` with the configured image model.
    pub async fn generate_image(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> Result<GeneratedImage, ProviderError> {
        let body = image_request_body(prompt);
        let response = self
            .generate_content(api_key, &self.image_model, &body)
            .await?;
        let (bytes, mime_type) = extract_image(&response)?;
        Ok(GeneratedImage {
            bytes,
            mime_type,
            model: self.image_model.clone(),
        })
    }

    // ---- private helpers ----

    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        body: &Value,
    ) -> Result<Value, ProviderError> {
        let url = format!("{}/v1beta/models/{model}:generateContent", self.base_url);
        let url = url.as_str();

        retry_with_backoff(
            &self.retry,
            move |attempt| async move {
                tracing::debug!(model, attempt, "Calling Gemini generateContent");
                let response = self
                    .client
                    .post(url)
                    .header("x-goog-api-key", api_key)
                    .json(body)
                    .send()
                    .await?;
                let response = ensure_success(SERVICE, response).await?;
                Ok(response.json::<Value>().await?)
            },
            ProviderError::is_retryable,
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Request / response shaping
// ---------------------------------------------------------------------------

fn text_request_body(prompt: &str, options: &TextOptions) -> Value {
    let mut body = json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
    });

    let mut generation_config = serde_json::Map::new();
    if let Some(temperature) = options.temperature {
        generation_config.insert("temperature".into(), json!(temperature));
    }
    if let Some(max) = options.max_output_tokens {
        generation_config.insert("maxOutputTokens".into(), json!(max));
    }
    if !generation_config.is_empty() {
        body["generationConfig"] = Value::Object(generation_config);
    }
    let system = options.system_instruction.as_deref().unwrap_or_default();
    if !system.is_empty() {
        body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
    }
    body
}

fn image_request_body(prompt: &str) -> Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] },
    })
}

fn first_candidate_parts(response: &Value) -> Result<&Vec<Value>, ProviderError> {
    response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            let reason = response
                .pointer("/promptFeedback/blockReason")
                .and_then(Value::as_str)
                .map(|r| format!("prompt blocked ({r})"))
                .unwrap_or_else(|| "no candidates in response".to_string());
            invalid(reason)
        })
}

/// Concatenate every text part of the first candidate.
fn extract_text(response: &Value) -> Result<String, ProviderError> {
    let text: String = first_candidate_parts(response)?
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        return Err(invalid("response contained no text"));
    }
    Ok(text)
}

/// Decode the first inline image part of the first candidate.
fn extract_image(response: &Value) -> Result<(Vec<u8>, String), ProviderError> {
    let inline = first_candidate_parts(response)?
        .iter()
        .find_map(|part| part.get("inlineData"))
        .ok_or_else(|| invalid("response contained no image"))?;

    let data = inline
        .get("data")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("image part has no data"))?;
    let mime_type = inline
        .get("mimeType")
        .and_then(Value::as_str)
        .unwrap_or("image/png")
        .to_string();
    let bytes = BASE64
        .decode(data)
        .map_err(|e| invalid(format!("image data is not base64: {e}")))?;
    Ok((bytes, mime_type))
}

fn invalid(message: impl Into<String>) -> ProviderError {
    ProviderError::InvalidResponse {
        service: SERVICE,
        message: message.into(),
    }
}
