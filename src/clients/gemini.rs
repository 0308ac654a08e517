use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{InlineImage, ModelError, VisionModel};
use crate::config::GeminiConfig;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 2],
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent("Lightscape/1.0");

        if let Some(secs) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build Gemini HTTP client: {e}"))?;

        Ok(Self::with_shared_client(client, config))
    }

    #[must_use]
    pub fn with_shared_client(client: Client, config: &GeminiConfig) -> Self {
        if config.api_key.is_empty() {
            warn!("GEMINI_API_KEY is not set; generation requests will fail");
        }

        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }

    fn endpoint(&self) -> Result<Url, ModelError> {
        // Appended rather than joined so a proxy path prefix survives
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let mut url = Url::parse(&raw)
            .map_err(|e| ModelError::NotConfigured(format!("invalid endpoint {raw}: {e}")))?;

        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    fn redact(&self, text: &str) -> String {
        if self.api_key.is_empty() {
            return text.to_string();
        }
        text.replace(&self.api_key, "[redacted]")
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, instruction: &str, image: &InlineImage) -> Result<String, ModelError> {
        if self.api_key.is_empty() {
            return Err(ModelError::NotConfigured(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }

        let url = self.endpoint()?;
        let payload = GenerateRequest {
            contents: [Content {
                parts: [
                    RequestPart::Text { text: instruction },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: &image.mime_type,
                            data: &image.data,
                        },
                    },
                ],
            }],
        };

        debug!(
            model = %self.model,
            mime_type = %image.mime_type,
            image_len = image.data.len(),
            "Sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ModelError::Request(self.redact(&e.without_url().to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                message: self.redact(&error_message(&body)),
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Decode(self.redact(&e.without_url().to_string())))?;

        let text = extract_text(body);
        if text.is_empty() {
            return Err(ModelError::EmptyResponse);
        }

        Ok(text)
    }
}

/// The API's `error.message` when the body is the standard envelope.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| body.chars().take(500).collect())
}

/// Text of the first candidate, parts concatenated as-is.
fn extract_text(response: GenerateResponse) -> String {
    response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect()
}
