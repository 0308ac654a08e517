pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

/// Image bytes already encoded for transport.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    /// Standard-alphabet base64.
    pub data: String,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model request failed: {0}")]
    Request(String),

    #[error("Model returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode model response: {0}")]
    Decode(String),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Model is not configured: {0}")]
    NotConfigured(String),
}

/// A generative model that answers a text instruction about one image.
#[async_trait]
pub trait VisionModel: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, instruction: &str, image: &InlineImage) -> Result<String, ModelError>;
}
