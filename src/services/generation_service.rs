//! Domain service for lighting-design generation.
//!
//! Orchestrates the personalization lookup, the model call and the
//! best-effort history write for one uploaded photo.

use thiserror::Error;

use crate::clients::ModelError;

/// Errors specific to generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No image")]
    MissingImage,

    #[error("{0}")]
    Model(#[from] ModelError),
}

/// An uploaded photo plus the user's request text.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub image: Vec<u8>,
    pub mime_type: String,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Full model text, unmodified.
    pub text: String,

    /// How many history records shaped the instruction.
    pub history_used: usize,

    /// Whether the summary row was written.
    pub history_saved: bool,
}

/// Domain service trait for generation.
#[async_trait::async_trait]
pub trait GenerationService: Send + Sync {
    /// Runs one generation for `user_id`.
    ///
    /// History failures never fail the call; only the model can.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::MissingImage`] for an empty image and
    /// [`GenerationError::Model`] when the model call fails.
    async fn generate(
        &self,
        user_id: &str,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError>;
}
