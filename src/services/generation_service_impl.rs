//! `SeaORM` + [`VisionModel`] implementation of the `GenerationService` trait.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::{InlineImage, VisionModel};
use crate::config::HistoryConfig;
use crate::db::Store;
use crate::services::generation_service::{
    GenerationError, GenerationOutcome, GenerationRequest, GenerationService,
};
use crate::services::personalization::{
    build_instruction, personalization_context, summarize_interaction,
};

pub struct SeaOrmGenerationService {
    store: Store,
    model: Arc<dyn VisionModel>,
    history: HistoryConfig,
}

impl SeaOrmGenerationService {
    #[must_use]
    pub fn new(store: Store, model: Arc<dyn VisionModel>, history: HistoryConfig) -> Self {
        Self {
            store,
            model,
            history,
        }
    }
}

#[async_trait]
impl GenerationService for SeaOrmGenerationService {
    async fn generate(
        &self,
        user_id: &str,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        if request.image.is_empty() {
            return Err(GenerationError::MissingImage);
        }

        let image = InlineImage {
            mime_type: request.mime_type,
            data: general_purpose::STANDARD.encode(&request.image),
        };

        let preferences = match self
            .store
            .recent_preferences(user_id, self.history.context_entries)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!(user_id, error = %e, "History lookup failed, continuing without context");
                Vec::new()
            }
        };

        let instruction = build_instruction(&personalization_context(&preferences), &request.prompt);

        let text = self.model.generate(&instruction, &image).await?;

        let summary =
            summarize_interaction(&request.prompt, &text, self.history.summary_response_chars);

        let history_saved = match self.store.record_history(user_id, &summary).await {
            Ok(_) => true,
            Err(e) => {
                warn!(user_id, error = %e, "History save failed");
                false
            }
        };

        info!(
            user_id,
            model = self.model.name(),
            history_used = preferences.len(),
            history_saved,
            response_chars = text.chars().count(),
            "Generation completed"
        );

        Ok(GenerationOutcome {
            text,
            history_used: preferences.len(),
            history_saved,
        })
    }
}
