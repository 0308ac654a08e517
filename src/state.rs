use std::sync::Arc;

use crate::clients::{GeminiClient, VisionModel};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, GenerationService, SeaOrmAuthService, SeaOrmGenerationService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub generation_service: Arc<dyn GenerationService>,

    pub auth_service: Arc<dyn AuthService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let model = Arc::new(GeminiClient::new(&config.gemini)?);
        Self::with_vision_model(config, model).await
    }

    /// Builds the state around a caller-provided model backend.
    pub async fn with_vision_model(
        config: Config,
        model: Arc<dyn VisionModel>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let generation_service = Arc::new(SeaOrmGenerationService::new(
            store.clone(),
            model,
            config.history.clone(),
        )) as Arc<dyn GenerationService + Send + Sync + 'static>;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(config),
            store,
            generation_service,
            auth_service,
        })
    }
}
