//! Wiring of configuration, storage and services for one CLI invocation.

use anyhow::{Context as _, Result};
use persona_application::{
    AppState, ChatService, DocumentService, SessionService, ShareService,
};
use persona_core::config::AppConfig;
use persona_infrastructure::paths::PersonaPaths;
use persona_infrastructure::{ConfigService, JsonDirStorageArea, SecretServiceImpl};
use persona_interaction::GeminiAnswerClient;
use std::path::Path;
use std::sync::Arc;

pub struct AppContext {
    pub config: AppConfig,
    pub state: Arc<AppState>,
    secrets: SecretServiceImpl,
}

impl AppContext {
    pub fn load(home: Option<&Path>) -> Result<Self> {
        let paths = PersonaPaths::new(home);
        let config = ConfigService::new(&paths)
            .context("Failed to resolve config directory")?
            .get_config();
        let secrets =
            SecretServiceImpl::new(&paths).context("Failed to resolve config directory")?;

        let store_dir = paths
            .store_dir(config.data_dir.as_deref())
            .context("Failed to resolve data directory")?;
        let area = JsonDirStorageArea::open(&store_dir)
            .with_context(|| format!("Failed to open store at {}", store_dir.display()))?;
        tracing::debug!(store = %store_dir.display(), "Using store");

        Ok(Self {
            config,
            state: Arc::new(AppState::open(Arc::new(area))),
            secrets,
        })
    }

    pub fn documents(&self) -> DocumentService {
        DocumentService::new(self.state.clone())
    }

    pub fn sessions(&self) -> SessionService {
        SessionService::new(self.state.clone())
    }

    pub fn share(&self) -> ShareService {
        ShareService::new(self.state.clone(), self.config.share_base_url.clone())
    }

    pub fn chat(&self) -> ChatService {
        let client = GeminiAnswerClient::from_secrets(&self.secrets, self.config.gemini.clone());
        ChatService::new(self.state.clone(), Arc::new(client))
    }
}
