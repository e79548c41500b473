use crate::chat_session::ChatSession;
use crate::report_usecase::ReportAnalysisUseCase;
use crate::trend_usecase::TrendAnalysisUseCase;
use anyhow::{Result, anyhow};
use mediflow_core::analysis::AnalysisService;
use mediflow_core::config::ClientConfig;
use mediflow_core::storage::{PersistenceStore, SessionHistoryStore, SettingsStore};
use mediflow_infrastructure::{ConfigService, FilePersistenceStore, MediflowPaths};
use mediflow_interaction::HttpAnalysisClient;
use std::sync::Arc;

/// Shared services for one running client.
///
/// Every use case built from the engine reads and writes the same store and
/// talks to the same analysis service.
#[derive(Clone)]
pub struct MediflowEngine {
    config: ClientConfig,
    store: Arc<dyn PersistenceStore>,
    service: Arc<dyn AnalysisService>,
}

impl MediflowEngine {
    /// Loads configuration, opens the on-disk store and builds the HTTP client.
    pub fn bootstrap(paths: &MediflowPaths) -> Result<Self> {
        let config = ConfigService::new(paths)
            .and_then(|service| service.load())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

        let storage_dir = paths
            .storage_dir()
            .map_err(|e| anyhow!("Failed to resolve storage directory: {}", e))?;
        let store = FilePersistenceStore::new(&storage_dir)
            .map_err(|e| anyhow!("Failed to open storage at {:?}: {}", storage_dir, e))?;

        let client = HttpAnalysisClient::from_config(&config)
            .map_err(|e| anyhow!("Failed to build analysis client: {}", e))?;

        tracing::info!(
            "[Bootstrap] Storage at {:?}, analysis service at {}",
            storage_dir,
            client.base_url()
        );

        Ok(Self::new(config, Arc::new(store), Arc::new(client)))
    }

    /// Assembles an engine from already-built parts.
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn PersistenceStore>,
        service: Arc<dyn AnalysisService>,
    ) -> Self {
        Self {
            config,
            store,
            service,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn history(&self) -> SessionHistoryStore {
        SessionHistoryStore::new(self.store.clone())
    }

    pub fn settings(&self) -> SettingsStore {
        SettingsStore::new(self.store.clone())
    }

    pub fn chat_session(&self) -> ChatSession {
        ChatSession::new(
            self.service.clone(),
            self.history(),
            self.config.request_timeout(),
        )
    }

    pub fn trend_analysis(&self) -> TrendAnalysisUseCase {
        TrendAnalysisUseCase::new(self.service.clone(), self.config.request_timeout())
    }

    pub fn report_analysis(&self) -> ReportAnalysisUseCase {
        ReportAnalysisUseCase::new(self.service.clone(), self.config.request_timeout())
    }
}
