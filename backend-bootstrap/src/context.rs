use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use backend_application::{AppState, Metrics};
use backend_domain::services::AnomalyScorer;
use backend_domain::FileRepository;
use backend_infrastructure::{AppConfig, DefaultHealthService, LocalFileRepository, XlsxCodec};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();

        let file_repo = Arc::new(LocalFileRepository::from_config(&runtime_config));
        file_repo.ensure_dirs().await?;
        info!(
            "staging uploads in {}, outputs in {}",
            runtime_config.upload_dir, runtime_config.output_dir
        );

        let state = AppState {
            health_service: Arc::new(DefaultHealthService::new(&runtime_config)),
            config: runtime_config,
            file_repo,
            codec: Arc::new(XlsxCodec::new()),
            scorer: Arc::new(AnomalyScorer::new()),
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
