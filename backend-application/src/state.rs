use std::sync::Arc;

use backend_domain::ports::{FileRepository, HealthCheckService, SheetCodec};
use backend_domain::services::AnomalyScorer;
use backend_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub file_repo: Arc<dyn FileRepository>,
    pub codec: Arc<dyn SheetCodec>,
    pub health_service: Arc<dyn HealthCheckService>,
    pub scorer: Arc<AnomalyScorer>,
    pub metrics: Arc<Metrics>,
}
