use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use backend_domain::ports::HealthCheckService;
use backend_domain::RuntimeConfig;

pub struct DefaultHealthService {
    dirs: Vec<PathBuf>,
}

impl DefaultHealthService {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            dirs: vec![
                PathBuf::from(&config.upload_dir),
                PathBuf::from(&config.output_dir),
            ],
        }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    async fn check_storage(&self) -> anyhow::Result<bool> {
        for dir in &self.dirs {
            let metadata = fs::metadata(dir).await?;
            if !metadata.is_dir() || metadata.permissions().readonly() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
