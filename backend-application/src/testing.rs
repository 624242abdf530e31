// In-memory ports for application tests

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use backend_domain::ports::{FileRepository, HealthCheckService, SheetCodec};
use backend_domain::services::AnomalyScorer;
use backend_domain::{CellValue, RuntimeConfig, SafeFileName, Sheet};

use crate::{AppState, Metrics};

#[derive(Default)]
pub struct MemoryFiles {
    uploads: Mutex<HashMap<String, Vec<u8>>>,
    outputs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryFiles {
    pub fn upload(&self, name: &str) -> Option<Vec<u8>> {
        self.uploads.lock().expect("lock").get(name).cloned()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().expect("lock").len()
    }

    pub fn output(&self, name: &str) -> Option<Vec<u8>> {
        self.outputs.lock().expect("lock").get(name).cloned()
    }

    pub fn put_output(&self, name: &str, bytes: &[u8]) {
        self.outputs
            .lock()
            .expect("lock")
            .insert(name.to_string(), bytes.to_vec());
    }
}

#[async_trait]
impl FileRepository for MemoryFiles {
    async fn ensure_dirs(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn save_upload(&self, name: &SafeFileName, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        self.uploads
            .lock()
            .expect("lock")
            .insert(name.to_string(), bytes.to_vec());
        Ok(PathBuf::from("uploads").join(name.as_str()))
    }

    async fn save_output(&self, name: &SafeFileName, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        self.put_output(name.as_str(), bytes);
        Ok(PathBuf::from("outputs").join(name.as_str()))
    }

    async fn read_output(&self, name: &SafeFileName) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.output(name.as_str()))
    }
}

/// Stores sheets as JSON so tests can inspect what was written.
pub struct JsonCodec;

impl SheetCodec for JsonCodec {
    fn decode(&self, bytes: &[u8]) -> anyhow::Result<Sheet> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn encode(&self, sheet: &Sheet) -> anyhow::Result<Vec<u8>> {
        Ok(serde_json::to_vec(sheet)?)
    }
}

pub struct AlwaysHealthy;

#[async_trait]
impl HealthCheckService for AlwaysHealthy {
    async fn check_storage(&self) -> anyhow::Result<bool> {
        Ok(true)
    }
}

pub fn test_state() -> (AppState, Arc<MemoryFiles>) {
    let files = Arc::new(MemoryFiles::default());
    let state = AppState {
        config: RuntimeConfig {
            bind_addr: "127.0.0.1:5000".to_string(),
            public_base_url: "http://127.0.0.1:5000".to_string(),
            upload_dir: "uploads".to_string(),
            output_dir: "outputs".to_string(),
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 5,
        },
        file_repo: files.clone(),
        codec: Arc::new(JsonCodec),
        health_service: Arc::new(AlwaysHealthy),
        scorer: Arc::new(AnomalyScorer::new()),
        metrics: Arc::new(Metrics::default()),
    };
    (state, files)
}

/// Account A1 with a flat history and one spike on the last day.
pub fn balance_sheet() -> Sheet {
    let rows = [100.0, 100.0, 100.0, 5000.0]
        .iter()
        .enumerate()
        .map(|(i, balance)| {
            let date = NaiveDate::from_ymd_opt(2024, 1, i as u32 + 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .expect("valid date");
            vec![
                CellValue::from("A1"),
                CellValue::DateTime(date),
                CellValue::Number(*balance),
            ]
        })
        .collect();
    Sheet::new(
        vec![
            "Account".to_string(),
            "As of Date".to_string(),
            "Balance Difference".to_string(),
        ],
        rows,
    )
}
