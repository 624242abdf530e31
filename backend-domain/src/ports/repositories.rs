use std::path::PathBuf;

use async_trait::async_trait;

use crate::value_objects::SafeFileName;

/// Transient staging for uploaded and processed workbooks.
#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn ensure_dirs(&self) -> anyhow::Result<()>;
    async fn save_upload(&self, name: &SafeFileName, bytes: &[u8]) -> anyhow::Result<PathBuf>;
    async fn save_output(&self, name: &SafeFileName, bytes: &[u8]) -> anyhow::Result<PathBuf>;
    /// Returns `None` when no processed file with that name exists.
    async fn read_output(&self, name: &SafeFileName) -> anyhow::Result<Option<Vec<u8>>>;
}
