use async_trait::async_trait;

use crate::entities::Sheet;

/// Converts between workbook bytes and the first worksheet of the workbook.
pub trait SheetCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> anyhow::Result<Sheet>;
    fn encode(&self, sheet: &Sheet) -> anyhow::Result<Vec<u8>>;
}

#[async_trait]
pub trait HealthCheckService: Send + Sync {
    async fn check_storage(&self) -> anyhow::Result<bool>;
}
