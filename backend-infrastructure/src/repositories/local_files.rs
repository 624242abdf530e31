use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs;

use backend_domain::{FileRepository, RuntimeConfig, SafeFileName};

pub struct LocalFileRepository {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl LocalFileRepository {
    pub fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(&config.upload_dir, &config.output_dir)
    }
}

async fn write_file(dir: &Path, name: &SafeFileName, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(name.as_str());
    fs::write(&path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[async_trait]
impl FileRepository for LocalFileRepository {
    async fn ensure_dirs(&self) -> anyhow::Result<()> {
        for dir in [&self.upload_dir, &self.output_dir] {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }

    async fn save_upload(&self, name: &SafeFileName, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        write_file(&self.upload_dir, name, bytes).await
    }

    async fn save_output(&self, name: &SafeFileName, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        write_file(&self.output_dir, name, bytes).await
    }

    async fn read_output(&self, name: &SafeFileName) -> anyhow::Result<Option<Vec<u8>>> {
        let path = self.output_dir.join(name.as_str());
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> SafeFileName {
        SafeFileName::sanitize(raw).expect("safe name")
    }

    #[tokio::test]
    async fn uploads_and_outputs_live_in_separate_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = LocalFileRepository::new(dir.path().join("uploads"), dir.path().join("outputs"));
        repo.ensure_dirs().await.expect("dirs");

        let saved = repo.save_upload(&name("q1.xlsx"), b"raw").await.expect("save upload");
        assert_eq!(saved, dir.path().join("uploads").join("q1.xlsx"));
        assert_eq!(repo.read_output(&name("q1.xlsx")).await.expect("read"), None);

        repo.save_output(&name("Processed_q1.xlsx"), b"scored")
            .await
            .expect("save output");
        assert_eq!(
            repo.read_output(&name("Processed_q1.xlsx")).await.expect("read"),
            Some(b"scored".to_vec())
        );
    }

    #[tokio::test]
    async fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = LocalFileRepository::new(dir.path().join("a/b"), dir.path().join("c/d"));
        let path = repo
            .save_output(&name("out.xlsx"), b"bytes")
            .await
            .expect("save");
        assert!(path.exists());
    }
}
