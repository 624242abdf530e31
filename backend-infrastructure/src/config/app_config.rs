use std::env;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::RuntimeConfig;

use crate::config::validation::validate_dir;

pub const CONFIG_ENV: &str = "LEDGERSCOPE_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub public_base_url: String,
    pub upload_dir: String,
    pub output_dir: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            public_base_url: "http://127.0.0.1:5000".to_string(),
            upload_dir: "./uploads".to_string(),
            output_dir: "./outputs".to_string(),
            max_body_bytes: 16 * 1024 * 1024,
            request_timeout_seconds: 60,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        Self::load_from(Path::new(&path)).await
    }

    pub async fn load_from(file_path: &Path) -> Result<Self> {
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path)
                .await
                .with_context(|| format!("failed to read {}", file_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse {}", file_path.display()))?
        } else {
            warn!("{} not found, using defaults", file_path.display());
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.bind_addr = self.bind_addr.trim().to_string();
        self.public_base_url = self.public_base_url.trim().trim_end_matches('/').to_string();
        self.upload_dir = self.upload_dir.trim().to_string();
        self.output_dir = self.output_dir.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.upload_dir = resolve_path(base, &self.upload_dir);
        self.output_dir = resolve_path(base, &self.output_dir);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.public_base_url.is_empty() {
            return Err(anyhow!("public_base_url must not be empty"));
        }
        validate_dir("upload_dir", &self.upload_dir)?;
        validate_dir("output_dir", &self.output_dir)?;
        if self.upload_dir == self.output_dir {
            return Err(anyhow!("upload_dir and output_dir must differ"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            public_base_url: self.public_base_url.clone(),
            upload_dir: self.upload_dir.clone(),
            output_dir: self.output_dir.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("LEDGERSCOPE_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("LEDGERSCOPE_PUBLIC_BASE_URL") {
            self.public_base_url = value;
        }
        if let Ok(value) = env::var("LEDGERSCOPE_UPLOAD_DIR") {
            self.upload_dir = value;
        }
        if let Ok(value) = env::var("LEDGERSCOPE_OUTPUT_DIR") {
            self.output_dir = value;
        }
        if let Ok(value) = env::var("LEDGERSCOPE_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("LEDGERSCOPE_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_values_are_resolved_against_config_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "bind_addr = \"127.0.0.1:8088\"\npublic_base_url = \"https://ledger.example.com/\"\nupload_dir = \"in\"\n",
        )
        .expect("write config");

        let config = AppConfig::load_from(&path).await.expect("load");
        assert_eq!(config.bind_addr, "127.0.0.1:8088");
        assert_eq!(config.public_base_url, "https://ledger.example.com");
        assert_eq!(config.upload_dir, dir.path().join("in").to_string_lossy());
        assert_eq!(config.output_dir, dir.path().join("./outputs").to_string_lossy());
        assert_eq!(config.max_body_bytes, 16 * 1024 * 1024);
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig::load_from(&dir.path().join("absent.toml"))
            .await
            .expect("load");
        assert_eq!(config.request_timeout_seconds, 60);
        assert!(config.upload_dir.ends_with("uploads"));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.bind_addr = "not-an-addr".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.output_dir = config.upload_dir.clone();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.max_body_bytes = 0;
        assert!(config.validate().is_err());

        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn download_urls_use_the_public_base() {
        let mut config = AppConfig::default();
        config.public_base_url = "http://files.local:9000/".to_string();
        config.normalize();
        assert_eq!(
            config.to_runtime_config().download_url("Processed_q1.xlsx"),
            "http://files.local:9000/download/Processed_q1.xlsx"
        );
    }
}
