use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub public_base_url: String,
    pub upload_dir: String,
    pub output_dir: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl RuntimeConfig {
    pub fn download_url(&self, file_name: &str) -> String {
        format!(
            "{}/download/{}",
            self.public_base_url.trim_end_matches('/'),
            file_name
        )
    }
}
