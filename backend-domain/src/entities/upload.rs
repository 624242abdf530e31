use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub download_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoringSummary {
    pub rows: usize,
    pub accounts: usize,
    pub anomalies: usize,
}

/// A workbook as received from the client, name unsanitized.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A processed workbook ready to be sent back to the client.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
