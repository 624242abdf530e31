use std::sync::atomic::{AtomicU64, Ordering};

use backend_domain::ScoringSummary;

#[derive(Debug, Default)]
pub struct Metrics {
    uploads: AtomicU64,
    upload_errors: AtomicU64,
    rows_scored: AtomicU64,
    anomalies: AtomicU64,
    downloads: AtomicU64,
}

impl Metrics {
    pub fn record_upload(&self) {
        self.uploads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upload_error(&self) {
        self.upload_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scoring(&self, summary: &ScoringSummary) {
        self.rows_scored
            .fetch_add(summary.rows as u64, Ordering::Relaxed);
        self.anomalies
            .fetch_add(summary.anomalies as u64, Ordering::Relaxed);
    }

    pub fn record_download(&self) {
        self.downloads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let uploads = self.uploads.load(Ordering::Relaxed);
        let errors = self.upload_errors.load(Ordering::Relaxed);
        let rows = self.rows_scored.load(Ordering::Relaxed);
        let anomalies = self.anomalies.load(Ordering::Relaxed);
        let downloads = self.downloads.load(Ordering::Relaxed);

        format!(
            "# TYPE ledgerscope_uploads_total counter\n\
ledgerscope_uploads_total {}\n\
# TYPE ledgerscope_upload_errors_total counter\n\
ledgerscope_upload_errors_total {}\n\
# TYPE ledgerscope_rows_scored_total counter\n\
ledgerscope_rows_scored_total {}\n\
# TYPE ledgerscope_anomalies_total counter\n\
ledgerscope_anomalies_total {}\n\
# TYPE ledgerscope_downloads_total counter\n\
ledgerscope_downloads_total {}\n",
            uploads, errors, rows, anomalies, downloads
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prometheus_output_reflects_counters() {
        let metrics = Metrics::default();
        metrics.record_upload();
        metrics.record_upload();
        metrics.record_upload_error();
        metrics.record_scoring(&ScoringSummary {
            rows: 12,
            accounts: 3,
            anomalies: 2,
        });
        let rendered = metrics.render_prometheus();
        assert!(rendered.contains("ledgerscope_uploads_total 2\n"));
        assert!(rendered.contains("ledgerscope_upload_errors_total 1\n"));
        assert!(rendered.contains("ledgerscope_rows_scored_total 12\n"));
        assert!(rendered.contains("ledgerscope_anomalies_total 2\n"));
        assert!(rendered.contains("ledgerscope_downloads_total 0\n"));
    }
}
