use anyhow::Context;
use tracing::{error, info, warn};

use crate::AppError;
use crate::AppState;
use backend_domain::{
    has_allowed_extension, SafeFileName, ScoringError, ScoringSummary, UploadReceipt, UploadedFile,
};

pub async fn process_upload(state: &AppState, upload: UploadedFile) -> Result<UploadReceipt, AppError> {
    state.metrics.record_upload();
    let name = validate_file_name(&upload.file_name).map_err(|err| {
        warn!("rejected upload '{}': {}", upload.file_name, err);
        state.metrics.record_upload_error();
        err
    })?;

    match score_and_store(state, &name, upload.bytes).await {
        Ok((receipt, summary)) => {
            state.metrics.record_scoring(&summary);
            Ok(receipt)
        }
        Err(err) => {
            state.metrics.record_upload_error();
            if is_rejected_input(&err) {
                warn!("workbook {} rejected: {:#}", name, err);
            } else {
                error!("processing failed for {}: {:#}", name, err);
            }
            Err(AppError::Processing(err))
        }
    }
}

/// True when the workbook itself was bad, as opposed to a model or I/O failure.
fn is_rejected_input(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ScoringError>()
        .is_some_and(ScoringError::is_input_error)
}

fn validate_file_name(raw: &str) -> Result<SafeFileName, AppError> {
    if raw.is_empty() {
        return Err(AppError::BadRequest("No selected file".to_string()));
    }
    if !has_allowed_extension(raw) {
        return Err(AppError::BadRequest("Invalid file format".to_string()));
    }
    SafeFileName::sanitize(raw).ok_or_else(|| AppError::BadRequest("Invalid file format".to_string()))
}

async fn score_and_store(
    state: &AppState,
    name: &SafeFileName,
    bytes: Vec<u8>,
) -> anyhow::Result<(UploadReceipt, ScoringSummary)> {
    let upload_path = state
        .file_repo
        .save_upload(name, &bytes)
        .await
        .context("failed to save upload")?;
    info!("file {} saved to {}", name, upload_path.display());

    info!("running anomaly detection on {}", name);
    let codec = state.codec.clone();
    let scorer = state.scorer.clone();
    let (encoded, summary) = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let sheet = codec.decode(&bytes)?;
        let (scored, summary) = scorer.score_sheet(sheet)?;
        let encoded = codec.encode(&scored)?;
        Ok((encoded, summary))
    })
    .await
    .context("scoring task aborted")??;
    info!(
        "anomaly detection completed: rows={}, accounts={}, anomalies={}",
        summary.rows, summary.accounts, summary.anomalies
    );

    let output_name = name.processed();
    let output_path = state
        .file_repo
        .save_output(&output_name, &encoded)
        .await
        .context("failed to save processed file")?;
    info!("processed file saved: {}", output_path.display());

    let receipt = UploadReceipt {
        download_url: state.config.download_url(output_name.as_str()),
    };
    Ok((receipt, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{balance_sheet, test_state};

    fn upload(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            bytes: serde_json::to_vec(&balance_sheet()).expect("encode fixture"),
        }
    }

    #[tokio::test]
    async fn upload_is_scored_and_stored() {
        let (state, files) = test_state();
        let receipt = process_upload(&state, upload("q1 balances.xlsx"))
            .await
            .expect("upload");
        assert_eq!(
            receipt.download_url,
            "http://127.0.0.1:5000/download/Processed_q1_balances.xlsx"
        );
        assert!(files.upload("q1_balances.xlsx").is_some());
        let stored = files.output("Processed_q1_balances.xlsx").expect("output");
        let scored: serde_json::Value = serde_json::from_slice(&stored).expect("json");
        assert_eq!(scored["headers"][3], "Anomaly Detection");
        assert_eq!(scored["rows"].as_array().map(Vec::len), Some(4));
        let rendered = state.metrics.render_prometheus();
        assert!(rendered.contains("ledgerscope_rows_scored_total 4\n"));
        assert!(rendered.contains("ledgerscope_anomalies_total 1\n"));
    }

    #[tokio::test]
    async fn file_names_are_validated_before_saving() {
        let (state, files) = test_state();
        for (name, message) in [
            ("", "No selected file"),
            ("balances.csv", "Invalid file format"),
            ("balances", "Invalid file format"),
        ] {
            match process_upload(&state, upload(name)).await {
                Err(AppError::BadRequest(actual)) => assert_eq!(actual, message, "{name}"),
                other => panic!("unexpected result for '{name}': {other:?}"),
            }
        }
        assert_eq!(files.upload_count(), 0);
    }

    #[test]
    fn only_scoring_input_errors_count_as_rejected_input() {
        let missing = anyhow::Error::from(ScoringError::MissingColumn("Account".to_string()));
        assert!(is_rejected_input(&missing));
        let invalid = anyhow::Error::from(ScoringError::InvalidBalance {
            row: 3,
            value: "n/a".to_string(),
        });
        assert!(is_rejected_input(&invalid));
        let model = anyhow::Error::from(ScoringError::ModelFit("no samples".to_string()));
        assert!(!is_rejected_input(&model));
        assert!(!is_rejected_input(&anyhow::anyhow!("disk full")));
    }

    #[tokio::test]
    async fn scoring_failure_is_reported_without_output() {
        let (state, files) = test_state();
        let mut sheet = balance_sheet();
        sheet.headers[0] = "Acct".to_string();
        let bad = UploadedFile {
            file_name: "broken.xlsx".to_string(),
            bytes: serde_json::to_vec(&sheet).expect("encode fixture"),
        };
        let err = process_upload(&state, bad).await.expect_err("must fail");
        assert_eq!(
            err.to_string(),
            "Processing failed: missing required column 'Account'"
        );
        assert!(files.output("Processed_broken.xlsx").is_none());
        assert!(state
            .metrics
            .render_prometheus()
            .contains("ledgerscope_upload_errors_total 1\n"));
    }
}
