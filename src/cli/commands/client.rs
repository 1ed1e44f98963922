//! Client for a running extraction server.

use std::time::Duration;

use console::style;
use serde::Deserialize;

use crate::models::{ExtractionRequest, ExtractionResult};

use super::super::helpers::print_result;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

/// Send one extraction request to the server at `url`.
pub async fn cmd_client(url: &str, text: &str, language: &str, json: bool) -> anyhow::Result<()> {
    let endpoint = format!("{}/extract", url.trim_end_matches('/'));
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;

    tracing::debug!("POST {}", endpoint);
    let response = client
        .post(&endpoint)
        .json(&ExtractionRequest::new(text, language))
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to reach {}: {}", endpoint, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| format!("{}: {}", e.error, e.message))
            .unwrap_or(body);
        eprintln!("{} Server returned {}", style("✗").red(), status);
        anyhow::bail!("Extraction failed ({}): {}", status, detail);
    }

    let result: ExtractionResult = response.json().await?;
    print_result(&result, json)
}
