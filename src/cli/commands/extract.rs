//! In-process extraction command.

use crate::config::Settings;

use super::super::helpers::print_result;

/// Extract entities from `documents` without a server.
pub async fn cmd_extract(
    settings: &Settings,
    documents: Vec<String>,
    language: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let service = settings.build_service()?;
    let language =
        language.unwrap_or_else(|| settings.default_language.code().to_string());

    let result = tokio::task::spawn_blocking(move || {
        service.extract_documents(&documents, &language)
    })
    .await??;

    print_result(&result, json)
}
