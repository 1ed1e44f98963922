//! Shared helper functions for CLI commands.

use console::style;

use crate::models::ExtractionResult;

/// Print an extraction result as a list, or as JSON when `json` is set.
pub fn print_result(result: &ExtractionResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    if result.values.is_empty() {
        println!("{} No entities found", style("!").yellow());
        return Ok(());
    }

    println!(
        "{} {} entities ({} {})",
        style("✓").green(),
        result.values.len(),
        result.model,
        result.version
    );
    for value in &result.values {
        println!("  {}", value);
    }
    Ok(())
}
