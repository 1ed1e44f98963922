//! Language listing command.

use console::style;

use crate::config::Settings;

/// List enabled languages and the parser model serving each.
pub fn cmd_languages(settings: &Settings) -> anyhow::Result<()> {
    println!("{}", style("Enabled languages:").bold());
    for lang in &settings.languages {
        let marker = if *lang == settings.default_language {
            style(" (default)").dim().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} {:<8} {}{}",
            style(lang.code()).cyan(),
            lang.name(),
            lang.model_name(),
            marker
        );
    }
    Ok(())
}
