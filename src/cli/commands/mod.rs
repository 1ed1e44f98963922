//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod client;
mod extract;
mod languages;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "ibex")]
#[command(about = "Named-entity extraction service")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Resolve relative paths from current working directory instead of config file location
    #[arg(long, global = true)]
    cwd: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the extraction server
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default from config, 127.0.0.1:50051)
        bind: Option<String>,
    },

    /// Extract entities in-process and print them
    Extract {
        /// Text to extract from; several arguments are joined as one document
        #[arg(required = true)]
        text: Vec<String>,
        /// Two-letter language code (default from config)
        #[arg(short, long)]
        language: Option<String>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send text to a running server and print the entities
    Client {
        /// Text to extract from
        text: String,
        /// Two-letter language code
        #[arg(short, long, default_value = "en")]
        language: String,
        /// Server base URL
        #[arg(long, env = "IBEX_URL", default_value = "http://127.0.0.1:50051")]
        url: String,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List enabled languages and their parser models
    Languages,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        use_cwd: cli.cwd,
    };
    let (settings, _config) = load_settings_with_options(options).await?;

    match cli.command {
        Commands::Serve { bind } => serve::cmd_serve(settings, bind.as_deref()).await,
        Commands::Extract {
            text,
            language,
            json,
        } => extract::cmd_extract(&settings, text, language, json).await,
        Commands::Client {
            text,
            language,
            url,
            json,
        } => client::cmd_client(&url, &text, &language, json).await,
        Commands::Languages => languages::cmd_languages(&settings),
    }
}
