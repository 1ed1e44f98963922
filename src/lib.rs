//! ibex - named-entity extraction service.
//!
//! Extracts proper-noun entities from free text (tweets, news, short
//! documents) for downstream topic and summarization pipelines. Text is
//! normalized, parsed by a per-language parser shared across requests, and
//! the candidates are filtered for precision.

pub mod cli;
pub mod config;
pub mod models;
pub mod server;
pub mod services;
