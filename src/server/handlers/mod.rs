//! HTTP request handlers for the extraction server.

mod api;
mod extract;

// Re-export handlers for use by the router
pub use api::{api_languages, health};
pub use extract::extract;
