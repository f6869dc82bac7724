//! OpenAI API client library
//!
//! Typed request builders, wire codecs and a blocking/async client for the
//! OpenAI HTTP API

pub mod codec;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::{ClientFile, Settings};
pub use services::{ClientResponse, OpenAiClient, OpenAiClientBuilder, Transport};
pub use utils::error::{ClientError, ClientResult, TransportError};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
