//! Configuration management module
//!
//! Loads client settings from environment variables or a JSON file

pub mod file;
pub mod settings;

pub use file::ClientFile;
pub use settings::{ApiConfig, LoggingConfig, Settings};
