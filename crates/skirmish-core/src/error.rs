//! Top-level error type.

use skirmish_events::{LoadError, SeedError};

use crate::config::ConfigError;
use crate::output::OutputError;

/// Errors that can occur while running the tool end to end.
#[derive(Debug, thiserror::Error)]
pub enum SkirmishError {
    /// Error loading configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// Error loading the interaction log
    #[error("Input error: {0}")]
    Load(#[from] LoadError),
    /// Error in the seed labels
    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),
    /// Error writing results
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
