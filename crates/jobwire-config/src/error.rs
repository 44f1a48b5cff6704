use thiserror::Error;

/// Errors loading a routing definition.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read routing file: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to parse routing definition: {0}")]
  Parse(#[from] serde_json::Error),
}
