//! Errors reported by capability implementations.

use thiserror::Error;

/// Errors from [`Trigger`](crate::Trigger) implementations.
#[derive(Debug, Error)]
pub enum TriggerError {
  #[error("trigger config error: {message}")]
  Config { message: String },
  #[error("trigger runtime error: {message}")]
  Runtime { message: String },
}

impl TriggerError {
  pub fn config(message: impl Into<String>) -> Self {
    Self::Config {
      message: message.into(),
    }
  }

  pub fn runtime(message: impl Into<String>) -> Self {
    Self::Runtime {
      message: message.into(),
    }
  }
}

/// Errors from [`Selector`](crate::Selector) implementations.
///
/// The dispatcher treats any error as a non-matching router.
#[derive(Debug, Error)]
pub enum SelectorError {
  #[error("selector failed: {message}")]
  Failed { message: String },
}

impl SelectorError {
  pub fn failed(message: impl Into<String>) -> Self {
    Self::Failed {
      message: message.into(),
    }
  }
}

/// Errors from [`Executor`](crate::Executor) implementations.
///
/// The dispatcher logs these and synthesizes no feedback event.
#[derive(Debug, Error)]
pub enum ExecutorError {
  /// A required parameter is missing or has the wrong shape.
  #[error("invalid parameter '{key}': {message}")]
  InvalidParams { key: String, message: String },

  /// The action itself failed.
  #[error("executor failed: {message}")]
  Failed { message: String },
}

impl ExecutorError {
  pub fn invalid_params(key: impl Into<String>, message: impl Into<String>) -> Self {
    Self::InvalidParams {
      key: key.into(),
      message: message.into(),
    }
  }

  pub fn failed(message: impl Into<String>) -> Self {
    Self::Failed {
      message: message.into(),
    }
  }
}
