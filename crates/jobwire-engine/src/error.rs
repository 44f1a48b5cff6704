//! Engine lifecycle errors.

use thiserror::Error;

use crate::engine::EngineState;

/// Errors from [`Engine`](crate::Engine) lifecycle calls.
///
/// A failed call leaves the engine state unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
  /// The operation is not valid in the current state.
  #[error("cannot {operation} engine while {state}")]
  InvalidState {
    operation: &'static str,
    state: EngineState,
  },

  /// `start` was called outside a tokio runtime.
  #[error("engine must be started from within a tokio runtime")]
  NoRuntime,
}
