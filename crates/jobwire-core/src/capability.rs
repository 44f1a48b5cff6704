//! Capability contracts supplied by the embedding application.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::emit::Emitter;
use crate::error::{ExecutorError, SelectorError, TriggerError};
use crate::params::Params;

/// A long-running event producer.
///
/// The engine runs each registered trigger in its own task. Implementations
/// call [`Emitter::emit`] once per event and must return once `cancel` is
/// cancelled; nothing forcibly interrupts them.
#[async_trait]
pub trait Trigger: Send + Sync {
  async fn run(&self, cancel: CancellationToken, emit: Emitter) -> Result<(), TriggerError>;
}

/// A predicate deciding whether a router passes for a fired event.
///
/// Called synchronously on the dispatching task. A selector that blocks
/// stalls dispatch of the event it is evaluating; no timeout is applied.
pub trait Selector: Send + Sync {
  /// `trigger` holds the fired event's parameters, `selector` the router's
  /// fixed configuration.
  fn select(&self, trigger: &Params, selector: &Params) -> Result<bool, SelectorError>;
}

/// An action run for every job bound to a passing router.
///
/// A returned parameter set is fed back into dispatch as an event on the
/// `exe_done` trigger. Returning `None` ends the chain.
#[async_trait]
pub trait Executor: Send + Sync {
  async fn execute(&self, params: Params) -> Result<Option<Params>, ExecutorError>;
}
