//! Events flowing through the dispatcher.

use crate::params::Params;

/// Reserved trigger name on which executor results are re-injected.
pub const FEEDBACK_TRIGGER: &str = "exe_done";

/// A fired event: the name of the trigger that produced it and its parameters.
///
/// Events live for one dispatch pass and are never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
  /// Name of the trigger that fired.
  pub trigger: String,
  /// Trigger parameters. Empty when the trigger emitted none.
  pub params: Params,
}

impl Event {
  pub fn new(trigger: impl Into<String>, params: Option<Params>) -> Self {
    Self {
      trigger: trigger.into(),
      params: params.unwrap_or_default(),
    }
  }

  /// An event on the feedback channel carrying an executor's result.
  pub fn feedback(result: Params) -> Self {
    Self {
      trigger: FEEDBACK_TRIGGER.to_string(),
      params: result,
    }
  }

  pub fn is_feedback(&self) -> bool {
    self.trigger == FEEDBACK_TRIGGER
  }
}
