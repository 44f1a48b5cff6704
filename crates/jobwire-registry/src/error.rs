use thiserror::Error;

use crate::entry::EntryKind;

/// Configuration errors reported by registration calls.
///
/// A failed registration leaves the registry unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
  /// The name is already taken for this kind of entry.
  #[error("{kind} already registered: {name}")]
  AlreadyExists { kind: EntryKind, name: String },

  /// A job with this name already exists under the router.
  #[error("job '{job}' already registered on router '{router}'")]
  JobAlreadyExists { router: String, job: String },

  #[error("unknown trigger: {name}")]
  UnknownTrigger { name: String },

  #[error("unknown selector: {name}")]
  UnknownSelector { name: String },

  #[error("unknown executor: {name}")]
  UnknownExecutor { name: String },

  #[error("unknown router: {name}")]
  UnknownRouter { name: String },

  /// The name belongs to the feedback channel and cannot be registered.
  #[error("trigger name '{name}' is reserved")]
  ReservedName { name: String },
}
