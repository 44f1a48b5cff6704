//! Logging collaborator.
//!
//! The engine reports startup, shutdown and dispatch failures through a
//! [`Logger`]. It imposes no format; implementations decide where messages
//! go (tracing, a test buffer, nowhere).

use std::fmt;

/// Four severity-leveled sinks for formatted messages.
pub trait Logger: Send + Sync {
  fn debug(&self, args: fmt::Arguments<'_>);
  fn info(&self, args: fmt::Arguments<'_>);
  fn warn(&self, args: fmt::Arguments<'_>);
  fn error(&self, args: fmt::Arguments<'_>);
}

/// A logger that discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
  fn debug(&self, _args: fmt::Arguments<'_>) {}
  fn info(&self, _args: fmt::Arguments<'_>) {}
  fn warn(&self, _args: fmt::Arguments<'_>) {}
  fn error(&self, _args: fmt::Arguments<'_>) {}
}

/// A logger that forwards to the `tracing` macros.
///
/// Messages inherit whatever span is current, so the engine's `trigger` and
/// `job` spans show up as structured fields on every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
  fn debug(&self, args: fmt::Arguments<'_>) {
    tracing::debug!("{}", args);
  }

  fn info(&self, args: fmt::Arguments<'_>) {
    tracing::info!("{}", args);
  }

  fn warn(&self, args: fmt::Arguments<'_>) {
    tracing::warn!("{}", args);
  }

  fn error(&self, args: fmt::Arguments<'_>) {
    tracing::error!("{}", args);
  }
}
