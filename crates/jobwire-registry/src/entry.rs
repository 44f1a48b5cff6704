//! Registered entries.

use std::fmt;
use std::sync::Arc;

use jobwire_core::{Executor, Params, Selector};

/// Kind of a named registry entry, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
  Trigger,
  Selector,
  Executor,
  Router,
}

impl fmt::Display for EntryKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      EntryKind::Trigger => "trigger",
      EntryKind::Selector => "selector",
      EntryKind::Executor => "executor",
      EntryKind::Router => "router",
    };
    f.write_str(name)
  }
}

/// Binds a trigger to a selector with fixed selector parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Router {
  pub name: String,
  pub trigger: String,
  pub selector: String,
  pub params: Params,
}

/// Binds a router to an executor with fixed executor parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
  pub name: String,
  pub router: String,
  pub executor: String,
  pub params: Params,
}

/// A router together with its resolved selector.
#[derive(Clone)]
pub struct Route {
  pub router: Arc<Router>,
  pub selector: Arc<dyn Selector>,
}

/// A job together with its resolved executor.
#[derive(Clone)]
pub struct Binding {
  pub job: Arc<Job>,
  pub executor: Arc<dyn Executor>,
}

impl fmt::Debug for Route {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Route")
      .field("router", &self.router)
      .finish_non_exhaustive()
  }
}

impl fmt::Debug for Binding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Binding")
      .field("job", &self.job)
      .finish_non_exhaustive()
  }
}
