//! The callback handed to triggers.

use std::fmt;
use std::sync::Arc;

use crate::event::Event;
use crate::params::Params;

/// The single dispatch entry point.
///
/// The engine's dispatcher implements this; tests can implement it to
/// observe what a trigger emits.
pub trait EventSink: Send + Sync {
  fn dispatch(&self, event: Event);
}

/// Emits events on behalf of one named trigger.
///
/// Cheap to clone and usable from any thread. Each call dispatches
/// synchronously, so events from one trigger are dispatched in the order
/// they were emitted.
#[derive(Clone)]
pub struct Emitter {
  trigger: Arc<str>,
  sink: Arc<dyn EventSink>,
}

impl Emitter {
  pub fn new(trigger: impl Into<Arc<str>>, sink: Arc<dyn EventSink>) -> Self {
    Self {
      trigger: trigger.into(),
      sink,
    }
  }

  /// Name of the trigger this emitter fires as.
  pub fn trigger(&self) -> &str {
    &self.trigger
  }

  /// Fire one event. `None` fires with an empty parameter set.
  pub fn emit(&self, params: Option<Params>) {
    self.sink.dispatch(Event::new(self.trigger.as_ref(), params));
  }
}

impl fmt::Debug for Emitter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Emitter")
      .field("trigger", &self.trigger)
      .finish_non_exhaustive()
  }
}
