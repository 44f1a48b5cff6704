//! Jobwire Core
//!
//! Shared vocabulary for the jobwire crates: parameter sets, events, and the
//! three capability contracts an embedding application implements.
//!
//! # Capabilities
//!
//! ```text
//! Trigger   run(cancel, emit)            long-running event producer
//! Selector  select(trigger, selector)    synchronous predicate
//! Executor  execute(params)              async action, optional result
//! ```
//!
//! Results returned by executors come back into the system as events on the
//! reserved [`FEEDBACK_TRIGGER`] identity, which is what makes job chaining
//! work without explicit wiring.

mod capability;
mod emit;
mod error;
mod event;
mod logger;
mod params;

pub use capability::{Executor, Selector, Trigger};
pub use emit::{Emitter, EventSink};
pub use error::{ExecutorError, SelectorError, TriggerError};
pub use event::{Event, FEEDBACK_TRIGGER};
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use params::{Params, merge_params};

pub use tokio_util::sync::CancellationToken;
