//! Jobwire Engine
//!
//! Wires registered triggers, selectors and executors together and runs them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           Engine                             │
//! │  - start(): one task per trigger + the feedback consumer     │
//! │  - stop(): cancel all, wait for every task to return         │
//! └──────────────────────────────────────────────────────────────┘
//!                 │ emit(params)                 ▲
//!                 ▼                              │ exe_done event
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Dispatcher                           │
//! │  - routers bound to the trigger, selector evaluated inline   │
//! │  - one spawned task per (passing router, job)                │
//! │  - executor result -> feedback queue                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Feedback events go through a queue with its own consumer task rather than
//! re-entering dispatch recursively, so long or cyclic chains never grow the
//! call stack. A feedback router whose selector always passes and whose job
//! always returns a result loops forever; nothing detects that.
//!
//! # Usage
//!
//! ```ignore
//! let registry = Arc::new(Registry::new());
//! registry.add_trigger("tick", IntervalTrigger::new(period))?;
//! registry.add_selector("all", AlwaysSelector)?;
//! registry.add_executor("print", PrintExecutor)?;
//! registry.add_router("r1", "tick", "all", Params::new())?;
//! registry.add_router_job("r1", "j1", "print", Params::new())?;
//!
//! let engine = Engine::new(registry);
//! engine.start()?;
//! // ...
//! engine.stop().await?;
//! ```

mod dispatcher;
mod engine;
mod error;
mod feedback;
mod panic;

pub use dispatcher::Dispatcher;
pub use engine::{Engine, EngineState};
pub use error::LifecycleError;

pub use jobwire_core::{
  CancellationToken, Emitter, Event, EventSink, Executor, ExecutorError, FEEDBACK_TRIGGER, Logger,
  NoopLogger, Params, Selector, SelectorError, TracingLogger, Trigger, TriggerError,
};
pub use jobwire_registry::{Registry, RegistryError};
