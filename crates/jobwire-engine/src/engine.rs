//! Engine lifecycle.
//!
//! ```text
//! Created ──start──▶ Running ──stop──▶ Stopping ──▶ Stopped
//!                       ▲                              │
//!                       └────────────start─────────────┘
//! ```

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use jobwire_core::{
  Emitter, Event, EventSink, FEEDBACK_TRIGGER, Logger, Params, TracingLogger, Trigger,
};
use jobwire_registry::Registry;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info_span};

use crate::dispatcher::Dispatcher;
use crate::error::LifecycleError;
use crate::feedback;
use crate::panic::panic_message;

/// Lifecycle state of an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
  Created,
  Running,
  Stopping,
  Stopped,
}

impl fmt::Display for EngineState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      EngineState::Created => "created",
      EngineState::Running => "running",
      EngineState::Stopping => "stopping",
      EngineState::Stopped => "stopped",
    };
    f.write_str(name)
  }
}

/// Tasks and dispatcher of one start/stop cycle.
struct ActiveRun {
  run_id: String,
  runtime: Handle,
  cancel: CancellationToken,
  dispatcher: Dispatcher,
  tasks: Vec<(String, JoinHandle<()>)>,
}

struct Lifecycle {
  state: EngineState,
  run: Option<ActiveRun>,
}

/// Runs every registered trigger and routes what they emit.
///
/// # Usage
///
/// ```ignore
/// let engine = Engine::new(registry);
/// engine.start()?;
/// engine.fire("manual", None)?;
/// engine.stop().await?;
/// ```
pub struct Engine {
  registry: Arc<Registry>,
  logger: Arc<dyn Logger>,
  lifecycle: Arc<Mutex<Lifecycle>>,
}

impl Engine {
  /// Create an engine that logs through `tracing`.
  pub fn new(registry: Arc<Registry>) -> Self {
    Self::with_logger(registry, Arc::new(TracingLogger))
  }

  /// Create an engine with a custom logger.
  pub fn with_logger(registry: Arc<Registry>, logger: Arc<dyn Logger>) -> Self {
    Self {
      registry,
      logger,
      lifecycle: Arc::new(Mutex::new(Lifecycle {
        state: EngineState::Created,
        run: None,
      })),
    }
  }

  pub fn state(&self) -> EngineState {
    self.lock().state
  }

  fn lock(&self) -> MutexGuard<'_, Lifecycle> {
    lock(&self.lifecycle)
  }

  /// Start one task per registered trigger plus the feedback consumer.
  ///
  /// Valid in `Created` or `Stopped`. Must be called from within a tokio
  /// runtime; that runtime also hosts every spawned job. Triggers registered
  /// after this call are picked up by the next start.
  pub fn start(&self) -> Result<(), LifecycleError> {
    let mut lifecycle = self.lock();
    match lifecycle.state {
      EngineState::Created | EngineState::Stopped => {}
      state => {
        return Err(LifecycleError::InvalidState {
          operation: "start",
          state,
        });
      }
    }
    let runtime = Handle::try_current().map_err(|_| LifecycleError::NoRuntime)?;

    let run_id = uuid::Uuid::new_v4().to_string();
    let span = info_span!("engine", run_id = %run_id);
    let cancel = CancellationToken::new();
    let (feedback, receiver) = feedback::channel();
    let dispatcher = Dispatcher::new(
      self.registry.clone(),
      self.logger.clone(),
      feedback,
      runtime.clone(),
      cancel.clone(),
    );

    let triggers = self.registry.triggers();
    let mut tasks = Vec::with_capacity(triggers.len() + 1);

    for (name, trigger) in triggers {
      let task = run_trigger(
        name.clone(),
        trigger,
        dispatcher.clone(),
        cancel.child_token(),
        self.logger.clone(),
      )
      .instrument(info_span!(parent: &span, "trigger", trigger = %name));
      tasks.push((name, runtime.spawn(task)));
    }

    let consumer = feedback::run_consumer(receiver, dispatcher.clone(), cancel.child_token())
      .instrument(info_span!(parent: &span, "trigger", trigger = FEEDBACK_TRIGGER));
    tasks.push((FEEDBACK_TRIGGER.to_string(), runtime.spawn(consumer)));

    span.in_scope(|| {
      self.logger.info(format_args!(
        "engine started with {} triggers",
        tasks.len() - 1
      ))
    });

    lifecycle.state = EngineState::Running;
    lifecycle.run = Some(ActiveRun {
      run_id,
      runtime,
      cancel,
      dispatcher,
      tasks,
    });
    Ok(())
  }

  /// Cancel every trigger and wait for each producer loop to return.
  ///
  /// Valid only in `Running`. Jobs already spawned keep running; their
  /// results are dropped instead of being fed back. The shutdown runs in its
  /// own task, so dropping this future still ends in `Stopped`.
  pub async fn stop(&self) -> Result<(), LifecycleError> {
    let run = {
      let mut lifecycle = self.lock();
      if lifecycle.state != EngineState::Running {
        return Err(LifecycleError::InvalidState {
          operation: "stop",
          state: lifecycle.state,
        });
      }
      lifecycle.state = EngineState::Stopping;
      lifecycle.run.take()
    };

    let Some(run) = run else {
      self.lock().state = EngineState::Stopped;
      return Ok(());
    };

    let span = info_span!("engine", run_id = %run.run_id);
    let runtime = run.runtime.clone();
    let handle = runtime.spawn(
      shutdown(run, self.lifecycle.clone(), self.logger.clone()).instrument(span),
    );

    if let Err(e) = handle.await {
      self
        .logger
        .error(format_args!("engine shutdown did not complete: {e}"));
      self.lock().state = EngineState::Stopped;
    }
    Ok(())
  }

  /// Fire an event by hand, as if `trigger` had emitted `params`.
  ///
  /// Goes through the same entry point as trigger emissions. Valid only in
  /// `Running`.
  pub fn fire(&self, trigger: &str, params: Option<Params>) -> Result<(), LifecycleError> {
    let dispatcher = {
      let lifecycle = self.lock();
      match (&lifecycle.state, &lifecycle.run) {
        (EngineState::Running, Some(run)) => run.dispatcher.clone(),
        (state, _) => {
          return Err(LifecycleError::InvalidState {
            operation: "fire",
            state: *state,
          });
        }
      }
    };

    dispatcher.dispatch(Event::new(trigger, params));
    Ok(())
  }
}

impl Drop for Engine {
  fn drop(&mut self) {
    if let Some(run) = self.lock().run.take() {
      run.cancel.cancel();
    }
  }
}

fn lock(lifecycle: &Mutex<Lifecycle>) -> MutexGuard<'_, Lifecycle> {
  lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cancel a run, join its tasks and mark the engine stopped.
async fn shutdown(run: ActiveRun, lifecycle: Arc<Mutex<Lifecycle>>, logger: Arc<dyn Logger>) {
  logger.info(format_args!("engine stopping"));

  run.cancel.cancel();
  for (name, task) in run.tasks {
    if let Err(e) = task.await {
      logger.error(format_args!(
        "task for trigger '{name}' did not exit cleanly: {e}"
      ));
    }
  }

  lock(&lifecycle).state = EngineState::Stopped;
  logger.info(format_args!("engine stopped"));
}

/// Run one trigger's producer loop to completion.
async fn run_trigger(
  name: String,
  trigger: Arc<dyn Trigger>,
  dispatcher: Dispatcher,
  cancel: CancellationToken,
  logger: Arc<dyn Logger>,
) {
  let emitter = Emitter::new(name.as_str(), Arc::new(dispatcher));
  logger.debug(format_args!("trigger '{name}' started"));

  let outcome = AssertUnwindSafe(trigger.run(cancel, emitter))
    .catch_unwind()
    .await;

  match outcome {
    Ok(Ok(())) => logger.debug(format_args!("trigger '{name}' stopped")),
    Ok(Err(e)) => logger.error(format_args!("trigger '{name}' failed: {e}")),
    Err(payload) => logger.error(format_args!(
      "trigger '{name}' crashed: {}",
      panic_message(payload.as_ref())
    )),
  }
}
