//! Event fan-out.
//!
//! For a fired event the dispatcher evaluates every router bound to the
//! event's trigger, synchronously and on the caller's thread, then spawns one
//! task per job of each passing router. Job results are queued on the
//! feedback channel.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use jobwire_core::{Event, EventSink, Logger, Params, merge_params};
use jobwire_registry::{Binding, Registry, Route, Router};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info_span};

use crate::feedback::FeedbackSender;
use crate::panic::panic_message;

/// Routes fired events to jobs for one engine run.
///
/// Cloned into every trigger's [`Emitter`](jobwire_core::Emitter) and into
/// the feedback consumer. Once the run is cancelled, events are dropped.
#[derive(Clone)]
pub struct Dispatcher {
  registry: Arc<Registry>,
  logger: Arc<dyn Logger>,
  feedback: FeedbackSender,
  runtime: Handle,
  cancel: CancellationToken,
}

impl Dispatcher {
  pub(crate) fn new(
    registry: Arc<Registry>,
    logger: Arc<dyn Logger>,
    feedback: FeedbackSender,
    runtime: Handle,
    cancel: CancellationToken,
  ) -> Self {
    Self {
      registry,
      logger,
      feedback,
      runtime,
      cancel,
    }
  }

  /// Dispatch one event.
  ///
  /// Returns after every router has been evaluated and every matching job
  /// has been spawned; it does not wait for the jobs.
  pub fn dispatch_event(&self, event: Event) {
    if self.cancel.is_cancelled() {
      self.logger.debug(format_args!(
        "engine stopped, dropping event from trigger '{}'",
        event.trigger
      ));
      return;
    }

    let routes = self.registry.routes(&event.trigger);
    if routes.is_empty() {
      self.logger.debug(format_args!(
        "no routers bound to trigger '{}'",
        event.trigger
      ));
      return;
    }

    for route in &routes {
      if self.evaluate(route, &event.params) {
        self.spawn_jobs(&route.router, &event.params);
      }
    }
  }

  /// Run the router's selector. Errors and panics count as "no match".
  fn evaluate(&self, route: &Route, params: &Params) -> bool {
    let router = &route.router;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
      route.selector.select(params, &router.params)
    }));

    match outcome {
      Ok(Ok(true)) => true,
      Ok(Ok(false)) => {
        self.logger.debug(format_args!(
          "router '{}' rejected event from trigger '{}'",
          router.name, router.trigger
        ));
        false
      }
      Ok(Err(e)) => {
        self.logger.warn(format_args!(
          "selector '{}' failed on router '{}': {}",
          router.selector, router.name, e
        ));
        false
      }
      Err(payload) => {
        self.logger.error(format_args!(
          "selector '{}' panicked on router '{}': {}",
          router.selector,
          router.name,
          panic_message(payload.as_ref())
        ));
        false
      }
    }
  }

  fn spawn_jobs(&self, router: &Router, trigger_params: &Params) {
    for binding in self.registry.bindings(&router.name) {
      // Each job gets its own freshly merged map.
      let params = merge_params(&router.params, trigger_params, &binding.job.params);
      let span = info_span!(
        "job",
        router = %router.name,
        job = %binding.job.name,
        invocation_id = %uuid::Uuid::new_v4()
      );

      self.runtime.spawn(
        run_job(binding, params, self.logger.clone(), self.feedback.clone()).instrument(span),
      );
    }
  }
}

impl EventSink for Dispatcher {
  fn dispatch(&self, event: Event) {
    self.dispatch_event(event);
  }
}

/// Invoke one executor and queue its result.
async fn run_job(
  binding: Binding,
  params: Params,
  logger: Arc<dyn Logger>,
  feedback: FeedbackSender,
) {
  let job = &binding.job;
  let outcome = AssertUnwindSafe(binding.executor.execute(params))
    .catch_unwind()
    .await;

  match outcome {
    Ok(Ok(Some(result))) => {
      logger.debug(format_args!(
        "job '{}' on router '{}' completed with result",
        job.name, job.router
      ));
      if !feedback.send(result) {
        logger.debug(format_args!(
          "engine stopped, dropping result of job '{}'",
          job.name
        ));
      }
    }
    Ok(Ok(None)) => {
      logger.debug(format_args!(
        "job '{}' on router '{}' completed",
        job.name, job.router
      ));
    }
    Ok(Err(e)) => {
      logger.error(format_args!(
        "executor '{}' failed for job '{}' on router '{}': {}",
        job.executor, job.name, job.router, e
      ));
    }
    Err(payload) => {
      logger.error(format_args!(
        "executor '{}' panicked for job '{}' on router '{}': {}",
        job.executor,
        job.name,
        job.router,
        panic_message(payload.as_ref())
      ));
    }
  }
}
