//! Stub plugins shared by the engine integration tests.

#![allow(dead_code)]

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jobwire_engine::{
  CancellationToken, Emitter, Executor, ExecutorError, Logger, Params, Selector, SelectorError,
  Trigger, TriggerError,
};
use tokio::sync::mpsc;

pub const WAIT: Duration = Duration::from_secs(2);

pub fn params(value: serde_json::Value) -> Params {
  value.as_object().cloned().expect("params must be a json object")
}

/// Receive one value or fail after [`WAIT`].
pub async fn recv<T>(receiver: &mut mpsc::UnboundedReceiver<T>) -> T {
  tokio::time::timeout(WAIT, receiver.recv())
    .await
    .expect("timed out waiting for value")
    .expect("channel closed")
}

/// Assert nothing arrives within `ms` milliseconds.
pub async fn assert_silent<T: fmt::Debug>(receiver: &mut mpsc::UnboundedReceiver<T>, ms: u64) {
  tokio::time::sleep(Duration::from_millis(ms)).await;
  if let Ok(value) = receiver.try_recv() {
    panic!("expected no value, got {value:?}");
  }
}

/// Emits one event when started, then waits for cancellation.
pub struct OnceTrigger {
  pub params: Option<Params>,
  pub starts: Arc<AtomicUsize>,
}

impl OnceTrigger {
  pub fn new(params: Option<Params>) -> (Self, Arc<AtomicUsize>) {
    let starts = Arc::new(AtomicUsize::new(0));
    (
      Self {
        params,
        starts: starts.clone(),
      },
      starts,
    )
  }
}

#[async_trait]
impl Trigger for OnceTrigger {
  async fn run(&self, cancel: CancellationToken, emit: Emitter) -> Result<(), TriggerError> {
    self.starts.fetch_add(1, Ordering::SeqCst);
    emit.emit(self.params.clone());
    cancel.cancelled().await;
    Ok(())
  }
}

/// Emits each parameter set in order, then waits for cancellation.
pub struct SequenceTrigger {
  pub events: Vec<Params>,
}

#[async_trait]
impl Trigger for SequenceTrigger {
  async fn run(&self, cancel: CancellationToken, emit: Emitter) -> Result<(), TriggerError> {
    for params in &self.events {
      emit.emit(Some(params.clone()));
    }
    cancel.cancelled().await;
    Ok(())
  }
}

/// Emits every `period` until cancelled, counting emissions.
pub struct CountingTrigger {
  pub period: Duration,
  pub count: Arc<AtomicUsize>,
}

#[async_trait]
impl Trigger for CountingTrigger {
  async fn run(&self, cancel: CancellationToken, emit: Emitter) -> Result<(), TriggerError> {
    loop {
      tokio::select! {
        _ = cancel.cancelled() => return Ok(()),
        _ = tokio::time::sleep(self.period) => {
          self.count.fetch_add(1, Ordering::SeqCst);
          emit.emit(None);
        }
      }
    }
  }
}

/// Hands its emitter out, then waits for cancellation.
pub struct LeakingTrigger {
  pub slot: Arc<Mutex<Option<Emitter>>>,
}

#[async_trait]
impl Trigger for LeakingTrigger {
  async fn run(&self, cancel: CancellationToken, emit: Emitter) -> Result<(), TriggerError> {
    *self.slot.lock().unwrap() = Some(emit);
    cancel.cancelled().await;
    Ok(())
  }
}

/// Takes `linger` to wind down after cancellation.
pub struct LingeringTrigger {
  pub linger: Duration,
}

#[async_trait]
impl Trigger for LingeringTrigger {
  async fn run(&self, cancel: CancellationToken, _emit: Emitter) -> Result<(), TriggerError> {
    cancel.cancelled().await;
    tokio::time::sleep(self.linger).await;
    Ok(())
  }
}

pub struct PanickingTrigger;

#[async_trait]
impl Trigger for PanickingTrigger {
  async fn run(&self, _cancel: CancellationToken, _emit: Emitter) -> Result<(), TriggerError> {
    panic!("trigger exploded");
  }
}

pub struct FailingTrigger;

#[async_trait]
impl Trigger for FailingTrigger {
  async fn run(&self, _cancel: CancellationToken, _emit: Emitter) -> Result<(), TriggerError> {
    Err(TriggerError::runtime("source unavailable"))
  }
}

/// Returns a fixed answer and reports every call.
pub struct RecordingSelector {
  pub answer: bool,
  pub calls: mpsc::UnboundedSender<(Params, Params)>,
}

impl RecordingSelector {
  pub fn new(answer: bool) -> (Self, mpsc::UnboundedReceiver<(Params, Params)>) {
    let (calls, receiver) = mpsc::unbounded_channel();
    (Self { answer, calls }, receiver)
  }
}

impl Selector for RecordingSelector {
  fn select(&self, trigger: &Params, selector: &Params) -> Result<bool, SelectorError> {
    let _ = self.calls.send((trigger.clone(), selector.clone()));
    Ok(self.answer)
  }
}

pub struct Always;

impl Selector for Always {
  fn select(&self, _trigger: &Params, _selector: &Params) -> Result<bool, SelectorError> {
    Ok(true)
  }
}

pub struct FailingSelector;

impl Selector for FailingSelector {
  fn select(&self, _trigger: &Params, _selector: &Params) -> Result<bool, SelectorError> {
    Err(SelectorError::failed("bad window"))
  }
}

pub struct PanickingSelector;

impl Selector for PanickingSelector {
  fn select(&self, _trigger: &Params, _selector: &Params) -> Result<bool, SelectorError> {
    panic!("selector exploded");
  }
}

/// Reports the parameters it receives and returns a fixed result.
pub struct RecordingExecutor {
  pub result: Option<Params>,
  pub delay: Option<Duration>,
  pub calls: mpsc::UnboundedSender<Params>,
}

impl RecordingExecutor {
  pub fn new(result: Option<Params>) -> (Self, mpsc::UnboundedReceiver<Params>) {
    let (calls, receiver) = mpsc::unbounded_channel();
    (
      Self {
        result,
        delay: None,
        calls,
      },
      receiver,
    )
  }

  pub fn slow(delay: Duration) -> (Self, mpsc::UnboundedReceiver<Params>) {
    let (mut executor, receiver) = Self::new(None);
    executor.delay = Some(delay);
    (executor, receiver)
  }
}

#[async_trait]
impl Executor for RecordingExecutor {
  async fn execute(&self, params: Params) -> Result<Option<Params>, ExecutorError> {
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
    let _ = self.calls.send(params);
    Ok(self.result.clone())
  }
}

pub struct FailingExecutor;

#[async_trait]
impl Executor for FailingExecutor {
  async fn execute(&self, _params: Params) -> Result<Option<Params>, ExecutorError> {
    Err(ExecutorError::failed("disk full"))
  }
}

pub struct PanickingExecutor;

#[async_trait]
impl Executor for PanickingExecutor {
  async fn execute(&self, _params: Params) -> Result<Option<Params>, ExecutorError> {
    panic!("executor exploded");
  }
}

/// Collects log lines for assertions.
#[derive(Default)]
pub struct BufferLogger {
  lines: Mutex<Vec<String>>,
}

impl BufferLogger {
  pub fn lines(&self) -> Vec<String> {
    self.lines.lock().unwrap().clone()
  }

  pub fn contains(&self, needle: &str) -> bool {
    self.lines().iter().any(|line| line.contains(needle))
  }

  fn push(&self, level: &str, args: fmt::Arguments<'_>) {
    self.lines.lock().unwrap().push(format!("{level} {args}"));
  }
}

impl Logger for BufferLogger {
  fn debug(&self, args: fmt::Arguments<'_>) {
    self.push("DEBUG", args);
  }
  fn info(&self, args: fmt::Arguments<'_>) {
    self.push("INFO", args);
  }
  fn warn(&self, args: fmt::Arguments<'_>) {
    self.push("WARN", args);
  }
  fn error(&self, args: fmt::Arguments<'_>) {
    self.push("ERROR", args);
  }
}
