//! Built-in triggers, selectors and executors for the command-line runner.

use std::time::Duration;

use async_trait::async_trait;
use jobwire_engine::{
  CancellationToken, Emitter, Executor, ExecutorError, Params, Registry, RegistryError, Selector,
  SelectorError, Trigger, TriggerError,
};
use serde_json::Value;

/// Register every built-in under its conventional name.
pub fn register_builtins(registry: &Registry, interval: Duration) -> Result<(), RegistryError> {
  registry.add_trigger("tick", IntervalTrigger::new(interval))?;
  registry.add_selector("all", AlwaysSelector)?;
  registry.add_selector("match", MatchSelector)?;
  registry.add_executor("print", PrintExecutor)?;
  registry.add_executor("echo", EchoExecutor)?;
  Ok(())
}

/// Emits `{"tick": n}` every period, starting at 1.
pub struct IntervalTrigger {
  period: Duration,
}

impl IntervalTrigger {
  pub fn new(period: Duration) -> Self {
    Self { period }
  }
}

#[async_trait]
impl Trigger for IntervalTrigger {
  async fn run(&self, cancel: CancellationToken, emit: Emitter) -> Result<(), TriggerError> {
    if self.period.is_zero() {
      return Err(TriggerError::config("interval must be greater than zero"));
    }

    let mut interval = tokio::time::interval(self.period);
    // The first tick completes immediately.
    interval.tick().await;

    let mut n: u64 = 0;
    loop {
      tokio::select! {
        _ = cancel.cancelled() => return Ok(()),
        _ = interval.tick() => {
          n += 1;
          let mut params = Params::new();
          params.insert("tick".to_string(), Value::from(n));
          emit.emit(Some(params));
        }
      }
    }
  }
}

pub struct AlwaysSelector;

impl Selector for AlwaysSelector {
  fn select(&self, _trigger: &Params, _selector: &Params) -> Result<bool, SelectorError> {
    Ok(true)
  }
}

/// Passes when every entry of the selector's `match` object equals the
/// trigger parameter of the same key. A missing `match` passes everything.
pub struct MatchSelector;

impl Selector for MatchSelector {
  fn select(&self, trigger: &Params, selector: &Params) -> Result<bool, SelectorError> {
    let expected = match selector.get("match") {
      None => return Ok(true),
      Some(Value::Object(expected)) => expected,
      Some(other) => {
        return Err(SelectorError::failed(format!(
          "'match' must be an object, got {other}"
        )));
      }
    };

    Ok(
      expected
        .iter()
        .all(|(key, value)| trigger.get(key) == Some(value)),
    )
  }
}

/// Prints the merged parameters as one JSON line.
pub struct PrintExecutor;

#[async_trait]
impl Executor for PrintExecutor {
  async fn execute(&self, params: Params) -> Result<Option<Params>, ExecutorError> {
    println!("{}", Value::Object(params));
    Ok(None)
  }
}

/// Returns its parameters unchanged, for chaining through `exe_done`.
pub struct EchoExecutor;

#[async_trait]
impl Executor for EchoExecutor {
  async fn execute(&self, params: Params) -> Result<Option<Params>, ExecutorError> {
    Ok(Some(params))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use jobwire_engine::Event;
  use serde_json::json;
  use std::sync::Arc;
  use std::sync::Mutex;

  fn params(value: Value) -> Params {
    value.as_object().cloned().unwrap()
  }

  #[derive(Default)]
  struct Collect(Mutex<Vec<Event>>);

  impl jobwire_engine::EventSink for Collect {
    fn dispatch(&self, event: Event) {
      self.0.lock().unwrap().push(event);
    }
  }

  #[test]
  fn test_match_selector() {
    let trigger = params(json!({"env": "prod", "tick": 3}));

    assert!(MatchSelector.select(&trigger, &Params::new()).unwrap());
    assert!(
      MatchSelector
        .select(&trigger, &params(json!({"match": {"env": "prod"}})))
        .unwrap()
    );
    assert!(
      !MatchSelector
        .select(&trigger, &params(json!({"match": {"env": "dev"}})))
        .unwrap()
    );
    assert!(
      !MatchSelector
        .select(&trigger, &params(json!({"match": {"region": "eu"}})))
        .unwrap()
    );
    assert!(
      MatchSelector
        .select(&trigger, &params(json!({"match": "env"})))
        .is_err()
    );
  }

  #[tokio::test]
  async fn test_echo_returns_params() {
    let input = params(json!({"a": 1}));
    let result = EchoExecutor.execute(input.clone()).await.unwrap();
    assert_eq!(result, Some(input));
  }

  #[tokio::test]
  async fn test_print_returns_nothing() {
    assert_eq!(PrintExecutor.execute(Params::new()).await.unwrap(), None);
  }

  #[tokio::test(start_paused = true)]
  async fn test_interval_trigger_counts_ticks() {
    let sink = Arc::new(Collect::default());
    let emitter = Emitter::new("tick", sink.clone());
    let cancel = CancellationToken::new();

    let trigger = IntervalTrigger::new(Duration::from_secs(1));
    let task = tokio::spawn({
      let cancel = cancel.clone();
      async move { trigger.run(cancel, emitter).await }
    });

    tokio::time::sleep(Duration::from_millis(3500)).await;
    cancel.cancel();
    task.await.unwrap().unwrap();

    let events = sink.0.lock().unwrap();
    let ticks: Vec<_> = events.iter().map(|e| e.params["tick"].clone()).collect();
    assert_eq!(ticks, vec![json!(1), json!(2), json!(3)]);
    assert!(events.iter().all(|e| e.trigger == "tick"));
  }

  #[tokio::test]
  async fn test_interval_trigger_rejects_zero_period() {
    let sink = Arc::new(Collect::default());
    let result = IntervalTrigger::new(Duration::ZERO)
      .run(CancellationToken::new(), Emitter::new("tick", sink))
      .await;
    assert!(matches!(result, Err(TriggerError::Config { .. })));
  }

  #[test]
  fn test_register_builtins() {
    let registry = Registry::new();
    register_builtins(&registry, Duration::from_secs(1)).unwrap();
    assert!(registry.trigger("tick").is_some());
    assert!(registry.selector("match").is_some());
    assert!(registry.executor("echo").is_some());
  }
}
