//! Parameter sets.

/// A mapping of string keys to arbitrary values.
///
/// Used for trigger output, router selector configuration, job executor
/// configuration and executor results alike.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Merge the three parameter layers handed to an executor.
///
/// Later layers win on key collision: `executor` overrides `trigger`, which
/// overrides `selector`. Always returns a fresh map.
pub fn merge_params(selector: &Params, trigger: &Params, executor: &Params) -> Params {
  let mut merged = Params::with_capacity(selector.len() + trigger.len() + executor.len());

  for layer in [selector, trigger, executor] {
    for (key, value) in layer {
      merged.insert(key.clone(), value.clone());
    }
  }

  merged
}
