use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// A set of routers with their jobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingDef {
  #[serde(default)]
  pub routers: Vec<RouterDef>,
}

/// A router: one trigger, one selector, fixed selector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterDef {
  pub name: String,
  pub trigger: String,
  pub selector: String,
  /// Passed to the selector on every evaluation and merged (lowest
  /// precedence) into every job's executor parameters.
  #[serde(default)]
  pub params: Map<String, Value>,
  #[serde(default)]
  pub jobs: Vec<JobDef>,
}

/// A job bound to its enclosing router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDef {
  pub name: String,
  pub executor: String,
  #[serde(default)]
  pub params: Map<String, Value>,
}

impl RoutingDef {
  /// Parse a routing definition from JSON.
  pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(content)?)
  }

  /// Read and parse a routing definition file.
  pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    Self::from_json_str(&content)
  }

  /// Total number of jobs across all routers.
  pub fn job_count(&self) -> usize {
    self.routers.iter().map(|r| r.jobs.len()).sum()
  }
}
