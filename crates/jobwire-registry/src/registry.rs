//! The registry of named entries.
//!
//! All maps sit behind a single `RwLock`, so a router or job added while
//! dispatch is running becomes visible atomically. Entries are immutable once
//! registered and are handed out as `Arc`s; callers never hold the lock while
//! invoking a selector or executor.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use jobwire_core::{Executor, FEEDBACK_TRIGGER, Params, Selector, Trigger};

use crate::entry::{Binding, EntryKind, Job, Route, Router};
use crate::error::RegistryError;

#[derive(Default)]
pub(crate) struct Entries {
  triggers: HashMap<String, Arc<dyn Trigger>>,
  selectors: HashMap<String, Arc<dyn Selector>>,
  executors: HashMap<String, Arc<dyn Executor>>,
  routers: HashMap<String, Arc<Router>>,
  /// Trigger name -> routers bound to it.
  routes: HashMap<String, Vec<Arc<Router>>>,
  /// Router name -> jobs bound to it.
  jobs: HashMap<String, Vec<Arc<Job>>>,
}

impl Entries {
  pub(crate) fn has_router(&self, name: &str) -> bool {
    self.routers.contains_key(name)
  }

  /// Validate references of a new router. Does not check its name.
  pub(crate) fn check_router_refs(&self, trigger: &str, selector: &str) -> Result<(), RegistryError> {
    if trigger != FEEDBACK_TRIGGER && !self.triggers.contains_key(trigger) {
      return Err(RegistryError::UnknownTrigger {
        name: trigger.to_string(),
      });
    }
    if !self.selectors.contains_key(selector) {
      return Err(RegistryError::UnknownSelector {
        name: selector.to_string(),
      });
    }
    Ok(())
  }

  pub(crate) fn check_executor(&self, executor: &str) -> Result<(), RegistryError> {
    if self.executors.contains_key(executor) {
      Ok(())
    } else {
      Err(RegistryError::UnknownExecutor {
        name: executor.to_string(),
      })
    }
  }

  pub(crate) fn has_job(&self, router: &str, job: &str) -> bool {
    self
      .jobs
      .get(router)
      .is_some_and(|jobs| jobs.iter().any(|j| j.name == job))
  }

  pub(crate) fn insert_router(&mut self, router: Router) {
    let router = Arc::new(router);
    self
      .routes
      .entry(router.trigger.clone())
      .or_default()
      .push(router.clone());
    self.routers.insert(router.name.clone(), router);
  }

  pub(crate) fn insert_job(&mut self, job: Job) {
    self
      .jobs
      .entry(job.router.clone())
      .or_default()
      .push(Arc::new(job));
  }
}

/// Holds every named trigger, selector, executor, router and job.
///
/// Shared as `Arc<Registry>` between the embedding application and the
/// engine. Registration is allowed before and after the engine starts.
#[derive(Default)]
pub struct Registry {
  entries: RwLock<Entries>,
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  // Entries are never mutated in place, so a poisoned lock still guards
  // consistent maps.
  fn read(&self) -> RwLockReadGuard<'_, Entries> {
    self.entries.read().unwrap_or_else(PoisonError::into_inner)
  }

  pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Entries> {
    self.entries.write().unwrap_or_else(PoisonError::into_inner)
  }

  /// Register a trigger. The feedback trigger name is reserved.
  pub fn add_trigger<T: Trigger + 'static>(
    &self,
    name: impl Into<String>,
    trigger: T,
  ) -> Result<(), RegistryError> {
    let name = name.into();
    if name == FEEDBACK_TRIGGER {
      return Err(RegistryError::ReservedName { name });
    }

    let mut entries = self.write();
    if entries.triggers.contains_key(&name) {
      return Err(RegistryError::AlreadyExists {
        kind: EntryKind::Trigger,
        name,
      });
    }
    entries.triggers.insert(name, Arc::new(trigger));
    Ok(())
  }

  pub fn add_selector<S: Selector + 'static>(
    &self,
    name: impl Into<String>,
    selector: S,
  ) -> Result<(), RegistryError> {
    let name = name.into();
    let mut entries = self.write();
    if entries.selectors.contains_key(&name) {
      return Err(RegistryError::AlreadyExists {
        kind: EntryKind::Selector,
        name,
      });
    }
    entries.selectors.insert(name, Arc::new(selector));
    Ok(())
  }

  pub fn add_executor<E: Executor + 'static>(
    &self,
    name: impl Into<String>,
    executor: E,
  ) -> Result<(), RegistryError> {
    let name = name.into();
    let mut entries = self.write();
    if entries.executors.contains_key(&name) {
      return Err(RegistryError::AlreadyExists {
        kind: EntryKind::Executor,
        name,
      });
    }
    entries.executors.insert(name, Arc::new(executor));
    Ok(())
  }

  /// Register a router binding `trigger` to `selector`.
  ///
  /// `trigger` may be `exe_done` to listen for executor results.
  pub fn add_router(
    &self,
    name: impl Into<String>,
    trigger: impl Into<String>,
    selector: impl Into<String>,
    params: Params,
  ) -> Result<(), RegistryError> {
    let name = name.into();
    let trigger = trigger.into();
    let selector = selector.into();

    let mut entries = self.write();
    if entries.has_router(&name) {
      return Err(RegistryError::AlreadyExists {
        kind: EntryKind::Router,
        name,
      });
    }
    entries.check_router_refs(&trigger, &selector)?;
    entries.insert_router(Router {
      name,
      trigger,
      selector,
      params,
    });
    Ok(())
  }

  /// Register a job under an existing router.
  ///
  /// Job names are unique per router; different routers may reuse a name.
  pub fn add_router_job(
    &self,
    router: impl Into<String>,
    job: impl Into<String>,
    executor: impl Into<String>,
    params: Params,
  ) -> Result<(), RegistryError> {
    let router = router.into();
    let job = job.into();
    let executor = executor.into();

    let mut entries = self.write();
    if !entries.has_router(&router) {
      return Err(RegistryError::UnknownRouter { name: router });
    }
    if entries.has_job(&router, &job) {
      return Err(RegistryError::JobAlreadyExists { router, job });
    }
    entries.check_executor(&executor)?;
    entries.insert_job(Job {
      name: job,
      router,
      executor,
      params,
    });
    Ok(())
  }

  pub fn trigger(&self, name: &str) -> Option<Arc<dyn Trigger>> {
    self.read().triggers.get(name).cloned()
  }

  pub fn selector(&self, name: &str) -> Option<Arc<dyn Selector>> {
    self.read().selectors.get(name).cloned()
  }

  pub fn executor(&self, name: &str) -> Option<Arc<dyn Executor>> {
    self.read().executors.get(name).cloned()
  }

  pub fn router(&self, name: &str) -> Option<Arc<Router>> {
    self.read().routers.get(name).cloned()
  }

  pub fn job(&self, router: &str, job: &str) -> Option<Arc<Job>> {
    self
      .read()
      .jobs
      .get(router)
      .and_then(|jobs| jobs.iter().find(|j| j.name == job).cloned())
  }

  /// Snapshot of all registered triggers.
  pub fn triggers(&self) -> Vec<(String, Arc<dyn Trigger>)> {
    self
      .read()
      .triggers
      .iter()
      .map(|(name, trigger)| (name.clone(), trigger.clone()))
      .collect()
  }

  /// Routers bound to `trigger`, each with its selector resolved.
  pub fn routes(&self, trigger: &str) -> Vec<Route> {
    let entries = self.read();
    let Some(routers) = entries.routes.get(trigger) else {
      return Vec::new();
    };

    routers
      .iter()
      .filter_map(|router| {
        entries.selectors.get(&router.selector).map(|selector| Route {
          router: router.clone(),
          selector: selector.clone(),
        })
      })
      .collect()
  }

  /// Jobs bound to `router`, each with its executor resolved.
  pub fn bindings(&self, router: &str) -> Vec<Binding> {
    let entries = self.read();
    let Some(jobs) = entries.jobs.get(router) else {
      return Vec::new();
    };

    jobs
      .iter()
      .filter_map(|job| {
        entries.executors.get(&job.executor).map(|executor| Binding {
          job: job.clone(),
          executor: executor.clone(),
        })
      })
      .collect()
  }
}
