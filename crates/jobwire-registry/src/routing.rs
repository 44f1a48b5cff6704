//! Applying declarative routing definitions.

use std::collections::HashSet;

use jobwire_config::RoutingDef;

use crate::entry::{EntryKind, Job, Router};
use crate::error::RegistryError;
use crate::registry::Registry;

impl Registry {
  /// Register every router and job in `def`.
  ///
  /// The whole definition is validated under one write lock before anything
  /// is inserted: either all entries are added or none are.
  pub fn apply_routing(&self, def: &RoutingDef) -> Result<(), RegistryError> {
    let mut entries = self.write();

    let mut router_names = HashSet::new();
    for router in &def.routers {
      if entries.has_router(&router.name) || !router_names.insert(router.name.as_str()) {
        return Err(RegistryError::AlreadyExists {
          kind: EntryKind::Router,
          name: router.name.clone(),
        });
      }
      entries.check_router_refs(&router.trigger, &router.selector)?;

      let mut job_names = HashSet::new();
      for job in &router.jobs {
        if !job_names.insert(job.name.as_str()) {
          return Err(RegistryError::JobAlreadyExists {
            router: router.name.clone(),
            job: job.name.clone(),
          });
        }
        entries.check_executor(&job.executor)?;
      }
    }

    for router in &def.routers {
      entries.insert_router(Router {
        name: router.name.clone(),
        trigger: router.trigger.clone(),
        selector: router.selector.clone(),
        params: router.params.clone(),
      });
      for job in &router.jobs {
        entries.insert_job(Job {
          name: job.name.clone(),
          router: router.name.clone(),
          executor: job.executor.clone(),
          params: job.params.clone(),
        });
      }
    }

    Ok(())
  }
}
