//! Jobwire Config
//!
//! Serializable routing definitions. These describe routers and their jobs by
//! name; triggers, selectors and executors are code and are registered by the
//! embedding application before a routing definition is applied.
//!
//! ```json
//! {
//!   "routers": [
//!     {
//!       "name": "nightly",
//!       "trigger": "tick",
//!       "selector": "match",
//!       "params": { "match": { "hour": 2 } },
//!       "jobs": [
//!         { "name": "backup", "executor": "print", "params": { "target": "/srv" } }
//!       ]
//!     }
//!   ]
//! }
//! ```

mod error;
mod routing;

pub use error::ConfigError;
pub use routing::{JobDef, RouterDef, RoutingDef};
