mod entry;
mod error;
mod registry;
mod routing;

pub use entry::{Binding, EntryKind, Job, Route, Router};
pub use error::RegistryError;
pub use registry::Registry;
