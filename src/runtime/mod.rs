//! Plugin runtime: an artifact store shared by plugins, a catalog of known
//! plugins, the planner that orders them by what they provide and consume,
//! and the runner that executes them in isolation from each other.

pub mod artifact;
pub mod builtin;
pub mod catalog;
pub mod host;
pub mod planner;
pub mod plugin;
pub mod runner;

pub use artifact::{Artifact, ArtifactStore};
pub use builtin::{DocgenPlugin, IrJsonPlugin, WrittenFile};
pub use catalog::{CatalogEntry, PluginCatalog, PluginFactory};
pub use host::{DiskHost, Host, HostError, MemoryHost};
pub use planner::{PluginPlan, plan_plugins};
pub use plugin::{LoadError, Plugin, PluginContext, PluginError, PluginLoader, PluginManifest};
pub use runner::{RunInputs, RunOutcome, run_plugins};

#[cfg(test)]
mod tests;
