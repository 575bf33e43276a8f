//! The plugin contract: manifests, the run context and loading.

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::{Diagnostics, FileId};
use crate::config::Config;
use crate::project::ProjectGraph;
use crate::semantic::SymbolTable;

use super::artifact::ArtifactStore;
use super::host::{Host, HostError};

/// What a plugin is called, which artifact types it provides and which it
/// consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginManifest {
    pub name: SmolStr,
    pub provides: Vec<SmolStr>,
    pub consumes: Vec<SmolStr>,
}

impl PluginManifest {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            provides: Vec::new(),
            consumes: Vec::new(),
        }
    }

    pub fn with_provides<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.provides.extend(kinds.into_iter().map(Into::into));
        self
    }

    pub fn with_consumes<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.consumes.extend(kinds.into_iter().map(Into::into));
        self
    }

    pub fn provides(&self, kind: &str) -> bool {
        self.provides.iter().any(|k| k == kind)
    }

    pub fn consumes(&self, kind: &str) -> bool {
        self.consumes.iter().any(|k| k == kind)
    }
}

/// Everything a plugin may read or write during its run.
///
/// The artifact store and diagnostics are shared by every plugin of a
/// build; the rest is read-only.
pub struct PluginContext<'a> {
    pub artifacts: &'a mut ArtifactStore,
    pub diagnostics: &'a mut Diagnostics,
    pub entry_file: &'a FileId,
    pub project: &'a ProjectGraph,
    pub symbols: &'a SymbolTable,
    pub host: &'a dyn Host,
    /// The folded project configuration.
    pub config: &'a Config,
}

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PluginError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("no plugin named \"{0}\"")]
    NotFound(String),

    #[error("plugin \"{name}\" failed to load: {reason}")]
    Factory { name: String, reason: String },

    #[error("plugin \"{requested}\" identifies itself as \"{actual}\"")]
    NameMismatch { requested: String, actual: String },
}

pub trait Plugin {
    fn manifest(&self) -> &PluginManifest;

    fn run(&self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError>;

    fn name(&self) -> &str {
        &self.manifest().name
    }
}

/// Resolves plugin names to instances.
pub trait PluginLoader {
    fn load(&self, name: &str) -> Result<Box<dyn Plugin>, LoadError>;
}
