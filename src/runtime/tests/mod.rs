#![allow(clippy::unwrap_used)]

mod tests_runner;

use std::cell::RefCell;
use std::rc::Rc;

use crate::base::Diagnostics;
use crate::project::{MemoryFs, ProjectGraph, ProjectGraphBuilder};
use crate::semantic::{SymbolOptions, SymbolTable};

use super::artifact::Artifact;
use super::catalog::PluginCatalog;
use super::plugin::{Plugin, PluginContext, PluginError, PluginManifest};

/// What a [`StubPlugin`] does when run.
#[derive(Clone, Copy)]
enum Behavior {
    /// Add one artifact per provided type.
    Provide,
    Fail,
    Panic,
}

struct StubPlugin {
    manifest: PluginManifest,
    behavior: Behavior,
    /// Shared log of plugin names in run order.
    log: Rc<RefCell<Vec<String>>>,
}

impl Plugin for StubPlugin {
    fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    fn run(&self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        self.log.borrow_mut().push(self.manifest.name.to_string());
        match self.behavior {
            Behavior::Provide => {
                for kind in &self.manifest.provides {
                    ctx.artifacts.add(Artifact::new(kind.clone(), self.manifest.name.to_string()));
                }
                Ok(())
            }
            Behavior::Fail => Err(PluginError::failed("boom")),
            Behavior::Panic => panic!("kaboom"),
        }
    }
}

fn manifest(name: &str, provides: &[&str], consumes: &[&str]) -> PluginManifest {
    PluginManifest::new(name)
        .with_provides(provides.iter().copied())
        .with_consumes(consumes.iter().copied())
}

/// Catalog of [`StubPlugin`]s that all log into `log`.
fn stub_catalog(
    plugins: &[(PluginManifest, Behavior)],
    log: &Rc<RefCell<Vec<String>>>,
) -> PluginCatalog {
    let mut catalog = PluginCatalog::new();
    for (manifest, behavior) in plugins {
        let (manifest, behavior, log) = (manifest.clone(), *behavior, Rc::clone(log));
        catalog.register(manifest.clone(), move || {
            Box::new(StubPlugin {
                manifest: manifest.clone(),
                behavior,
                log: Rc::clone(&log),
            })
        });
    }
    catalog
}

struct Project {
    graph: ProjectGraph,
    symbols: SymbolTable,
}

fn project(files: &[(&str, &str)]) -> Project {
    let mut fs = MemoryFs::new();
    for (path, text) in files {
        fs.insert(path, *text);
    }
    let mut diagnostics = Diagnostics::new();
    let graph = ProjectGraphBuilder::new(&fs)
        .build(files[0].0, &mut diagnostics)
        .unwrap();
    let symbols = SymbolTable::build(graph.documents.values(), SymbolOptions::default(), &mut diagnostics);
    Project { graph, symbols }
}
