//! End-to-end build: project graph, symbols, configuration, plugin plan and
//! plugin run.

use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;
use tracing::{debug, info};

use crate::base::Diagnostics;
use crate::config::{Config, EngineConfig};
use crate::execute::collect_config;
use crate::project::{FileSystem, GraphError, GraphOptions, ImportResolverOptions, ProjectGraph, ProjectGraphBuilder};
use crate::runtime::{ArtifactStore, Host, PluginCatalog, RunInputs, plan_plugins, run_plugins};
use crate::semantic::{SymbolOptions, SymbolTable};

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub entry: PathBuf,
    pub resolver: ImportResolverOptions,
    pub graph: GraphOptions,
    pub symbols: SymbolOptions,
    /// Plugins to run. When empty, the `plugins` key of the folded config
    /// decides.
    pub plugins: Vec<String>,
}

impl BuildOptions {
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            ..Self::default()
        }
    }

    pub fn with_resolver(mut self, resolver: ImportResolverOptions) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_graph(mut self, graph: GraphOptions) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_symbols(mut self, symbols: SymbolOptions) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_plugins<I, S>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plugins = plugins.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A loaded project, before any plugin runs.
#[derive(Debug)]
pub struct LoadedProject {
    pub graph: ProjectGraph,
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub ordered: Vec<SmolStr>,
    pub auto_added: Vec<SmolStr>,
}

#[derive(Debug)]
pub struct BuildOutcome {
    pub graph: ProjectGraph,
    pub symbols: SymbolTable,
    pub config: Config,
    pub engine: EngineConfig,
    pub plan: PlanSummary,
    pub artifacts: ArtifactStore,
    /// Every diagnostic of the build, in phase order.
    pub diagnostics: Diagnostics,
}

impl BuildOutcome {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Build the project graph and symbol table for `options.entry`.
pub fn load_project(fs: &dyn FileSystem, options: &BuildOptions) -> Result<LoadedProject, BuildError> {
    let mut diagnostics = Diagnostics::new();
    let graph = ProjectGraphBuilder::new(fs)
        .with_resolver_options(options.resolver.clone())
        .with_options(options.graph.clone())
        .build(&options.entry, &mut diagnostics)?;
    let symbols = SymbolTable::build(graph.documents.values(), options.symbols, &mut diagnostics);

    Ok(LoadedProject {
        graph,
        symbols,
        diagnostics,
    })
}

/// Load the project, fold its configuration, then plan and run plugins.
///
/// Only a missing entry file (or a cycle under [`CyclePolicy::Fail`]) is
/// an `Err`; every other problem ends up in the outcome's diagnostics.
///
/// [`CyclePolicy::Fail`]: crate::project::CyclePolicy::Fail
pub fn build_project(
    fs: &dyn FileSystem,
    host: &dyn Host,
    catalog: &PluginCatalog,
    options: &BuildOptions,
) -> Result<BuildOutcome, BuildError> {
    let LoadedProject {
        graph,
        symbols,
        mut diagnostics,
    } = load_project(fs, options)?;

    let config = collect_config(&graph, &symbols, &mut diagnostics);
    let engine = EngineConfig::from_config(&config);

    let requested: &[String] = if options.plugins.is_empty() {
        &engine.plugins
    } else {
        &options.plugins
    };
    let plan = plan_plugins(requested, catalog, catalog);
    let summary = PlanSummary {
        ordered: plan.names(),
        auto_added: plan.auto_added.clone(),
    };
    info!(plugins = ?summary.ordered, auto_added = ?summary.auto_added, "plugin plan");
    diagnostics.extend(plan.warnings.iter().cloned());

    let outcome = run_plugins(
        &plan.ordered,
        RunInputs {
            entry_file: &graph.entry_file,
            project: &graph,
            symbols: &symbols,
            host,
            config: &config,
        },
    );
    diagnostics.extend(outcome.diagnostics);
    debug!(
        artifacts = outcome.artifacts.len(),
        diagnostics = diagnostics.len(),
        "build finished"
    );

    Ok(BuildOutcome {
        graph,
        symbols,
        config,
        engine,
        plan: summary,
        artifacts: outcome.artifacts,
        diagnostics,
    })
}
