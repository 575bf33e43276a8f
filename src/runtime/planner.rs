//! Plugin planning: load the requested plugins, pull in providers for
//! whatever they consume, and order the set so providers run first.

use std::collections::VecDeque;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::base::{Diagnostic, codes};

use super::catalog::PluginCatalog;
use super::plugin::{Plugin, PluginLoader};

pub struct PluginPlan {
    /// Plugins in execution order.
    pub ordered: Vec<Box<dyn Plugin>>,
    /// Plugins loaded only because another plugin consumes what they provide.
    pub auto_added: Vec<SmolStr>,
    pub warnings: Vec<Diagnostic>,
}

impl PluginPlan {
    pub fn names(&self) -> Vec<SmolStr> {
        self.ordered
            .iter()
            .map(|plugin| plugin.manifest().name.clone())
            .collect()
    }
}

/// Plan a run of `requested`, loading through `loader` and picking
/// providers from `catalog`.
///
/// Never fails: plugins that cannot be loaded, artifact types nobody
/// provides and dependency cycles all become warnings.
pub fn plan_plugins<S: AsRef<str>>(
    requested: &[S],
    loader: &dyn PluginLoader,
    catalog: &PluginCatalog,
) -> PluginPlan {
    let mut planner = Planner {
        loader,
        loaded: IndexMap::new(),
        failed: FxHashSet::default(),
        auto_added: Vec::new(),
        warnings: Vec::new(),
    };

    for name in requested {
        planner.ensure_loaded(name.as_ref(), false);
    }
    planner.expand(catalog);

    let Planner {
        loaded,
        auto_added,
        mut warnings,
        ..
    } = planner;
    let ordered = order_by_dependencies(loaded.into_values().collect(), &mut warnings);

    PluginPlan {
        ordered,
        auto_added,
        warnings,
    }
}

struct Planner<'a> {
    loader: &'a dyn PluginLoader,
    loaded: IndexMap<SmolStr, Box<dyn Plugin>>,
    failed: FxHashSet<SmolStr>,
    auto_added: Vec<SmolStr>,
    warnings: Vec<Diagnostic>,
}

impl Planner<'_> {
    fn ensure_loaded(&mut self, name: &str, auto: bool) {
        if self.loaded.contains_key(name) || self.failed.contains(name) {
            return;
        }
        match self.loader.load(name) {
            Ok(plugin) => {
                debug!(plugin = name, auto, "plugin loaded");
                self.loaded.insert(SmolStr::new(name), plugin);
                if auto {
                    self.auto_added.push(SmolStr::new(name));
                }
            }
            Err(err) => {
                warn!(plugin = name, error = %err, "plugin not loaded");
                self.failed.insert(SmolStr::new(name));
                self.warnings.push(
                    Diagnostic::warning(format!("plugin not loaded: {name}: {err}"))
                        .with_code(codes::PLUGIN_NOT_FOUND),
                );
            }
        }
    }

    /// Load providers until every consumed type has one, or no provider
    /// can be found.
    fn expand(&mut self, catalog: &PluginCatalog) {
        let mut reported: FxHashSet<(SmolStr, SmolStr)> = FxHashSet::default();

        loop {
            let needs: Vec<(SmolStr, SmolStr)> = self
                .loaded
                .values()
                .flat_map(|plugin| {
                    let manifest = plugin.manifest();
                    manifest
                        .consumes
                        .iter()
                        .map(move |kind| (manifest.name.clone(), kind.clone()))
                })
                .collect();

            let mut changed = false;
            for (consumer, kind) in needs {
                if self.loaded.values().any(|p| p.manifest().provides(&kind)) {
                    continue;
                }
                let Some(&pick) = catalog.providers_for(&kind).first() else {
                    if reported.insert((consumer.clone(), kind.clone())) {
                        self.warnings.push(
                            Diagnostic::warning(format!(
                                "no known plugin provides required artifact type \"{kind}\" (needed by {consumer})"
                            ))
                            .with_code(codes::NO_PROVIDER),
                        );
                    }
                    continue;
                };
                if self.loaded.contains_key(pick) || self.failed.contains(pick) {
                    continue;
                }
                self.ensure_loaded(pick, true);
                changed = true;
            }

            if !changed {
                break;
            }
        }
    }
}

/// Kahn's algorithm over "A consumes what B provides" edges. Ready plugins
/// are taken in load order. On a cycle the input order is kept.
fn order_by_dependencies(
    plugins: Vec<Box<dyn Plugin>>,
    warnings: &mut Vec<Diagnostic>,
) -> Vec<Box<dyn Plugin>> {
    let count = plugins.len();
    let mut in_degree = vec![0usize; count];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];

    for (a, consumer) in plugins.iter().enumerate() {
        let needs = &consumer.manifest().consumes;
        for (b, provider) in plugins.iter().enumerate() {
            if a == b {
                continue;
            }
            if needs.iter().any(|kind| provider.manifest().provides(kind)) {
                in_degree[a] += 1;
                dependents[b].push(a);
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..count).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(count);
    while let Some(next) = queue.pop_front() {
        order.push(next);
        for &dependent in &dependents[next] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() != count {
        warn!("plugin dependency cycle; keeping load order");
        warnings.push(
            Diagnostic::warning("plugin dependency cycle detected; falling back to input order")
                .with_code(codes::PLUGIN_CYCLE),
        );
        return plugins;
    }

    let mut slots: Vec<Option<Box<dyn Plugin>>> = plugins.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}
