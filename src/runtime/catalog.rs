//! Static catalog of known plugins.
//!
//! The catalog answers two questions: which plugin provides an artifact
//! type, and how to instantiate a plugin by name. It is the default
//! [`PluginLoader`].

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::builtin::{DocgenPlugin, IrJsonPlugin};
use super::plugin::{LoadError, Plugin, PluginLoader, PluginManifest};

pub type PluginFactory = Box<dyn Fn() -> Result<Box<dyn Plugin>, LoadError>>;

pub struct CatalogEntry {
    pub manifest: PluginManifest,
    factory: PluginFactory,
}

/// Plugins in registration order, keyed by name.
#[derive(Default)]
pub struct PluginCatalog {
    entries: IndexMap<SmolStr, CatalogEntry>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the built-in `docgen` and `ir-json` plugins.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(DocgenPlugin::describe(), || Box::new(DocgenPlugin::new()));
        catalog.register(IrJsonPlugin::describe(), || Box::new(IrJsonPlugin::new()));
        catalog
    }

    /// Register an infallible factory. Replaces any entry of the same name.
    pub fn register(
        &mut self,
        manifest: PluginManifest,
        factory: impl Fn() -> Box<dyn Plugin> + 'static,
    ) {
        self.register_fallible(manifest, move || Ok(factory()));
    }

    pub fn register_fallible(
        &mut self,
        manifest: PluginManifest,
        factory: impl Fn() -> Result<Box<dyn Plugin>, LoadError> + 'static,
    ) {
        self.entries.insert(
            manifest.name.clone(),
            CatalogEntry {
                manifest,
                factory: Box::new(factory),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&PluginManifest> {
        self.entries.get(name).map(|entry| &entry.manifest)
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names of plugins whose manifest provides `kind`, in registration order.
    pub fn providers_for(&self, kind: &str) -> Vec<&str> {
        self.entries
            .values()
            .filter(|entry| entry.manifest.provides(kind))
            .map(|entry| entry.manifest.name.as_str())
            .collect()
    }

    /// All plugin names (sorted).
    pub fn list_plugins(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.keys().map(|n| n.to_string()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PluginLoader for PluginCatalog {
    fn load(&self, name: &str) -> Result<Box<dyn Plugin>, LoadError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| LoadError::NotFound(name.to_string()))?;
        let plugin = (entry.factory)()?;
        if plugin.name() != name {
            return Err(LoadError::NameMismatch {
                requested: name.to_string(),
                actual: plugin.name().to_string(),
            });
        }
        Ok(plugin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::plugin::{PluginContext, PluginError};

    struct Named(PluginManifest);

    impl Plugin for Named {
        fn manifest(&self) -> &PluginManifest {
            &self.0
        }

        fn run(&self, _ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
            Ok(())
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = PluginCatalog::builtin();
        assert_eq!(catalog.list_plugins(), vec!["docgen", "ir-json"]);
        assert_eq!(catalog.providers_for("docgen/ir"), vec!["docgen"]);
        assert_eq!(catalog.providers_for("file/json"), vec!["ir-json"]);
        assert!(catalog.providers_for("file/pdf").is_empty());
        assert!(catalog.get("ir-json").unwrap().consumes("docgen/ir"));
    }

    #[test]
    fn test_load_by_name() {
        let catalog = PluginCatalog::builtin();
        assert_eq!(catalog.load("docgen").unwrap().name(), "docgen");
        assert_eq!(
            catalog.load("pdf").err(),
            Some(LoadError::NotFound("pdf".to_string()))
        );
    }

    #[test]
    fn test_load_rejects_mismatched_manifest() {
        let mut catalog = PluginCatalog::new();
        catalog.register(PluginManifest::new("alias"), || {
            Box::new(Named(PluginManifest::new("real")))
        });

        assert!(matches!(
            catalog.load("alias").err(),
            Some(LoadError::NameMismatch { .. })
        ));
    }

    #[test]
    fn test_failing_factory() {
        let mut catalog = PluginCatalog::new();
        catalog.register_fallible(PluginManifest::new("broken"), || {
            Err(LoadError::Factory {
                name: "broken".to_string(),
                reason: "missing runtime".to_string(),
            })
        });

        let err = catalog.load("broken").err().unwrap();
        assert_eq!(err.to_string(), "plugin \"broken\" failed to load: missing runtime");
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut catalog = PluginCatalog::new();
        catalog.register(PluginManifest::new("x").with_provides(["a"]), || {
            Box::new(Named(PluginManifest::new("x")))
        });
        catalog.register(PluginManifest::new("x").with_provides(["b"]), || {
            Box::new(Named(PluginManifest::new("x")))
        });

        assert_eq!(catalog.len(), 1);
        assert!(catalog.providers_for("a").is_empty());
        assert_eq!(catalog.providers_for("b"), vec!["x"]);
    }
}
