//! State shared by command handlers while one document is dispatched.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::base::Diagnostics;
use crate::config::ConfigBuilder;
use crate::project::{DocumentInfo, ProjectGraph};
use crate::semantic::SymbolTable;

/// A binary resource referenced by a document (image, attachment, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    pub id: String,
    pub mime: String,
    pub path: Option<PathBuf>,
    #[serde(skip)]
    pub bytes: Option<Vec<u8>>,
    pub meta: Map<String, Value>,
}

impl Asset {
    pub fn new(id: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mime: mime.into(),
            path: None,
            bytes: None,
            meta: Map::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.bytes = Some(bytes);
        self
    }
}

/// Assets keyed by id; a later `put` with the same id wins.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    assets: IndexMap<String, Asset>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, asset: Asset) {
        self.assets.insert(asset.id.clone(), asset);
    }

    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.assets.contains_key(id)
    }

    /// Assets in first-insertion order.
    pub fn all(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

pub struct ExecuteContext<'a> {
    pub graph: &'a ProjectGraph,
    pub symbols: &'a SymbolTable,
    pub diagnostics: &'a mut Diagnostics,
    pub assets: &'a mut AssetStore,
    /// The document being dispatched.
    pub current_doc: &'a DocumentInfo,
    /// Configuration accumulator; moved in and out around a dispatch.
    pub config: ConfigBuilder,
}

impl<'a> ExecuteContext<'a> {
    pub fn new(
        graph: &'a ProjectGraph,
        symbols: &'a SymbolTable,
        diagnostics: &'a mut Diagnostics,
        assets: &'a mut AssetStore,
        current_doc: &'a DocumentInfo,
    ) -> Self {
        Self {
            graph,
            symbols,
            diagnostics,
            assets,
            current_doc,
            config: ConfigBuilder::new(),
        }
    }

    pub fn with_config(mut self, config: ConfigBuilder) -> Self {
        self.config = config;
        self
    }

    pub fn into_config(self) -> ConfigBuilder {
        self.config
    }
}
