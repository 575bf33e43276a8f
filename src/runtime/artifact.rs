//! Append-only store of typed plugin outputs.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::FileId;

/// One plugin output. `data` is opaque; consumers downcast it.
#[derive(Clone)]
pub struct Artifact {
    /// Artifact type, e.g. `docgen/ir`.
    pub kind: SmolStr,
    pub data: Arc<dyn Any + Send + Sync>,
    pub source_file: Option<FileId>,
}

impl Artifact {
    pub fn new<T: Any + Send + Sync>(kind: impl Into<SmolStr>, data: T) -> Self {
        Self {
            kind: kind.into(),
            data: Arc::new(data),
            source_file: None,
        }
    }

    pub fn with_source_file(mut self, file: FileId) -> Self {
        self.source_file = Some(file);
        self
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.data.is::<T>()
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("kind", &self.kind)
            .field("source_file", &self.source_file)
            .finish_non_exhaustive()
    }
}

/// Artifacts in insertion order. There is no removal.
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    items: Vec<Artifact>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, artifact: Artifact) {
        self.items.push(artifact);
    }

    pub fn all(&self) -> &[Artifact] {
        &self.items
    }

    /// Artifacts of `kind`, in insertion order.
    pub fn all_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Artifact> {
        self.items.iter().filter(move |artifact| artifact.kind == kind)
    }

    /// The most recently added artifact of `kind`.
    pub fn latest_of(&self, kind: &str) -> Option<&Artifact> {
        self.items.iter().rev().find(|artifact| artifact.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_preserves_insertion_order() {
        let mut store = ArtifactStore::new();
        store.add(Artifact::new("a", 1u32));
        store.add(Artifact::new("b", "two"));
        store.add(Artifact::new("a", 3u32));

        let kinds: Vec<&str> = store.all().iter().map(|a| a.kind.as_str()).collect();
        assert_eq!(kinds, vec!["a", "b", "a"]);

        let values: Vec<u32> = store
            .all_of("a")
            .map(|a| *a.downcast_ref::<u32>().unwrap())
            .collect();
        assert_eq!(values, vec![1, 3]);
        assert_eq!(store.all_of("missing").count(), 0);
    }

    #[test]
    fn test_latest_of_and_downcast() {
        let mut store = ArtifactStore::new();
        store.add(Artifact::new("ir", String::from("first")).with_source_file(FileId::from("/a.sh1")));
        store.add(Artifact::new("ir", String::from("second")));

        let latest = store.latest_of("ir").unwrap();
        assert_eq!(latest.downcast_ref::<String>().map(String::as_str), Some("second"));
        assert!(latest.downcast_ref::<u32>().is_none());
        assert!(store.all()[0].is::<String>());
        assert_eq!(store.all()[0].source_file, Some(FileId::from("/a.sh1")));
        assert_eq!(store.len(), 2);
    }
}
