use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

/// Identifies a source file by its normalized absolute path.
///
/// Cheap to clone; used as the key for documents, edges and diagnostics.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(Arc<str>);

impl FileId {
    /// Wrap an already-normalized path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(Arc::from(path.as_ref().to_string_lossy().as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&*self.0)
    }

    pub fn to_path_buf(&self) -> PathBuf {
        self.as_path().to_path_buf()
    }

    /// File name without directory or final extension (`main` for `/a/main.sh1`).
    pub fn stem(&self) -> &str {
        self.as_path()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({:?})", &*self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for FileId {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl From<&str> for FileId {
    fn from(path: &str) -> Self {
        Self(Arc::from(path))
    }
}

impl Serialize for FileId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
