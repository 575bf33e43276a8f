//! Host services offered to output plugins.

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;

use crate::base::FileId;
use crate::project::normalize_path;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("this host cannot read files")]
    Unsupported,
}

pub trait Host {
    /// Absolute path for an output path given relative to the build.
    fn resolve_output_path(&self, path: &Path) -> PathBuf;

    fn write_text_file(&self, path: &Path, content: &str) -> Result<(), HostError> {
        self.write_binary_file(path, content.as_bytes())
    }

    fn write_binary_file(&self, path: &Path, data: &[u8]) -> Result<(), HostError>;

    /// Optional capability; plugins must tolerate [`HostError::Unsupported`].
    fn read_binary_file(&self, _path: &Path) -> Result<Vec<u8>, HostError> {
        Err(HostError::Unsupported)
    }
}

/// Writes to disk, resolving relative paths against a base directory and
/// creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct DiskHost {
    base_dir: PathBuf,
}

impl DiskHost {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Outputs land next to the entry file.
    pub fn for_entry(entry: &FileId) -> Self {
        Self::new(entry.as_path().parent().unwrap_or(Path::new(".")))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl Host for DiskHost {
    fn resolve_output_path(&self, path: &Path) -> PathBuf {
        normalize_path(&self.base_dir.join(path))
    }

    fn write_binary_file(&self, path: &Path, data: &[u8]) -> Result<(), HostError> {
        let write = || -> io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, data)
        };
        write().map_err(|source| HostError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read_binary_file(&self, path: &Path) -> Result<Vec<u8>, HostError> {
        std::fs::read(path).map_err(|source| HostError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Keeps written files in memory. For tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryHost {
    base_dir: PathBuf,
    files: RefCell<IndexMap<PathBuf, Vec<u8>>>,
}

impl MemoryHost {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            files: RefCell::default(),
        }
    }

    /// Paths written so far, in first-write order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    pub fn text(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .borrow()
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl Host for MemoryHost {
    fn resolve_output_path(&self, path: &Path) -> PathBuf {
        normalize_path(&self.base_dir.join(path))
    }

    fn write_binary_file(&self, path: &Path, data: &[u8]) -> Result<(), HostError> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn read_binary_file(&self, path: &Path) -> Result<Vec<u8>, HostError> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| HostError::Read {
                path: path.to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotFound),
            })
    }
}
