//! Filesystem capability consumed by the project graph builder.
//!
//! [`DiskFs`] talks to the real filesystem; [`MemoryFs`] is an in-memory
//! implementation for tests and embedding. Path normalization is purely
//! lexical in both.

use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

pub trait FileSystem {
    /// True for files and directories.
    fn exists(&self, path: &Path) -> bool;

    /// True only for regular files.
    fn is_file(&self, path: &Path) -> bool;

    fn read_text(&self, path: &Path) -> io::Result<String>;

    /// Names (not paths) of the entries directly inside `dir`.
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<String>>;

    fn normalize(&self, path: &Path) -> PathBuf {
        normalize_path(path)
    }

    /// Resolve `path` against `base` (absolute paths win) and normalize.
    fn resolve(&self, base: &Path, path: &Path) -> PathBuf {
        normalize_path(&base.join(path))
    }

    fn dirname(&self, path: &Path) -> PathBuf {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            Some(_) => PathBuf::from("."),
            None => path.to_path_buf(),
        }
    }
}

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding segment. Never touches the disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(segment) => out.push(segment),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

// ============================================================================
// DISK
// ============================================================================

/// The real filesystem. Relative results of `resolve` are anchored at the
/// process working directory so every file id is absolute.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl FileSystem for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn resolve(&self, base: &Path, path: &Path) -> PathBuf {
        let joined = base.join(path);
        if joined.is_absolute() {
            return normalize_path(&joined);
        }
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        normalize_path(&cwd.join(joined))
    }
}

// ============================================================================
// MEMORY
// ============================================================================

/// In-memory filesystem. Directories exist implicitly for every stored
/// file's ancestors.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a file, replacing any previous contents.
    pub fn insert(&mut self, path: impl AsRef<Path>, text: impl Into<String>) {
        self.files.insert(normalize_path(path.as_ref()), text.into());
    }

    /// Builder form of [`MemoryFs::insert`].
    pub fn with_file(mut self, path: impl AsRef<Path>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn remove(&mut self, path: impl AsRef<Path>) -> bool {
        self.files.remove(&normalize_path(path.as_ref())).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .keys()
            .any(|file| file.starts_with(path) && file.as_path() != path)
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        let path = normalize_path(path);
        self.files.contains_key(&path) || self.is_dir(&path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize_path(path))
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        self.files.get(&normalize_path(path)).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn read_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        let dir = normalize_path(dir);
        if !self.is_dir(&dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            ));
        }

        let mut names: Vec<String> = self
            .files
            .keys()
            .filter_map(|file| file.strip_prefix(&dir).ok())
            .filter_map(|rest| rest.components().next())
            .map(|first| first.as_os_str().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}
