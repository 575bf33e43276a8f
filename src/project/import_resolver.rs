//! Resolution of `{import:...}` arguments to file paths.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::fs::FileSystem;

/// Directory that relative import paths are resolved against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImportBase {
    /// The directory of the importing file.
    #[default]
    FileDir,
    /// A fixed workspace root. `None` leaves every relative import unresolved.
    WorkspaceRoot(Option<PathBuf>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResolverOptions {
    pub base: ImportBase,
    /// Extensions (with leading dot) tried when an import has none.
    pub extensions: Vec<String>,
}

impl Default for ImportResolverOptions {
    fn default() -> Self {
        Self {
            base: ImportBase::FileDir,
            extensions: vec![".sh1".to_string()],
        }
    }
}

impl ImportResolverOptions {
    pub fn with_base(mut self, base: ImportBase) -> Self {
        self.base = base;
        self
    }

    pub fn with_workspace_root(self, root: impl Into<PathBuf>) -> Self {
        self.with_base(ImportBase::WorkspaceRoot(Some(root.into())))
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

pub struct ImportResolver<'a> {
    fs: &'a dyn FileSystem,
    options: ImportResolverOptions,
}

impl<'a> ImportResolver<'a> {
    pub fn new(fs: &'a dyn FileSystem, options: ImportResolverOptions) -> Self {
        Self { fs, options }
    }

    pub fn options(&self) -> &ImportResolverOptions {
        &self.options
    }

    /// Lexically resolve `import_path` as written in `from_file`.
    ///
    /// Returns `None` for an empty path or when a relative path has no base
    /// to resolve against. Existence is not checked.
    pub fn resolve(&self, from_file: &Path, import_path: &str) -> Option<PathBuf> {
        let import_path = import_path.trim();
        if import_path.is_empty() {
            return None;
        }

        let path = Path::new(import_path);
        if path.is_absolute() {
            return Some(self.fs.normalize(path));
        }

        let base = match &self.options.base {
            ImportBase::FileDir => self.fs.dirname(from_file),
            ImportBase::WorkspaceRoot(Some(root)) => root.clone(),
            ImportBase::WorkspaceRoot(None) => return None,
        };
        Some(self.fs.normalize(&self.fs.resolve(&base, path)))
    }

    /// Like [`ImportResolver::resolve`], but only returns existing files,
    /// probing the configured extensions for extension-less imports. A
    /// directory never matches, so `lib` can still find `lib.sh1` next to a
    /// `lib/` folder.
    pub fn resolve_existing(&self, from_file: &Path, import_path: &str) -> Option<PathBuf> {
        let raw = self.resolve(from_file, import_path)?;
        if self.fs.is_file(&raw) {
            return Some(raw);
        }
        if raw.extension().is_some() {
            return None;
        }

        self.options.extensions.iter().find_map(|ext| {
            let mut candidate = OsString::from(raw.as_os_str());
            candidate.push(ext);
            let candidate = PathBuf::from(candidate);
            self.fs.is_file(&candidate).then_some(candidate)
        })
    }
}
