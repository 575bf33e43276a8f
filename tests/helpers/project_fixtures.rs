//! On-disk project fixtures for end-to-end builds.

use std::fs;
use std::path::{Path, PathBuf};

use scraphand::{BuildOptions, BuildOutcome, DiskFs, DiskHost, PluginCatalog, build_project};
use tempfile::TempDir;

/// A temporary directory holding the files of one project.
pub struct TempProject {
    dir: TempDir,
}

impl TempProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Create a project from `(relative path, contents)` pairs.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let project = Self::new();
        for (path, text) in files {
            project.write(path, text);
        }
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, text: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, text).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> Option<String> {
        fs::read_to_string(self.path(rel)).ok()
    }

    /// Build `entry` with the built-in catalog, writing outputs into the
    /// project directory.
    pub fn build(&self, entry: &str, plugins: &[&str]) -> BuildOutcome {
        self.build_with(BuildOptions::new(self.path(entry)).with_plugins(plugins.iter().copied()))
    }

    pub fn build_with(&self, options: BuildOptions) -> BuildOutcome {
        let host = DiskHost::new(self.root());
        build_project(&DiskFs, &host, &PluginCatalog::builtin(), &options).unwrap()
    }
}
