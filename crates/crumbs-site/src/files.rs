//! Host file registry.
//!
//! A [`FileSet`] is the collection of source files a build publishes. The
//! discovery phase appends files merged from additional folders and
//! generated index pages, and drops excluded ones.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::url::page_url;

/// Where a source file's content comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileOrigin {
    /// File on disk at this absolute path.
    Disk(PathBuf),
    /// Content produced during the build.
    Generated(String),
}

/// A file participating in the build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    src_path: String,
    origin: FileOrigin,
}

impl SourceFile {
    /// File read from disk.
    ///
    /// `src_path` is the `/`-separated path relative to the docs directory.
    pub fn disk(src_path: impl Into<String>, abs_path: impl Into<PathBuf>) -> Self {
        Self {
            src_path: src_path.into(),
            origin: FileOrigin::Disk(abs_path.into()),
        }
    }

    /// File whose content was generated in memory.
    pub fn generated(src_path: impl Into<String>, content: String) -> Self {
        Self {
            src_path: src_path.into(),
            origin: FileOrigin::Generated(content),
        }
    }

    /// Path relative to the docs directory (e.g. `"guide/setup.md"`).
    #[must_use]
    pub fn src_path(&self) -> &str {
        &self.src_path
    }

    #[must_use]
    pub fn origin(&self) -> &FileOrigin {
        &self.origin
    }

    #[must_use]
    pub fn is_markdown(&self) -> bool {
        Path::new(&self.src_path)
            .extension()
            .is_some_and(|e| e == "md")
    }

    /// Page URL for markdown files (e.g. `"guide/setup/"`).
    #[must_use]
    pub fn url(&self) -> String {
        page_url(&self.src_path)
    }

    /// Read the file content as text.
    pub fn read(&self) -> Result<Cow<'_, str>, BuildError> {
        match &self.origin {
            FileOrigin::Disk(path) => fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|e| BuildError::io(path, e)),
            FileOrigin::Generated(content) => Ok(Cow::Borrowed(content)),
        }
    }
}

/// Source files keyed by docs-relative path, iterated in path order.
#[derive(Clone, Debug, Default)]
pub struct FileSet {
    files: BTreeMap<String, SourceFile>,
}

impl FileSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every non-hidden file below `docs_dir`.
    ///
    /// Returns an empty set if the directory doesn't exist.
    pub fn scan(docs_dir: &Path) -> Result<Self, BuildError> {
        let mut files = Self::new();
        if docs_dir.is_dir() {
            files.scan_directory(docs_dir, "")?;
        }
        Ok(files)
    }

    fn scan_directory(&mut self, dir_path: &Path, rel_prefix: &str) -> Result<(), BuildError> {
        let entries = fs::read_dir(dir_path).map_err(|e| BuildError::io(dir_path, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| BuildError::io(dir_path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let path = entry.path();
            let rel = if rel_prefix.is_empty() {
                name
            } else {
                format!("{rel_prefix}/{name}")
            };

            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                self.scan_directory(&path, &rel)?;
            } else {
                self.insert(SourceFile::disk(rel, path));
            }
        }
        Ok(())
    }

    /// Add a file, replacing any file registered at the same path.
    pub fn insert(&mut self, file: SourceFile) -> Option<SourceFile> {
        self.files.insert(file.src_path.clone(), file)
    }

    pub fn remove(&mut self, src_path: &str) -> Option<SourceFile> {
        self.files.remove(src_path)
    }

    #[must_use]
    pub fn get(&self, src_path: &str) -> Option<&SourceFile> {
        self.files.get(src_path)
    }

    #[must_use]
    pub fn contains(&self, src_path: &str) -> bool {
        self.files.contains_key(src_path)
    }

    /// Keep only files for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&SourceFile) -> bool) {
        self.files.retain(|_, file| keep(file));
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a SourceFile;
    type IntoIter = std::collections::btree_map::Values<'a, String, SourceFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.values()
    }
}
