//! Document lookup for breadcrumb ancestors.
//!
//! Breadcrumb generation asks a [`DocumentResolver`] whether an ancestor path
//! has a markdown document behind it. Two backends exist:
//!
//! - [`FsResolver`]: checks the docs directory on disk
//! - [`FileSetResolver`]: checks the published file set after discovery

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::files::FileSet;

/// Answers existence questions about docs-relative markdown paths.
///
/// All paths are `/`-separated, relative to the docs directory and already
/// percent-decoded.
pub trait DocumentResolver {
    /// Whether a markdown file exists at `rel_path` (e.g. `"guide/setup.md"`).
    fn has_document(&self, rel_path: &str) -> bool;

    /// First markdown document below directory `dir`, as a docs-relative path.
    ///
    /// Files in a directory come before its subdirectories; names compare
    /// bytewise within each group.
    fn first_document(&self, dir: &str) -> Option<String>;
}

/// Resolves documents by checking the filesystem.
#[derive(Debug)]
pub struct FsResolver {
    docs_dir: PathBuf,
}

impl FsResolver {
    #[must_use]
    pub fn new(docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
        }
    }

    fn first_in(dir_path: &Path, rel: &str) -> Option<String> {
        let Ok(entries) = fs::read_dir(dir_path) else {
            return None;
        };

        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                dirs.push(name);
            } else if name.ends_with(".md") {
                files.push(name);
            }
        }
        files.sort();
        dirs.sort();

        if let Some(first) = files.first() {
            return Some(join_rel(rel, first));
        }

        dirs.iter()
            .find_map(|name| Self::first_in(&dir_path.join(name), &join_rel(rel, name)))
    }
}

impl DocumentResolver for FsResolver {
    fn has_document(&self, rel_path: &str) -> bool {
        self.docs_dir.join(rel_path).is_file()
    }

    fn first_document(&self, dir: &str) -> Option<String> {
        Self::first_in(&self.docs_dir.join(dir), dir)
    }
}

/// Resolves documents against the set of published markdown files.
#[derive(Debug, Default)]
pub struct FileSetResolver {
    documents: BTreeSet<String>,
}

impl FileSetResolver {
    /// Snapshot the markdown files of a file set.
    #[must_use]
    pub fn from_files(files: &FileSet) -> Self {
        Self {
            documents: files
                .iter()
                .filter(|f| f.is_markdown())
                .map(|f| f.src_path().to_owned())
                .collect(),
        }
    }
}

impl DocumentResolver for FileSetResolver {
    fn has_document(&self, rel_path: &str) -> bool {
        self.documents.contains(rel_path)
    }

    fn first_document(&self, dir: &str) -> Option<String> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        self.documents
            .range(prefix.clone()..)
            .take_while(|doc| doc.starts_with(&prefix))
            .min_by(|a, b| walk_order(&a[prefix.len()..], &b[prefix.len()..]))
            .cloned()
    }
}

/// Order two relative file paths the way a sorted top-down walk visits them.
fn walk_order(a: &str, b: &str) -> Ordering {
    let mut a_parts = a.split('/').peekable();
    let mut b_parts = b.split('/').peekable();
    loop {
        match (a_parts.next(), b_parts.next()) {
            (Some(x), Some(y)) => {
                let x_is_file = a_parts.peek().is_none();
                let y_is_file = b_parts.peek().is_none();
                let ordering = y_is_file.cmp(&x_is_file).then_with(|| x.cmp(y));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
        }
    }
}

fn join_rel(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_owned()
    } else {
        format!("{base}/{name}")
    }
}
