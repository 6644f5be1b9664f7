//! Folder index page generation.
//!
//! Every non-excluded directory under the docs root gets an `index.md`
//! listing its subdirectories and markdown documents:
//!
//! ```text
//! # Index of guide
//!
//! - [advanced/](/guide/advanced/)
//! - [install](install)
//! - [setup](setup)
//! ```
//!
//! Entries are ordered directories first, then files, each group sorted by
//! name. Existing index files are overwritten on every run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::exclude::ExclusionMatcher;
use crate::url::{encode_path, site_link};

/// Filename of generated index pages.
pub const INDEX_FILENAME: &str = "index.md";

/// One line of an index listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    /// Directory name, or file name without its `.md` extension.
    pub name: String,
    pub is_directory: bool,
    /// Link target written into the listing.
    pub link: String,
}

impl IndexEntry {
    fn to_markdown(&self) -> String {
        if self.is_directory {
            format!("- [{}/]({})", self.name, self.link)
        } else {
            format!("- [{}]({})", self.name, self.link)
        }
    }
}

/// An index page written by [`IndexGenerator::generate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedIndex {
    /// Path relative to the docs directory (e.g. `"guide/index.md"`).
    pub src_path: String,
    /// Absolute path the page was written to.
    pub path: PathBuf,
    /// Markdown content of the page.
    pub content: String,
}

/// Writes `index.md` pages for a docs directory tree.
pub struct IndexGenerator<'a> {
    docs_dir: &'a Path,
    base_url: &'a str,
    matcher: &'a ExclusionMatcher,
    generate_home_index: bool,
}

impl<'a> IndexGenerator<'a> {
    #[must_use]
    pub fn new(docs_dir: &'a Path, base_url: &'a str, matcher: &'a ExclusionMatcher) -> Self {
        Self {
            docs_dir,
            base_url,
            matcher,
            generate_home_index: true,
        }
    }

    /// Whether to overwrite the root `index.md`.
    ///
    /// When disabled, an existing root index is kept and one is only
    /// synthesized if missing.
    #[must_use]
    pub fn with_home_index(mut self, generate_home_index: bool) -> Self {
        self.generate_home_index = generate_home_index;
        self
    }

    /// Generate index pages for the whole tree, parents before children.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error hit while listing or writing.
    pub fn generate(&self) -> Result<Vec<GeneratedIndex>, BuildError> {
        let mut generated = Vec::new();
        self.generate_directory(self.docs_dir, "", &mut generated)?;
        tracing::info!(count = generated.len(), "Generated index pages");
        Ok(generated)
    }

    fn generate_directory(
        &self,
        dir_path: &Path,
        rel_dir: &str,
        generated: &mut Vec<GeneratedIndex>,
    ) -> Result<(), BuildError> {
        let children = self.list_children(dir_path, rel_dir)?;
        let entries: Vec<IndexEntry> = children.iter().map(|(entry, _)| entry.clone()).collect();

        let src_path = join_rel(rel_dir, INDEX_FILENAME);
        let index_path = dir_path.join(INDEX_FILENAME);

        if self.matcher.is_excluded_relative(&src_path) {
            tracing::debug!(path = %src_path, "Index page excluded, not writing");
        } else if rel_dir.is_empty() && !self.generate_home_index && index_path.exists() {
            tracing::debug!("Keeping existing home index");
        } else {
            let content = render_index(rel_dir, &entries);
            fs::write(&index_path, &content).map_err(|e| BuildError::io(&index_path, e))?;
            tracing::debug!(path = %src_path, entries = entries.len(), "Wrote index page");
            generated.push(GeneratedIndex {
                src_path,
                path: index_path,
                content,
            });
        }

        for (entry, child_path) in &children {
            if entry.is_directory {
                self.generate_directory(child_path, &join_rel(rel_dir, &entry.name), generated)?;
            }
        }

        Ok(())
    }

    /// List non-hidden, non-excluded subdirectories and markdown documents.
    fn list_children(
        &self,
        dir_path: &Path,
        rel_dir: &str,
    ) -> Result<Vec<(IndexEntry, PathBuf)>, BuildError> {
        let read_dir = fs::read_dir(dir_path).map_err(|e| BuildError::io(dir_path, e))?;

        let mut children = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| BuildError::io(dir_path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let rel = join_rel(rel_dir, &name);
            let is_dir = entry
                .file_type()
                .map_err(|e| BuildError::io(entry.path(), e))?
                .is_dir();

            if is_dir {
                if self.matcher.is_dir_excluded_relative(&rel) {
                    tracing::debug!(path = %rel, "Skipping excluded directory");
                    continue;
                }
                children.push((
                    IndexEntry {
                        link: site_link(self.base_url, &encode_path(&rel)),
                        name,
                        is_directory: true,
                    },
                    entry.path(),
                ));
            } else if let Some(stem) = name.strip_suffix(".md") {
                if name == INDEX_FILENAME || self.matcher.is_excluded_relative(&rel) {
                    continue;
                }
                children.push((
                    IndexEntry {
                        name: stem.to_owned(),
                        is_directory: false,
                        link: encode_path(stem),
                    },
                    entry.path(),
                ));
            }
        }

        children.sort_by(|(a, _), (b, _)| {
            b.is_directory
                .cmp(&a.is_directory)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(children)
    }
}

/// Render the markdown for one directory's index page.
#[must_use]
pub fn render_index(rel_dir: &str, entries: &[IndexEntry]) -> String {
    let title = if rel_dir.is_empty() { "/" } else { rel_dir };
    let mut content = format!("# Index of {title}\n");
    if !entries.is_empty() {
        content.push('\n');
        for entry in entries {
            content.push_str(&entry.to_markdown());
            content.push('\n');
        }
    }
    content
}

fn join_rel(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_owned()
    } else {
        format!("{base}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn matcher(root: &Path, patterns: &[&str]) -> ExclusionMatcher {
        let patterns: Vec<String> = patterns.iter().map(|p| (*p).to_owned()).collect();
        ExclusionMatcher::new(root, &patterns).unwrap()
    }

    #[test]
    fn test_generate_lists_directories_first_then_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "b.md", "# B");
        write(root, "a.md", "# A");
        write(root, "c/d.md", "# D");

        let m = matcher(root, &[]);
        IndexGenerator::new(root, "", &m).generate().unwrap();

        assert_eq!(
            fs::read_to_string(root.join("index.md")).unwrap(),
            "# Index of /\n\n- [c/](/c/)\n- [a](a)\n- [b](b)\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("c/index.md")).unwrap(),
            "# Index of c\n\n- [d](d)\n"
        );
    }

    #[test]
    fn test_generate_returns_pages_parent_first() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "guide/setup/install.md", "");

        let m = matcher(root, &[]);
        let generated = IndexGenerator::new(root, "", &m).generate().unwrap();
        let paths: Vec<_> = generated.iter().map(|g| g.src_path.as_str()).collect();

        assert_eq!(
            paths,
            vec!["index.md", "guide/index.md", "guide/setup/index.md"]
        );
        assert_eq!(generated[2].path, root.join("guide/setup/index.md"));
    }

    #[test]
    fn test_generate_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "index.md", "# Hand written home");
        write(root, "guide/intro.md", "");
        write(root, "guide/deep/more.md", "");

        let m = matcher(root, &[]);
        let generator = IndexGenerator::new(root, "", &m);
        let first = generator.generate().unwrap();
        let second = generator.generate().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_skips_non_markdown_and_hidden_entries() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "logo.png", "");
        write(root, ".draft.md", "");
        write(root, ".cache/x.md", "");
        write(root, "page.md", "");

        let m = matcher(root, &[]);
        IndexGenerator::new(root, "", &m).generate().unwrap();

        assert_eq!(
            fs::read_to_string(root.join("index.md")).unwrap(),
            "# Index of /\n\n- [page](page)\n"
        );
        assert!(!root.join(".cache/index.md").exists());
    }

    #[test]
    fn test_generate_honors_exclusions() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "generated/api.md", "");
        write(root, "guide/secret.md", "");
        write(root, "guide/public.md", "");

        let m = matcher(root, &["docs/generated/**", "docs/guide/secret.md"]);
        IndexGenerator::new(root, "", &m).generate().unwrap();

        assert_eq!(
            fs::read_to_string(root.join("index.md")).unwrap(),
            "# Index of /\n\n- [guide/](/guide/)\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("guide/index.md")).unwrap(),
            "# Index of guide\n\n- [public](public)\n"
        );
        assert!(!root.join("generated/index.md").exists());
    }

    #[test]
    fn test_excluded_index_target_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "index.md", "# Home");
        write(root, "guide/a.md", "");

        let m = matcher(root, &["docs/index.md"]);
        let generated = IndexGenerator::new(root, "", &m).generate().unwrap();

        assert_eq!(fs::read_to_string(root.join("index.md")).unwrap(), "# Home");
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].src_path, "guide/index.md");
    }

    #[test]
    fn test_home_index_disabled_keeps_existing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "index.md", "# Welcome");
        write(root, "a.md", "");

        let m = matcher(root, &[]);
        IndexGenerator::new(root, "", &m)
            .with_home_index(false)
            .generate()
            .unwrap();

        assert_eq!(fs::read_to_string(root.join("index.md")).unwrap(), "# Welcome");
    }

    #[test]
    fn test_home_index_disabled_synthesizes_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "a.md", "");

        let m = matcher(root, &[]);
        IndexGenerator::new(root, "", &m)
            .with_home_index(false)
            .generate()
            .unwrap();

        assert_eq!(
            fs::read_to_string(root.join("index.md")).unwrap(),
            "# Index of /\n\n- [a](a)\n"
        );
    }

    #[test]
    fn test_directory_links_use_base_url_and_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "user guide/first steps.md", "");

        let m = matcher(root, &[]);
        IndexGenerator::new(root, "kb", &m).generate().unwrap();

        assert_eq!(
            fs::read_to_string(root.join("index.md")).unwrap(),
            "# Index of /\n\n- [user guide/](/kb/user%20guide/)\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("user guide/index.md")).unwrap(),
            "# Index of user guide\n\n- [first steps](first%20steps)\n"
        );
    }

    #[test]
    fn test_render_index_empty_directory() {
        assert_eq!(render_index("empty", &[]), "# Index of empty\n");
    }

    #[test]
    fn test_generate_missing_root_errors() {
        let m = ExclusionMatcher::empty("/nonexistent/docs");
        let result = IndexGenerator::new(Path::new("/nonexistent/docs"), "", &m).generate();
        assert!(matches!(result, Err(BuildError::Io { .. })));
    }
}
