//! Glob-based exclusion of docs-relative paths.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::BuildError;

/// Prefix tolerated on patterns written relative to the project root.
const DOCS_PREFIX: &str = "docs/";

/// `*` and `?` stay within one path component, `**` spans components.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Decides whether a path under the docs directory is excluded.
///
/// Paths are compared relative to the docs directory with `/` separators.
/// A path is excluded when it, or any directory above it, matches one of the
/// patterns. Directories are also tested with a trailing `/` so that
/// `drafts/**` prunes `drafts` itself.
#[derive(Debug)]
pub struct ExclusionMatcher {
    docs_dir: PathBuf,
    patterns: Vec<Pattern>,
}

impl ExclusionMatcher {
    /// Compile exclusion patterns.
    ///
    /// A leading `docs/` (or `./docs/`, `/docs/`) is stripped so patterns can
    /// be written relative to either the project root or the docs directory.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::InvalidPattern` for the first pattern that is not
    /// a valid glob.
    pub fn new(docs_dir: impl Into<PathBuf>, patterns: &[String]) -> Result<Self, BuildError> {
        let patterns = patterns
            .iter()
            .map(|raw| {
                Pattern::new(normalize_pattern(raw)).map_err(|source| {
                    BuildError::InvalidPattern {
                        pattern: raw.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            docs_dir: docs_dir.into(),
            patterns,
        })
    }

    /// Matcher that excludes nothing.
    #[must_use]
    pub fn empty(docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            patterns: Vec::new(),
        }
    }

    /// Check a filesystem path, absolute or relative to the docs directory.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.docs_dir).unwrap_or(path);
        self.is_excluded_relative(&to_slash_path(relative))
    }

    /// Check a `/`-separated path relative to the docs directory.
    #[must_use]
    pub fn is_excluded_relative(&self, rel_path: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let rel_path = rel_path.trim_matches('/');
        if rel_path.is_empty() {
            return false;
        }

        if self.matches(rel_path) {
            return true;
        }

        // Any excluded ancestor directory excludes everything beneath it
        let mut end = 0;
        while let Some(offset) = rel_path[end..].find('/') {
            end += offset;
            if self.matches(&rel_path[..end]) || self.matches(&rel_path[..=end]) {
                return true;
            }
            end += 1;
        }

        false
    }

    /// Check a directory path relative to the docs directory.
    #[must_use]
    pub fn is_dir_excluded_relative(&self, rel_path: &str) -> bool {
        let trimmed = rel_path.trim_matches('/');
        !trimmed.is_empty()
            && (self.is_excluded_relative(trimmed) || self.matches(&format!("{trimmed}/")))
    }

    fn matches(&self, candidate: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(candidate, MATCH_OPTIONS))
    }
}

/// Strip a leading `./`, `/` and `docs/` from a pattern.
fn normalize_pattern(pattern: &str) -> &str {
    let pattern = pattern.trim_start_matches("./").trim_start_matches('/');
    pattern.strip_prefix(DOCS_PREFIX).unwrap_or(pattern)
}

/// Join normal path components with `/` regardless of platform.
pub(crate) fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
