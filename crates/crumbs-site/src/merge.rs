//! Temporary merging of additional folders into the docs directory.
//!
//! A folder `F` is mirrored to `<docs>/<name of F>/` so index generation sees
//! its documents. The copies are only needed during discovery:
//! [`MergedFolders`] removes every mirrored tree on [`cleanup`](MergedFolders::cleanup)
//! or when dropped, so an aborted build leaves no copies behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::exclude::ExclusionMatcher;
use crate::files::{FileSet, SourceFile};

/// Guard over folders mirrored into the docs directory.
#[derive(Debug, Default)]
pub struct MergedFolders {
    targets: Vec<PathBuf>,
}

impl MergedFolders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror `folder` into `docs_dir` and register the copied files.
    ///
    /// Copied files are registered with their original location, so they
    /// stay readable after cleanup. Excluded subtrees are not copied.
    /// Returns the number of files copied.
    ///
    /// # Errors
    ///
    /// - `BuildError::InvalidFolder` if `folder` has no final name component
    /// - `BuildError::MergeConflict` if the mirror target already exists
    /// - `BuildError::Io` on any read or copy failure
    pub fn merge(
        &mut self,
        folder: &Path,
        docs_dir: &Path,
        matcher: &ExclusionMatcher,
        files: &mut FileSet,
    ) -> Result<usize, BuildError> {
        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| BuildError::InvalidFolder(folder.to_path_buf()))?;

        if !folder.is_dir() {
            return Err(BuildError::io(
                folder,
                std::io::Error::new(ErrorKind::NotFound, "additional folder not found"),
            ));
        }

        let target = docs_dir.join(&name);
        if target.exists() {
            return Err(BuildError::MergeConflict(target));
        }
        if matcher.is_dir_excluded_relative(&name) {
            tracing::debug!(folder = %folder.display(), "Additional folder excluded, skipping");
            return Ok(0);
        }

        // Registered before copying so a failed copy is still cleaned up
        self.targets.push(target.clone());

        let copied = copy_tree(folder, &target, &name, matcher, files)?;
        tracing::info!(
            folder = %folder.display(),
            target = %target.display(),
            files = copied,
            "Merged additional folder"
        );
        Ok(copied)
    }

    /// Mirror targets created so far.
    #[must_use]
    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    /// Remove every mirrored tree.
    ///
    /// Already-missing targets are ignored; other failures are logged.
    pub fn cleanup(&mut self) {
        for target in self.targets.drain(..) {
            match fs::remove_dir_all(&target) {
                Ok(()) => tracing::debug!(path = %target.display(), "Removed merged folder"),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(path = %target.display(), "Merged folder already removed");
                }
                Err(e) => {
                    tracing::warn!(path = %target.display(), error = %e, "Failed to remove merged folder");
                }
            }
        }
    }
}

impl Drop for MergedFolders {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Recursively copy non-hidden, non-excluded files from `src` to `dst`.
fn copy_tree(
    src: &Path,
    dst: &Path,
    rel_prefix: &str,
    matcher: &ExclusionMatcher,
    files: &mut FileSet,
) -> Result<usize, BuildError> {
    fs::create_dir_all(dst).map_err(|e| BuildError::io(dst, e))?;

    let entries = fs::read_dir(src).map_err(|e| BuildError::io(src, e))?;
    let mut copied = 0;

    for entry in entries {
        let entry = entry.map_err(|e| BuildError::io(src, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let src_path = entry.path();
        let dst_path = dst.join(&name);
        let rel = format!("{rel_prefix}/{name}");

        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            if matcher.is_dir_excluded_relative(&rel) {
                tracing::debug!(path = %rel, "Skipping excluded directory");
                continue;
            }
            copied += copy_tree(&src_path, &dst_path, &rel, matcher, files)?;
        } else {
            if matcher.is_excluded_relative(&rel) {
                tracing::debug!(path = %rel, "Skipping excluded file");
                continue;
            }
            fs::copy(&src_path, &dst_path).map_err(|e| BuildError::io(&src_path, e))?;
            files.insert(SourceFile::disk(rel, src_path));
            copied += 1;
        }
    }

    Ok(copied)
}
