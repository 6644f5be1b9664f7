//! Build error types.

use std::path::PathBuf;

use crumbs_config::ConfigError;

/// Error returned by the build phases.
///
/// Cleanup of merged folders never produces one of these; failures there are
/// logged instead.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Invalid configuration (e.g. unknown log level).
    #[error("{0}")]
    Config(#[from] ConfigError),
    /// Exclusion pattern is not a valid glob.
    #[error("Invalid exclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    /// Additional folder path has no final component to mirror.
    #[error("Cannot merge folder without a name: {}", .0.display())]
    InvalidFolder(PathBuf),
    /// Merging a folder would overwrite existing documentation.
    #[error(
        "Refusing to merge into existing path: {} (remove it if it is a copy left by an interrupted build)",
        .0.display()
    )]
    MergeConflict(PathBuf),
    /// I/O error while reading, copying or writing a file.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
