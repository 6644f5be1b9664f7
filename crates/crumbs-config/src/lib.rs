//! Configuration management for crumbs.
//!
//! Parses `crumbs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `docs.site_url`
//! - `breadcrumbs.base_url`
//! - `index.additional_folders` (also expands a leading `~`)

mod expand;
mod log_level;

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use log_level::LogLevel;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override site URL (and therefore the derived base URL).
    pub site_url: Option<String>,
    /// Override log level.
    pub log_level: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "crumbs.toml";

/// Default breadcrumb delimiter.
const DEFAULT_DELIMITER: &str = " / ";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level name (e.g. `INFO`, `debug`).
    pub log_level: String,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Breadcrumb rendering configuration.
    pub breadcrumbs: BreadcrumbsConfig,
    /// Index page configuration (paths are relative strings from TOML).
    index: IndexConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved index configuration (set after loading).
    #[serde(skip)]
    pub index_resolved: IndexConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    site_url: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// Absolute site URL, if the site is published under one.
    pub site_url: Option<String>,
}

/// Breadcrumb rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BreadcrumbsConfig {
    /// String placed between breadcrumb segments.
    pub delimiter: String,
    /// Explicit base URL prefix. Derived from `docs.site_url` when unset.
    pub base_url: Option<String>,
    /// Tooltip shown on segments that have no document to link to.
    pub tooltip_message: Option<String>,
    /// Link directories without an index to their first markdown document.
    pub link_first_document: bool,
}

impl Default for BreadcrumbsConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_owned(),
            base_url: None,
            tooltip_message: None,
            link_first_document: false,
        }
    }
}

/// Raw index configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct IndexConfigRaw {
    exclude_paths: Option<Vec<String>>,
    additional_folders: Option<Vec<String>>,
    generate_home_index: Option<bool>,
}

/// Resolved index page configuration.
#[derive(Debug)]
pub struct IndexConfig {
    /// Glob patterns of docs-relative paths to leave out.
    pub exclude_paths: Vec<String>,
    /// Folders merged into the docs directory for the duration of discovery.
    pub additional_folders: Vec<PathBuf>,
    /// Overwrite the root `index.md` with a generated listing.
    pub generate_home_index: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            exclude_paths: default_exclude_paths(),
            additional_folders: Vec::new(),
            generate_home_index: true,
        }
    }
}

fn default_exclude_paths() -> Vec<String> {
    vec!["docs/generated/**".to_owned()]
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`docs.site_url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Derive the base URL prefix from an absolute site URL.
///
/// Strips the scheme and host, keeping the path without surrounding slashes:
/// - `https://example.com/` -> `""`
/// - `https://example.com/project/docs/` -> `"project/docs"`
#[must_use]
pub fn derive_base_url(site_url: &str) -> String {
    let trimmed = site_url.trim_end_matches('/');
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);

    without_scheme
        .split_once('/')
        .map(|(_, path)| path.trim_matches('/').to_owned())
        .unwrap_or_default()
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `crumbs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(site_url) = &settings.site_url {
            self.docs_resolved.site_url = Some(site_url.clone());
        }
        if let Some(log_level) = &settings.log_level {
            self.log_level.clone_from(log_level);
        }
    }

    /// Parsed log level.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `log_level` names no known level.
    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        self.log_level.parse()
    }

    /// Base URL prefix used for generated links, without surrounding slashes.
    ///
    /// An explicit `breadcrumbs.base_url` wins over one derived from
    /// `docs.site_url`.
    #[must_use]
    pub fn base_url(&self) -> String {
        match (&self.breadcrumbs.base_url, &self.docs_resolved.site_url) {
            (Some(base_url), _) => base_url.trim_matches('/').to_owned(),
            (None, Some(site_url)) => derive_base_url(site_url),
            (None, None) => String::new(),
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            log_level: LogLevel::default().as_str().to_owned(),
            docs: DocsConfigRaw::default(),
            breadcrumbs: BreadcrumbsConfig::default(),
            index: IndexConfigRaw::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                site_url: None,
            },
            index_resolved: IndexConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log_level()?;

        if self.breadcrumbs.delimiter.is_empty() {
            return Err(ConfigError::Validation(
                "breadcrumbs.delimiter cannot be empty".to_owned(),
            ));
        }

        if let Some(site_url) = &self.docs_resolved.site_url
            && !site_url.starts_with("http://")
            && !site_url.starts_with("https://")
        {
            return Err(ConfigError::Validation(
                "docs.site_url must start with http:// or https://".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.docs.site_url {
            self.docs.site_url = Some(expand::expand_env(url, "docs.site_url")?);
        }

        if let Some(ref url) = self.breadcrumbs.base_url {
            self.breadcrumbs.base_url = Some(expand::expand_env(url, "breadcrumbs.base_url")?);
        }

        if let Some(ref mut folders) = self.index.additional_folders {
            for folder in folders.iter_mut() {
                *folder = expand::expand_path(folder, "index.additional_folders")?;
            }
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(self.docs.source_dir.as_deref().unwrap_or("docs")),
            site_url: self.docs.site_url.clone(),
        };

        self.index_resolved = IndexConfig {
            exclude_paths: self
                .index
                .exclude_paths
                .clone()
                .unwrap_or_else(default_exclude_paths),
            additional_folders: self
                .index
                .additional_folders
                .iter()
                .flatten()
                .map(|d| config_dir.join(d))
                .collect(),
            generate_home_index: self.index.generate_home_index.unwrap_or(true),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.log_level, "INFO");
        assert_eq!(config.breadcrumbs.delimiter, " / ");
        assert!(config.breadcrumbs.tooltip_message.is_none());
        assert!(!config.breadcrumbs.link_first_document);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(
            config.index_resolved.exclude_paths,
            vec!["docs/generated/**".to_owned()]
        );
        assert!(config.index_resolved.generate_home_index);
        assert!(config.index_resolved.additional_folders.is_empty());
        assert_eq!(config.base_url(), "");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.breadcrumbs.delimiter, " / ");
        assert_eq!(config.log_level, "INFO");
    }

    #[test]
    fn test_parse_breadcrumbs_config() {
        let toml = r#"
[breadcrumbs]
delimiter = " > "
base_url = "/handbook/"
tooltip_message = "No page here yet"
link_first_document = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.breadcrumbs.delimiter, " > ");
        assert_eq!(
            config.breadcrumbs.tooltip_message.as_deref(),
            Some("No page here yet")
        );
        assert!(config.breadcrumbs.link_first_document);
        assert_eq!(config.base_url(), "handbook");
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "documentation"
site_url = "https://example.com/team/"

[index]
exclude_paths = ["docs/drafts/**", "*.tmp.md"]
additional_folders = ["api", "shared/reference"]
generate_home_index = false
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/documentation")
        );
        assert_eq!(
            config.index_resolved.exclude_paths,
            vec!["docs/drafts/**".to_owned(), "*.tmp.md".to_owned()]
        );
        assert_eq!(
            config.index_resolved.additional_folders,
            vec![
                PathBuf::from("/project/api"),
                PathBuf::from("/project/shared/reference")
            ]
        );
        assert!(!config.index_resolved.generate_home_index);
        assert_eq!(config.base_url(), "team");
    }

    #[test]
    fn test_derive_base_url() {
        assert_eq!(derive_base_url(""), "");
        assert_eq!(derive_base_url("https://example.com"), "");
        assert_eq!(derive_base_url("https://example.com/"), "");
        assert_eq!(derive_base_url("http://example.com/docs/"), "docs");
        assert_eq!(
            derive_base_url("https://example.github.io/project/docs"),
            "project/docs"
        );
        assert_eq!(derive_base_url("example.com/sub"), "sub");
    }

    #[test]
    fn test_explicit_base_url_wins_over_site_url() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.docs_resolved.site_url = Some("https://example.com/derived/".to_owned());
        assert_eq!(config.base_url(), "derived");

        config.breadcrumbs.base_url = Some("explicit".to_owned());
        assert_eq!(config.base_url(), "explicit");
    }

    #[test]
    fn test_validate_rejects_invalid_log_level() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.log_level = "LOUD".to_owned();

        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("LOUD"));
    }

    #[test]
    fn test_validate_rejects_empty_delimiter() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.breadcrumbs.delimiter = String::new();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("delimiter"));
    }

    #[test]
    fn test_validate_rejects_site_url_without_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.docs_resolved.site_url = Some("example.com/docs".to_owned());

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("site_url"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            site_url: Some("https://example.com/custom/".to_owned()),
            log_level: Some("debug".to_owned()),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/custom/docs")
        );
        assert_eq!(config.base_url(), "custom");
        assert_eq!(config.log_level().unwrap(), LogLevel::Debug);
    }

    #[test]
    fn test_apply_cli_settings_none_keeps_values() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.log_level, "INFO");
    }

    #[test]
    fn test_load_explicit_missing_file_errors() {
        let result = Config::load(Some(Path::new("/nonexistent/crumbs.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crumbs.toml");
        std::fs::write(
            &path,
            r#"
log_level = "warning"

[docs]
source_dir = "site-docs"
site_url = "${CRUMBS_TEST_SURELY_UNSET_VAR:-https://example.com/kb/}"

[index]
additional_folders = ["extra"]
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.docs_resolved.source_dir, dir.path().join("site-docs"));
        assert_eq!(
            config.index_resolved.additional_folders,
            vec![dir.path().join("extra")]
        );
        assert_eq!(config.base_url(), "kb");
        assert_eq!(config.log_level().unwrap(), LogLevel::Warn);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_from_file_invalid_log_level_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crumbs.toml");
        std::fs::write(&path, "log_level = \"chatty\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("Invalid log level: CHATTY"));
    }

    #[test]
    fn test_load_from_file_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crumbs.toml");
        std::fs::write(&path, "[breadcrumbs\n").unwrap();

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
