//! CLI command implementations.

mod build;
mod index;
mod trail;

use std::path::PathBuf;

use clap::Args;
use crumbs_config::{CliSettings, Config};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use index::IndexArgs;
pub(crate) use trail::TrailArgs;

/// Configuration arguments shared by all commands.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover crumbs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Absolute site URL used to derive the base URL (overrides config).
    #[arg(long, env = "CRUMBS_SITE_URL")]
    site_url: Option<String>,

    /// Log level, e.g. INFO or DEBUG (overrides config).
    #[arg(long)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging).
    #[arg(short, long)]
    verbose: bool,
}

impl ConfigArgs {
    /// Load configuration and install the tracing subscriber.
    ///
    /// `--verbose` forces debug logging, otherwise `RUST_LOG` wins over the
    /// configured `log_level`.
    fn load(self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            site_url: self.site_url,
            log_level: self.log_level,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let filter = if self.verbose {
            EnvFilter::new("debug")
        } else {
            let level = config.log_level()?;
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()))
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();

        Ok(config)
    }
}
