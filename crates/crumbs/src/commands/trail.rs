//! `crumbs trail` command implementation.

use clap::Args;
use crumbs_site::BreadcrumbsPlugin;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the trail command.
#[derive(Args)]
pub(crate) struct TrailArgs {
    /// Page URL, e.g. `guide/setup/install/`.
    url: String,

    #[command(flatten)]
    config: ConfigArgs,
}

impl TrailArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.config.load()?;
        let plugin = BreadcrumbsPlugin::configure(&config)?;

        let trail = plugin.trail(&self.url);
        Output::new().result(&trail.render(plugin.settings()));
        Ok(())
    }
}
