//! `crumbs index` command implementation.

use clap::Args;
use crumbs_site::{BreadcrumbsPlugin, FileSet};

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the index command.
#[derive(Args)]
pub(crate) struct IndexArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

impl IndexArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;

        let mut plugin = BreadcrumbsPlugin::configure(&config)?;
        output.info(&format!("Source: {}", plugin.docs_dir().display()));

        let mut files = FileSet::scan(plugin.docs_dir())?;
        plugin.discover_files(&mut files)?;

        let pages = files
            .iter()
            .filter(|f| f.src_path().rsplit('/').next() == Some(crumbs_site::INDEX_FILENAME))
            .count();
        output.success(&format!("{pages} index pages, {} files published", files.len()));
        Ok(())
    }
}
