//! `crumbs build` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use crumbs_site::{BreadcrumbsPlugin, FileOrigin, FileSet};

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Output directory for processed pages.
    #[arg(short, long, default_value = "site")]
    output_dir: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;

        let mut plugin = BreadcrumbsPlugin::configure(&config)?;

        output.info(&format!("Source: {}", plugin.docs_dir().display()));
        output.info(&format!("Output: {}", self.output_dir.display()));

        let mut files = FileSet::scan(plugin.docs_dir())?;
        plugin.discover_files(&mut files)?;

        let pages = write_site(&plugin, &files, &self.output_dir)?;

        output.success(&format!(
            "Wrote {pages} pages ({} files) to {}",
            files.len(),
            self.output_dir.display()
        ));
        Ok(())
    }
}

/// Write every published file under `output_dir`.
///
/// Markdown pages get their breadcrumb trail prepended; other files are
/// copied unchanged. Returns the number of markdown pages written.
fn write_site(
    plugin: &BreadcrumbsPlugin,
    files: &FileSet,
    output_dir: &Path,
) -> Result<usize, CliError> {
    let mut pages = 0;

    for file in files {
        let dest = output_dir.join(file.src_path());
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| CliError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        if file.is_markdown() {
            let body = file.read()?;
            let page = plugin.render_page(&file.url(), &body);
            fs::write(&dest, page).map_err(|source| CliError::Io {
                path: dest.clone(),
                source,
            })?;
            pages += 1;
            continue;
        }

        let written = match file.origin() {
            FileOrigin::Disk(path) => fs::copy(path, &dest).map(|_| ()),
            FileOrigin::Generated(content) => fs::write(&dest, content),
        };
        written.map_err(|source| CliError::Io { path: dest, source })?;
    }

    tracing::debug!(pages, "Wrote site");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumbs_config::Config;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_site_prepends_breadcrumbs_and_copies_assets() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        let out = dir.path().join("site");
        fs::create_dir_all(docs.join("guide/img")).unwrap();
        fs::write(docs.join("guide/install.md"), "# Install\n").unwrap();
        fs::write(docs.join("guide/img/shot.png"), [1u8, 2, 3]).unwrap();

        let mut config = Config::default();
        config.docs_resolved.source_dir = docs.clone();

        let mut plugin = BreadcrumbsPlugin::configure(&config).unwrap();
        let mut files = FileSet::scan(&docs).unwrap();
        plugin.discover_files(&mut files).unwrap();

        let pages = write_site(&plugin, &files, &out).unwrap();

        // guide/install.md plus generated index pages for /, guide, guide/img
        assert_eq!(pages, 4);
        assert_eq!(
            fs::read_to_string(out.join("guide/install.md")).unwrap(),
            "[Home](/) / [guide](/guide/) / install\n# Install\n"
        );
        assert_eq!(
            fs::read_to_string(out.join("guide/index.md")).unwrap(),
            "[Home](/) / guide\n# Index of guide\n\n- [img/](/guide/img/)\n- [install](install)\n"
        );
        assert_eq!(
            fs::read_to_string(out.join("index.md")).unwrap(),
            "[Home](/)\n# Index of /\n\n- [guide/](/guide/)\n"
        );
        assert_eq!(fs::read(out.join("guide/img/shot.png")).unwrap(), [1u8, 2, 3]);
    }
}
