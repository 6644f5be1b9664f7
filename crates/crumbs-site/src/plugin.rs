//! Three-phase build pipeline.
//!
//! A host build drives [`BreadcrumbsPlugin`] in a fixed order:
//!
//! 1. [`configure`](BreadcrumbsPlugin::configure) once, from the loaded config
//! 2. [`discover_files`](BreadcrumbsPlugin::discover_files) once, before rendering
//! 3. [`render_page`](BreadcrumbsPlugin::render_page) for every markdown page

use std::path::{Path, PathBuf};

use crumbs_config::Config;

use crate::breadcrumb::{BreadcrumbSettings, BreadcrumbTrail};
use crate::error::BuildError;
use crate::exclude::ExclusionMatcher;
use crate::files::{FileSet, SourceFile};
use crate::index::IndexGenerator;
use crate::merge::MergedFolders;
use crate::resolver::{FileSetResolver, FsResolver};

/// Derived per-build state of the breadcrumbs and index plugin.
#[derive(Debug)]
pub struct BreadcrumbsPlugin {
    docs_dir: PathBuf,
    settings: BreadcrumbSettings,
    matcher: ExclusionMatcher,
    additional_folders: Vec<PathBuf>,
    generate_home_index: bool,
    /// Published markdown documents, known once discovery has run.
    published: Option<FileSetResolver>,
}

impl BreadcrumbsPlugin {
    /// Derive build state from configuration.
    ///
    /// # Errors
    ///
    /// Fails on an invalid log level or exclusion pattern.
    pub fn configure(config: &Config) -> Result<Self, BuildError> {
        let log_level = config.log_level()?;
        tracing::info!(level = %log_level, "Log level set");

        let docs_dir = config.docs_resolved.source_dir.clone();
        let matcher = ExclusionMatcher::new(&docs_dir, &config.index_resolved.exclude_paths)?;
        let settings = BreadcrumbSettings::from_config(config);

        tracing::debug!(
            docs_dir = %docs_dir.display(),
            base_url = %settings.base_url,
            "Configured breadcrumbs"
        );

        Ok(Self {
            docs_dir,
            settings,
            matcher,
            additional_folders: config.index_resolved.additional_folders.clone(),
            generate_home_index: config.index_resolved.generate_home_index,
            published: None,
        })
    }

    #[must_use]
    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    #[must_use]
    pub fn settings(&self) -> &BreadcrumbSettings {
        &self.settings
    }

    /// Merge additional folders, generate index pages and filter the file set.
    ///
    /// Merged copies are removed from the docs directory before returning,
    /// whether or not generation succeeded. Files from merged folders and
    /// generated index pages stay readable through their [`SourceFile`]
    /// origin.
    ///
    /// # Errors
    ///
    /// Propagates the first merge, listing or write failure.
    pub fn discover_files(&mut self, files: &mut FileSet) -> Result<(), BuildError> {
        let mut merged = MergedFolders::new();
        let result = self.merge_and_generate(&mut merged, files);
        merged.cleanup();
        result?;

        let before = files.len();
        files.retain(|file| !self.matcher.is_excluded_relative(file.src_path()));
        tracing::info!(
            files = files.len(),
            excluded = before - files.len(),
            "Discovered files"
        );

        self.published = Some(FileSetResolver::from_files(files));
        Ok(())
    }

    fn merge_and_generate(
        &self,
        merged: &mut MergedFolders,
        files: &mut FileSet,
    ) -> Result<(), BuildError> {
        for folder in &self.additional_folders {
            merged.merge(folder, &self.docs_dir, &self.matcher, files)?;
        }

        let generated = IndexGenerator::new(&self.docs_dir, &self.settings.base_url, &self.matcher)
            .with_home_index(self.generate_home_index)
            .generate()?;

        for page in generated {
            files.insert(SourceFile::generated(page.src_path, page.content));
        }
        Ok(())
    }

    /// Breadcrumb trail for a page URL.
    ///
    /// Ancestors resolve against the published file set after discovery,
    /// and against the docs directory before it.
    #[must_use]
    pub fn trail(&self, url: &str) -> BreadcrumbTrail {
        match &self.published {
            Some(resolver) => BreadcrumbTrail::build(url, &self.settings, resolver),
            None => BreadcrumbTrail::build(url, &self.settings, &FsResolver::new(&self.docs_dir)),
        }
    }

    /// Prefix a page's markdown with its breadcrumb trail.
    #[must_use]
    pub fn render_page(&self, url: &str, markdown: &str) -> String {
        let trail = self.trail(url).render(&self.settings);
        format!("{trail}\n{markdown}")
    }
}
