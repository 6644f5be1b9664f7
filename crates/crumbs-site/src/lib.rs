//! Breadcrumb trails and folder index pages for static documentation sites.
//!
//! This crate provides:
//! - [`BreadcrumbTrail`]: URL-derived breadcrumb navigation for a page
//! - [`IndexGenerator`]: `index.md` listings for every docs directory
//! - [`ExclusionMatcher`]: glob exclusions applied to generation and publishing
//! - [`MergedFolders`]: temporary merging of extra folders into the docs tree
//! - [`BreadcrumbsPlugin`]: the configure / discover / render pipeline tying it together
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use crumbs_config::Config;
//! use crumbs_site::{BreadcrumbsPlugin, FileSet};
//!
//! let config = Config::load(None, None)?;
//! let mut plugin = BreadcrumbsPlugin::configure(&config)?;
//!
//! let mut files = FileSet::scan(plugin.docs_dir())?;
//! plugin.discover_files(&mut files)?;
//!
//! let page = plugin.render_page("guide/setup/install/", "# Install\n");
//! assert!(page.starts_with("[Home](/)"));
//! # Ok(())
//! # }
//! ```

mod breadcrumb;
mod error;
mod exclude;
mod files;
mod index;
mod merge;
mod plugin;
mod resolver;
mod url;

pub use breadcrumb::{BreadcrumbSegment, BreadcrumbSettings, BreadcrumbTrail};
pub use error::BuildError;
pub use exclude::ExclusionMatcher;
pub use files::{FileOrigin, FileSet, SourceFile};
pub use index::{GeneratedIndex, INDEX_FILENAME, IndexEntry, IndexGenerator, render_index};
pub use merge::MergedFolders;
pub use plugin::BreadcrumbsPlugin;
pub use resolver::{DocumentResolver, FileSetResolver, FsResolver};
pub use url::{PagePath, decode_segment, page_url, site_link};
