//! Breadcrumb trail generation.
//!
//! A trail is derived purely from a page URL: every ancestor segment becomes
//! a link when a document resolves at its accumulated path, the last segment
//! is the current page label, and a `Home` link leads the trail.
//!
//! ```text
//! guide/setup/install  ->  [Home](/) / [guide](/guide/) / [setup](/guide/setup/) / install
//! ```

use crumbs_config::Config;

use crate::resolver::DocumentResolver;
use crate::url::{PagePath, decode_segment, encode_path, site_link};

/// Label of the leading trail entry.
const HOME_LABEL: &str = "Home";

/// Settings controlling breadcrumb rendering.
#[derive(Clone, Debug)]
pub struct BreadcrumbSettings {
    /// String placed between segments.
    pub delimiter: String,
    /// Base URL prefix without surrounding slashes (empty for site root).
    pub base_url: String,
    /// Tooltip attached to segments without a document.
    pub tooltip_message: Option<String>,
    /// Link a directory without its own document to its first markdown file.
    pub link_first_document: bool,
}

impl Default for BreadcrumbSettings {
    fn default() -> Self {
        Self {
            delimiter: " / ".to_owned(),
            base_url: String::new(),
            tooltip_message: None,
            link_first_document: false,
        }
    }
}

impl BreadcrumbSettings {
    /// Settings taken from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            delimiter: config.breadcrumbs.delimiter.clone(),
            base_url: config.base_url(),
            tooltip_message: config
                .breadcrumbs
                .tooltip_message
                .clone()
                .filter(|m| !m.is_empty()),
            link_first_document: config.breadcrumbs.link_first_document,
        }
    }
}

/// One entry of a breadcrumb trail, excluding `Home`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BreadcrumbSegment {
    /// Ancestor with a resolvable document.
    Link { label: String, target: String },
    /// Ancestor with no document behind it.
    Unresolved { label: String },
    /// The page itself.
    Current { label: String },
}

impl BreadcrumbSegment {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Link { label, .. } | Self::Unresolved { label } | Self::Current { label } => {
                label
            }
        }
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Link { target, .. } => Some(target),
            Self::Unresolved { .. } | Self::Current { .. } => None,
        }
    }

    #[must_use]
    pub fn is_clickable(&self) -> bool {
        matches!(self, Self::Link { .. })
    }

    fn render(&self, tooltip: Option<&str>) -> String {
        match (self, tooltip) {
            (Self::Link { label, target }, _) => {
                format!("[{}]({target})", escape_link_label(label))
            }
            (Self::Unresolved { label }, Some(message)) => format!(
                "<span title=\"{}\">{}</span>",
                escape_attribute(message),
                escape_text(label)
            ),
            (Self::Unresolved { label } | Self::Current { label }, _) => escape_text(label),
        }
    }
}

/// A generated breadcrumb trail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreadcrumbTrail {
    /// Target of the `Home` link.
    pub home: String,
    /// Ancestors followed by the current page, root first.
    pub segments: Vec<BreadcrumbSegment>,
}

impl BreadcrumbTrail {
    /// Build the trail for a page URL.
    ///
    /// Never fails: an empty URL yields a trail with only `Home`.
    pub fn build(
        url: &str,
        settings: &BreadcrumbSettings,
        resolver: &(impl DocumentResolver + ?Sized),
    ) -> Self {
        let page_path = PagePath::parse(url);
        let mut segments = Vec::with_capacity(page_path.len());

        for (raw, accumulated) in page_path.ancestors() {
            let label = decode_segment(raw);
            let segment = match resolve_target(&accumulated, settings, resolver) {
                Some(target) => BreadcrumbSegment::Link {
                    label,
                    target: site_link(&settings.base_url, &target),
                },
                None => BreadcrumbSegment::Unresolved { label },
            };
            tracing::debug!(
                url = %url,
                path = %accumulated,
                segment = %segment.label(),
                clickable = segment.is_clickable(),
                "Resolved breadcrumb segment"
            );
            segments.push(segment);
        }

        if let Some(current) = page_path.current() {
            let label = decode_segment(current.strip_suffix(".md").unwrap_or(current));
            tracing::debug!(url = %url, segment = %label, "Current page segment");
            segments.push(BreadcrumbSegment::Current { label });
        }

        Self {
            home: site_link(&settings.base_url, ""),
            segments,
        }
    }

    /// Render as a markdown line: `Home` link, then segments joined by the delimiter.
    #[must_use]
    pub fn render(&self, settings: &BreadcrumbSettings) -> String {
        let tooltip = settings.tooltip_message.as_deref();
        let mut parts = Vec::with_capacity(self.segments.len() + 1);
        parts.push(format!("[{HOME_LABEL}]({})", self.home));
        parts.extend(self.segments.iter().map(|s| s.render(tooltip)));
        parts.join(&settings.delimiter)
    }
}

/// Link target path (encoded, relative to the base URL) for an ancestor.
///
/// `accumulated` is the still-encoded URL path. The ancestor links to itself
/// when `<path>.md` or `<path>/index.md` exists; otherwise, if enabled, to
/// the first markdown document under it.
fn resolve_target(
    accumulated: &str,
    settings: &BreadcrumbSettings,
    resolver: &(impl DocumentResolver + ?Sized),
) -> Option<String> {
    let decoded = decode_segment(accumulated);

    if resolver.has_document(&format!("{decoded}.md"))
        || resolver.has_document(&format!("{decoded}/index.md"))
    {
        return Some(accumulated.to_owned());
    }

    if settings.link_first_document {
        let first = resolver.first_document(&decoded)?;
        let without_ext = first.strip_suffix(".md").unwrap_or(&first);
        let target = without_ext.strip_suffix("/index").unwrap_or(without_ext);
        return Some(encode_path(target));
    }

    None
}

/// Escape decoded label text so it cannot open HTML tags.
fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Link text additionally escapes brackets so `]` cannot close the link early.
fn escape_link_label(value: &str) -> String {
    escape_text(value).replace('[', "\\[").replace(']', "\\]")
}
