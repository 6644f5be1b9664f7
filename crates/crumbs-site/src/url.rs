//! URL path segmentation and link building.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped when a filesystem name becomes a URL path segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A page URL split into its non-empty segments, root first.
///
/// The last segment is the current page's own label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagePath {
    segments: Vec<String>,
}

impl PagePath {
    /// Split a page URL on `/`, dropping empty segments.
    ///
    /// Never fails: `""`, `"/"` and `"//"` all yield an empty path.
    #[must_use]
    pub fn parse(url: &str) -> Self {
        Self {
            segments: url
                .split('/')
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
        }
    }

    /// Raw (still percent-encoded) segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Ancestor segments paired with the accumulated path up to and including them.
    ///
    /// For `guide/setup/install` yields `("guide", "guide")` and
    /// `("setup", "guide/setup")`.
    pub fn ancestors(&self) -> impl Iterator<Item = (&str, String)> {
        let count = self.segments.len().saturating_sub(1);
        (0..count).map(move |i| (self.segments[i].as_str(), self.segments[..=i].join("/")))
    }

    /// The current page's segment, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

/// Percent-decode a URL segment for display.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
#[must_use]
pub fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Percent-encode each segment of a `/`-separated relative path.
#[must_use]
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT_ENCODE_SET).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Absolute site link to a directory-style URL.
///
/// - `site_link("", "")` -> `/`
/// - `site_link("", "guide")` -> `/guide/`
/// - `site_link("kb", "guide")` -> `/kb/guide/`
#[must_use]
pub fn site_link(base_url: &str, path: &str) -> String {
    match (base_url.is_empty(), path.is_empty()) {
        (true, true) => "/".to_owned(),
        (true, false) => format!("/{path}/"),
        (false, true) => format!("/{base_url}/"),
        (false, false) => format!("/{base_url}/{path}/"),
    }
}

/// Convert a docs-relative markdown path to its page URL.
///
/// Examples:
/// - `index.md` -> `""`
/// - `guide.md` -> `"guide/"`
/// - `domain/index.md` -> `"domain/"`
/// - `domain/setup.md` -> `"domain/setup/"`
#[must_use]
pub fn page_url(src_path: &str) -> String {
    let without_ext = src_path.strip_suffix(".md").unwrap_or(src_path);

    let path_part = if without_ext == "index" {
        ""
    } else if let Some(without_index) = without_ext.strip_suffix("/index") {
        without_index
    } else {
        without_ext
    };

    if path_part.is_empty() {
        String::new()
    } else {
        format!("{}/", encode_path(path_part))
    }
}
