//! Directory-listing page parsing

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

const PARENT_DIRECTORY: &str = "Parent Directory";

static LINK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<link[^>]*>").expect("Invalid link tag regex"));

static CELL_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<td[^>]*>\s*<a\s[^>]*?href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#)
        .expect("Invalid listing anchor regex")
});

/// Entries linked from one listing page, in page order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub directories: Vec<Url>,
    pub files: Vec<Url>,
}

/// Extract the table-cell links of a listing page
///
/// The parent-directory link is skipped and targets are resolved against
/// `page`. Targets that cannot be resolved are dropped.
#[must_use]
pub fn parse_listing(page: &Url, html: &str) -> Listing {
    let cleaned = LINK_TAG.replace_all(html, "").replace("&nbsp;", "");
    let mut listing = Listing::default();

    for captures in CELL_ANCHOR.captures_iter(&cleaned) {
        let (Some(href), Some(text)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        if text.as_str().trim() == PARENT_DIRECTORY {
            continue;
        }

        let Ok(target) = page.join(href.as_str().trim()) else {
            tracing::debug!(page = %page, href = href.as_str(), "unresolvable listing link");
            continue;
        };

        if target.path().ends_with('/') {
            listing.directories.push(target);
        } else {
            listing.files.push(target);
        }
    }

    listing
}
