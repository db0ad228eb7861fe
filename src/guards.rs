//! Content floors for generated pages.
//!
//! A page that ships with too little prose or too few internal links is worse
//! than no page at all, so every guarded page is measured after rendering and
//! rejected before anything is written. Each page kind has its own floor
//! (see [`crate::config::ThresholdsConfig`]).
//!
//! The measurements work on the final HTML string:
//!
//! - **Words**: `<script>` and `<style>` blocks removed, remaining tags
//!   removed, whitespace-separated tokens counted.
//! - **Internal links**: `<a href="…">` whose target starts with `/` or
//!   mentions the site host.
//! - **Description**: a non-empty `<meta name="description" content="…">`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static ANCHOR_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<a\s[^>]*?href\s*=\s*"([^"]*)""#).unwrap());

static META_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+name\s*=\s*"description"\s+content\s*=\s*"([^"]*)""#).unwrap()
});

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GuardError {
    #[error("{page}: {found} words, at least {required} required")]
    TooFewWords {
        page: String,
        found: usize,
        required: usize,
    },
    #[error("{page}: {found} internal links, at least {required} required")]
    TooFewLinks {
        page: String,
        found: usize,
        required: usize,
    },
    #[error("{page}: missing meta description")]
    MissingDescription { page: String },
}

/// Minimum content for one kind of page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageThresholds {
    pub min_words: usize,
    pub min_links: usize,
}

/// What a finished page measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageStats {
    pub words: usize,
    pub internal_links: usize,
    pub has_description: bool,
}

impl PageStats {
    pub fn measure(html: &str, site_host: &str) -> Self {
        Self {
            words: count_words(html),
            internal_links: count_internal_links(html, site_host),
            has_description: has_meta_description(html),
        }
    }

    /// Every floor this page misses, in words → links → description order.
    pub fn violations(&self, page: &str, thresholds: &PageThresholds) -> Vec<GuardError> {
        let mut errors = Vec::new();
        if self.words < thresholds.min_words {
            errors.push(GuardError::TooFewWords {
                page: page.to_string(),
                found: self.words,
                required: thresholds.min_words,
            });
        }
        if self.internal_links < thresholds.min_links {
            errors.push(GuardError::TooFewLinks {
                page: page.to_string(),
                found: self.internal_links,
                required: thresholds.min_links,
            });
        }
        if !self.has_description {
            errors.push(GuardError::MissingDescription {
                page: page.to_string(),
            });
        }
        errors
    }
}

/// Visible word count of an HTML document or fragment.
pub fn count_words(html: &str) -> usize {
    let without_scripts = SCRIPT_BLOCK.replace_all(html, " ");
    let text = TAG.replace_all(&without_scripts, " ");
    text.split_whitespace().count()
}

/// Anchors pointing inside the site: root-relative or naming the host.
pub fn count_internal_links(html: &str, site_host: &str) -> usize {
    let host = site_host.trim();
    ANCHOR_HREF
        .captures_iter(html)
        .filter(|caps| {
            let href = caps[1].trim();
            href.starts_with('/') || (!host.is_empty() && href.contains(host))
        })
        .count()
}

pub fn has_meta_description(html: &str) -> bool {
    META_DESCRIPTION
        .captures(html)
        .is_some_and(|caps| !caps[1].trim().is_empty())
}

/// Measure `html` and fail on the first floor it misses.
///
/// `page` identifies the page in the error (its URL, typically).
pub fn assert_page_thresholds(
    page: &str,
    html: &str,
    thresholds: &PageThresholds,
    site_host: &str,
) -> Result<PageStats, GuardError> {
    let stats = PageStats::measure(html, site_host);
    match stats.violations(page, thresholds).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(stats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "example.org";

    fn page(words: usize, links: usize, description: &str) -> String {
        let body = vec!["word"; words].join(" ");
        let anchors: String = (0..links)
            .map(|i| format!(r#"<a href="/names/n{i}/"></a>"#))
            .collect();
        format!(
            r#"<html><head><meta name="description" content="{description}"><title></title></head><body><p>{body}</p>{anchors}</body></html>"#
        )
    }

    #[test]
    fn counts_words_outside_tags() {
        assert_eq!(count_words("<p>Hello <b>brave</b> new   world</p>"), 4);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn script_and_style_blocks_do_not_count() {
        let html = r#"<p>one two</p><script type="module">let a = "x y z";</script><style>p { color: red }</style><p>three</p>"#;
        assert_eq!(count_words(html), 3);
    }

    #[test]
    fn counts_root_relative_and_host_links() {
        let html = r##"
            <a href="/names/emma/">Emma</a>
            <a class="x" href="https://example.org/letter/e/">E</a>
            <a href="https://elsewhere.com/">out</a>
            <a href="#top">top</a>
        "##;
        assert_eq!(count_internal_links(html, HOST), 2);
        assert_eq!(count_internal_links(html, ""), 1);
    }

    #[test]
    fn detects_meta_description() {
        assert!(has_meta_description(&page(1, 0, "About names")));
        assert!(!has_meta_description(&page(1, 0, "   ")));
        assert!(!has_meta_description("<html><head></head></html>"));
    }

    #[test]
    fn rejects_one_word_below_the_floor() {
        let thresholds = PageThresholds {
            min_words: 400,
            min_links: 0,
        };
        // <title></title> is empty, so the body words are the only words.
        let html = page(399, 0, "d");
        let err = assert_page_thresholds("/x/", &html, &thresholds, HOST).unwrap_err();
        assert_eq!(
            err,
            GuardError::TooFewWords {
                page: "/x/".to_string(),
                found: 399,
                required: 400
            }
        );
    }

    #[test]
    fn accepts_exactly_the_floor() {
        let thresholds = PageThresholds {
            min_words: 400,
            min_links: 12,
        };
        let stats = assert_page_thresholds("/x/", &page(400, 12, "d"), &thresholds, HOST).unwrap();
        assert_eq!(stats.words, 400);
        assert_eq!(stats.internal_links, 12);
    }

    #[test]
    fn rejects_too_few_links() {
        let thresholds = PageThresholds {
            min_words: 0,
            min_links: 12,
        };
        let err = assert_page_thresholds("/x/", &page(10, 11, "d"), &thresholds, HOST).unwrap_err();
        assert!(matches!(err, GuardError::TooFewLinks { found: 11, .. }));
        assert!(err.to_string().contains("/x/"));
    }

    #[test]
    fn rejects_missing_description() {
        let thresholds = PageThresholds {
            min_words: 0,
            min_links: 0,
        };
        let err = assert_page_thresholds("/x/", &page(10, 0, ""), &thresholds, HOST).unwrap_err();
        assert_eq!(
            err,
            GuardError::MissingDescription {
                page: "/x/".to_string()
            }
        );
    }

    #[test]
    fn violations_lists_every_miss() {
        let stats = PageStats {
            words: 1,
            internal_links: 1,
            has_description: false,
        };
        let thresholds = PageThresholds {
            min_words: 2,
            min_links: 2,
        };
        assert_eq!(stats.violations("/p/", &thresholds).len(), 3);
    }
}
