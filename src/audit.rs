//! Audit of an already built site.
//!
//! The build refuses to write thin pages, but an output directory can drift:
//! hand edits, stale pages from older datasets, a build made with lower
//! floors. The audit re-measures every `index.html` under the output
//! directory against the current thresholds, classifying each page by its
//! first URL segment.

use crate::config::ThresholdsConfig;
use crate::guards::{GuardError, PageStats};
use crate::types::PageKind;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Output directory not found: {0}")]
    MissingOutput(PathBuf),
}

/// One audited page.
#[derive(Debug, Clone)]
pub struct AuditedPage {
    pub url: String,
    pub kind: PageKind,
    pub stats: PageStats,
}

#[derive(Debug, Default)]
pub struct AuditReport {
    pub pages: Vec<AuditedPage>,
    pub violations: Vec<GuardError>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn pages_by_kind(&self) -> BTreeMap<PageKind, usize> {
        let mut counts = BTreeMap::new();
        for page in &self.pages {
            *counts.entry(page.kind).or_default() += 1;
        }
        counts
    }
}

/// `dist/names/emma/index.html` → `/names/emma/`.
fn url_for(output_dir: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(output_dir).unwrap_or(file);
    let dir = rel.parent().unwrap_or(Path::new(""));
    let segments: Vec<String> = dir
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Measure every page under `output_dir`.
pub fn audit(
    output_dir: &Path,
    thresholds: &ThresholdsConfig,
    site_host: &str,
) -> Result<AuditReport, AuditError> {
    if !output_dir.is_dir() {
        return Err(AuditError::MissingOutput(output_dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(output_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == "index.html")
        .map(|e| e.into_path())
        .collect();
    files.sort();

    let mut report = AuditReport::default();
    for file in files {
        let html = fs::read_to_string(&file)?;
        let url = url_for(output_dir, &file);
        let kind = PageKind::from_url_path(&url);
        let stats = PageStats::measure(&html, site_host);
        debug!(%url, words = stats.words, links = stats.internal_links, "audited");
        if let Some(t) = thresholds.for_kind(kind) {
            report.violations.extend(stats.violations(&url, t));
        }
        report.pages.push(AuditedPage { url, kind, stats });
    }
    Ok(report)
}
