//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what a line is about (a name, a pair, a page kind) and
//! puts numbers and paths after it as indented context. Indices are 1-based
//! and zero-padded so lists line up.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Dataset
//!     names.json: 412 names (198 girl, 171 boy, 43 unisex)
//!     surnames.json: 60 surnames
//!     popularity.json: 3120 rows, 4 countries
//!     categories.json: 880 rows, 14 styles
//!     variants.json: 22 slots, 96 templates
//!     pages/: 2 pages
//! Site
//!     Name Atlas → https://example.com
//! ```
//!
//! ## Score
//!
//! ```text
//! Emma Smith
//!     Smoothness: 100/100 (Excellent Flow)
//!     Tagged score: 2.50   Global score: 3.00
//!     Syllables: 2 + 1
//!     + syllable_contrast  The longer rhythm of Emma sets off the single beat of Smith.
//!     + vowel_consonant     Emma ends on a vowel and Smith opens on a consonant, ...
//! ```
//!
//! ## Siblings
//!
//! ```text
//! Siblings for Emma
//! 001 Ella      88/100 Natural Pair
//!     origin 30  rhythm 25  popularity 20  length 15  style 0
//! Contrasting
//! 001 Bartholomew   clash 92
//! ```
//!
//! ## Build
//!
//! ```text
//! name profiles   412 → names/<slug>/index.html
//! ...
//! Generated 1287 pages: 1287 created, 0 updated, 0 unchanged (1289 total)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::audit::AuditReport;
use crate::compat::{self, FlowTier, Profile, Spelled};
use crate::dataset::Dataset;
use crate::generate::GenerateReport;
use crate::harmony::{self, Harmony};
use crate::types::{Gender, NameRecord, PageKind};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

/// Output location pattern for a page kind.
fn route_pattern(kind: PageKind) -> &'static str {
    match kind {
        PageKind::Index => "index.html",
        PageKind::NameProfile => "names/<slug>/index.html",
        PageKind::NamesLike => "names-like/<slug>/index.html",
        PageKind::Sibling => "sibling-names/<slug>/index.html",
        PageKind::Surname => "surnames/<slug>/index.html",
        PageKind::Filter => "{gender,letter,country,style}/<value>/index.html",
        PageKind::Legal => "<slug>/index.html",
    }
}

fn components_line(h: &Harmony) -> String {
    let c = &h.components;
    format!(
        "origin {}  rhythm {}  popularity {}  length {}  style {}",
        c.origin, c.rhythm, c.popularity, c.length, c.style
    )
}

// ============================================================================
// Check
// ============================================================================

/// Summary of a loaded dataset and its site settings.
pub fn format_dataset_summary(data: &Dataset) -> Vec<String> {
    let mut lines = Vec::new();
    let by_gender: Vec<String> = Gender::ALL
        .iter()
        .map(|g| {
            let count = data.names.iter().filter(|n| n.gender == *g).count();
            format!("{} {}", count, g.as_str())
        })
        .collect();

    lines.push("Dataset".to_string());
    lines.push(format!(
        "{}names.json: {} names ({})",
        indent(1),
        data.names.len(),
        by_gender.join(", ")
    ));
    lines.push(format!(
        "{}surnames.json: {} surnames",
        indent(1),
        data.surnames.len()
    ));
    lines.push(format!(
        "{}popularity.json: {} rows, {} countries",
        indent(1),
        data.popularity.len(),
        data.popularity_countries().len()
    ));
    lines.push(format!(
        "{}categories.json: {} rows, {} styles",
        indent(1),
        data.categories.len(),
        data.style_names().len()
    ));
    lines.push(format!(
        "{}variants.json: {} slots, {} templates",
        indent(1),
        data.variants.slot_names().count(),
        data.variants.template_count()
    ));
    lines.push(format!("{}pages/: {} pages", indent(1), data.pages.len()));

    let site = &data.config.site;
    lines.push("Site".to_string());
    lines.push(format!("{}{} \u{2192} {}", indent(1), site.name, site.base_url()));
    lines
}

pub fn print_dataset_summary(data: &Dataset) {
    for line in format_dataset_summary(data) {
        println!("{}", line);
    }
}

// ============================================================================
// Score
// ============================================================================

/// Compatibility breakdown for one first name × surname pair.
pub fn format_score(first: &impl Spelled, surname: &impl Spelled) -> Vec<String> {
    let tagged = compat::score_pair(first, surname, Profile::Tagged);
    let global = compat::global_score(first, surname);
    let smooth = compat::smoothness(tagged.score);
    let (first_name, last_name) = (first.spelling().trim(), surname.spelling().trim());

    let mut lines = vec![
        format!("{} {}", first_name, last_name),
        format!(
            "{}Smoothness: {}/100 ({})",
            indent(1),
            smooth,
            FlowTier::from_smoothness(smooth).label()
        ),
        format!(
            "{}Tagged score: {:.2}   Global score: {:.2}",
            indent(1),
            tagged.score,
            global
        ),
        format!(
            "{}Syllables: {} + {}",
            indent(1),
            first.syllables(),
            surname.syllables()
        ),
    ];
    for reason in &tagged.reasons {
        let sign = if reason.is_bonus() { '+' } else { '-' };
        lines.push(format!(
            "{}{} {:<18}  {}",
            indent(1),
            sign,
            reason.as_str(),
            reason.explain(first_name, last_name)
        ));
    }
    if tagged.reasons.is_empty() {
        lines.push(format!("{}No rules fired", indent(1)));
    }
    lines
}

pub fn print_score(first: &impl Spelled, surname: &impl Spelled) {
    for line in format_score(first, surname) {
        println!("{}", line);
    }
}

// ============================================================================
// Siblings
// ============================================================================

/// Best sibling matches and the strongest contrasts for one name.
pub fn format_siblings(data: &Dataset, base: &NameRecord) -> Vec<String> {
    let limits = &data.config.limits;
    let index = data.index();
    let matches = harmony::top_matches(base, &data.names, index, limits.sibling_matches);
    let clashes = harmony::clashing_names(base, &data.names, index, limits.clashing_names);

    let mut lines = vec![format!("Siblings for {}", base.name)];
    if matches.is_empty() {
        lines.push(format!("{}No other names in the dataset", indent(1)));
    }
    for (i, m) in matches.iter().enumerate() {
        lines.push(format!(
            "{} {:<12} {:>3}/100 {}",
            format_index(i + 1),
            m.record.name,
            m.harmony.score,
            m.harmony.tier().label()
        ));
        lines.push(format!("{}{}", indent(1), components_line(&m.harmony)));
        if let Some(meaning) = &m.record.meaning {
            lines.push(format!("{}Meaning: {}", indent(1), truncate_desc(meaning, 60)));
        }
    }

    if !clashes.is_empty() {
        lines.push("Contrasting".to_string());
        for (i, c) in clashes.iter().enumerate() {
            lines.push(format!(
                "{} {:<12} clash {}",
                format_index(i + 1),
                c.record.name,
                c.clash
            ));
        }
    }
    lines
}

pub fn print_siblings(data: &Dataset, base: &NameRecord) {
    for line in format_siblings(data, base) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Pages per kind and what the ledger did with them.
pub fn format_generate_report(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (kind, count) in &report.pages {
        lines.push(format!(
            "{:<15} {:>5} \u{2192} {}",
            kind.label(),
            count,
            route_pattern(*kind)
        ));
    }
    if !report.stale.is_empty() {
        lines.push(format!(
            "Stale: {} files from earlier builds left in place",
            report.stale.len()
        ));
        for path in &report.stale {
            lines.push(format!("{}{}", indent(1), path));
        }
    }
    lines.push(format!(
        "Generated {} pages: {}",
        report.total_pages(),
        report.ledger
    ));
    lines
}

pub fn print_generate_report(report: &GenerateReport) {
    for line in format_generate_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Audit
// ============================================================================

pub fn format_audit_report(report: &AuditReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (kind, count) in report.pages_by_kind() {
        lines.push(format!("{:<15} {:>5} pages", kind.label(), count));
    }
    if report.is_clean() {
        lines.push(format!("Audited {} pages: no violations", report.pages.len()));
    } else {
        lines.push(format!(
            "Audited {} pages: {} violations",
            report.pages.len(),
            report.violations.len()
        ));
        for (i, violation) in report.violations.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(i + 1), violation));
        }
    }
    lines
}

pub fn print_audit_report(report: &AuditReport) {
    for line in format_audit_report(report) {
        println!("{}", line);
    }
}
