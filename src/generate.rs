//! HTML site generation.
//!
//! Second stage of the build. Takes a loaded [`Dataset`] and produces the
//! final static site.
//!
//! ## Generated Pages
//!
//! - **Index** (`/index.html`): entry points into every listing
//! - **Name profiles** (`/names/<slug>/`): facts, analysis, sibling and surname previews
//! - **Names like** (`/names-like/<slug>/`): same-gender names ranked by harmony
//! - **Sibling names** (`/sibling-names/<slug>/`): harmony breakdown and clashing names
//! - **Surname matches** (`/surnames/<slug>/`): first names ranked by flow with a surname
//! - **Filters** (`/gender/<g>/`, `/letter/<a-z>/`, `/country/<code>/`, `/style/<slug>/`)
//! - **Legal pages** (`/<slug>/`): Markdown from `data/pages/`
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── names/emma/index.html
//! ├── names-like/emma/index.html
//! ├── sibling-names/emma/index.html
//! ├── surnames/smith/index.html
//! ├── gender/girl/index.html
//! ├── letter/e/index.html
//! ├── country/us/index.html
//! ├── style/classic/index.html
//! ├── privacy/index.html
//! ├── sitemap.xml
//! ├── robots.txt
//! └── .build-manifest.json
//! ```
//!
//! ## Determinism
//!
//! Prose comes from the variant library, seeded by the page subject, and
//! every list is built from dataset order with stable sorts. Pages render in
//! parallel, then are sorted by URL, so the thread count never shows in the
//! output. All guarded pages are measured before the first byte is written.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Dataset strings and rendered templates are interpolated as text, so they
//! are always escaped.

use crate::cache::{BuildLedger, LedgerStats};
use crate::compat::{self, FlowTier, Profile, Spelled};
use crate::dataset::{Dataset, StaticPage};
use crate::guards::{GuardError, PageStats};
use crate::harmony::{self, HarmonyMatch};
use crate::naming::slugify;
use crate::sitemap;
use crate::types::{Gender, NameRecord, PageKind, SurnameRecord};
use crate::variants::{self, BlockOrder, Context};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Content floor not met: {0}")]
    Guard(#[from] GuardError),
}

const CSS: &str = "\
:root{--ink:#1f2430;--muted:#5b6272;--accent:#8a4fff;--line:#e3e5ea}
body{margin:0;font:17px/1.6 system-ui,sans-serif;color:var(--ink)}
main,.site-header,.site-footer{max-width:46rem;margin:0 auto;padding:1rem}
a{color:var(--accent)}
.site-header{display:flex;justify-content:space-between;border-bottom:1px solid var(--line)}
.site-footer{border-top:1px solid var(--line);color:var(--muted);font-size:.9rem}
.site-footer nav{margin:.5rem 0}
.site-footer a{margin-right:.5rem}
.facts dt{font-weight:600}
.score{font-variant-numeric:tabular-nums}
table{border-collapse:collapse}
td,th{padding:.25rem .75rem;border-bottom:1px solid var(--line);text-align:left}
";

/// One finished page, not yet written.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Site-relative URL, always with a trailing slash (`/names/emma/`).
    pub url: String,
    pub kind: PageKind,
    pub html: String,
}

impl RenderedPage {
    /// Path of the HTML file relative to the output directory.
    pub fn rel_path(&self) -> String {
        let trimmed = self.url.trim_matches('/');
        if trimmed.is_empty() {
            "index.html".to_string()
        } else {
            format!("{trimmed}/index.html")
        }
    }
}

/// Outcome of a successful build.
#[derive(Debug, Serialize)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    /// Page count per kind.
    pub pages: BTreeMap<PageKind, usize>,
    pub ledger: LedgerStats,
    /// Ledger entries from earlier builds that this build no longer produces.
    pub stale: Vec<String>,
}

impl GenerateReport {
    pub fn total_pages(&self) -> usize {
        self.pages.values().sum()
    }
}

/// Render, check and write the whole site.
pub fn generate(data: &Dataset, output_dir: &Path) -> Result<GenerateReport, GenerateError> {
    let pages = render_site(data);
    check_pages(data, &pages)?;

    std::fs::create_dir_all(output_dir)?;
    let mut ledger = BuildLedger::load(output_dir);
    let mut stats = LedgerStats::default();
    let mut counts: BTreeMap<PageKind, usize> = BTreeMap::new();
    let mut written: Vec<String> = Vec::with_capacity(pages.len() + 2);

    for page in &pages {
        let rel = page.rel_path();
        let status = ledger.write(output_dir, &rel, page.html.as_bytes())?;
        debug!(url = %page.url, ?status, "page");
        stats.record(status);
        *counts.entry(page.kind).or_default() += 1;
        written.push(rel);
    }

    let base_url = data.config.site.base_url();
    let urls: Vec<&str> = pages.iter().map(|p| p.url.as_str()).collect();
    for (rel, body) in [
        ("sitemap.xml", sitemap::sitemap_xml(&base_url, &urls)),
        ("robots.txt", sitemap::robots_txt(&base_url)),
    ] {
        stats.record(ledger.write(output_dir, rel, body.as_bytes())?);
        written.push(rel.to_string());
    }

    let stale = ledger.retain_paths(written.iter().map(String::as_str));
    for path in &stale {
        warn!(path = %path, "no longer generated; left on disk");
    }
    ledger.save(output_dir)?;

    Ok(GenerateReport {
        output_dir: output_dir.to_path_buf(),
        pages: counts,
        ledger: stats,
        stale,
    })
}

/// Render every page, sorted by URL.
pub fn render_site(data: &Dataset) -> Vec<RenderedPage> {
    let site = Site::new(data);
    let specs = site.plan();
    let mut pages: Vec<RenderedPage> = specs.par_iter().map(|spec| site.render(spec)).collect();
    pages.sort_by(|a, b| a.url.cmp(&b.url));
    pages
}

/// Measure every guarded page. Each violation is logged; the first one is
/// returned.
pub fn check_pages(data: &Dataset, pages: &[RenderedPage]) -> Result<(), GuardError> {
    let host = data.config.site.host.as_str();
    let mut first: Option<GuardError> = None;
    for page in pages {
        let Some(thresholds) = data.config.thresholds.for_kind(page.kind) else {
            continue;
        };
        for violation in PageStats::measure(&page.html, host).violations(&page.url, thresholds) {
            warn!(kind = page.kind.label(), "{violation}");
            first.get_or_insert(violation);
        }
    }
    match first {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

// ============================================================================
// Page plan
// ============================================================================

/// A listing page selecting names by one attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Filter<'a> {
    Gender(Gender),
    Letter(char),
    Country(&'a str),
    Style(&'a str),
}

#[derive(Debug, Clone, Copy)]
enum PageSpec<'a> {
    Index,
    Profile(&'a NameRecord),
    NamesLike(&'a NameRecord),
    Sibling(&'a NameRecord),
    Surname(&'a SurnameRecord),
    Filter(Filter<'a>),
    Legal(&'a StaticPage),
}

fn name_url(record: &NameRecord) -> String {
    format!("/names/{}/", slugify(&record.name))
}

fn names_like_url(record: &NameRecord) -> String {
    format!("/names-like/{}/", slugify(&record.name))
}

fn sibling_url(record: &NameRecord) -> String {
    format!("/sibling-names/{}/", slugify(&record.name))
}

fn surname_url(record: &SurnameRecord) -> String {
    format!("/surnames/{}/", slugify(&record.name))
}

fn gender_url(gender: Gender) -> String {
    format!("/gender/{}/", gender.as_str())
}

fn letter_url(letter: char) -> String {
    format!("/letter/{letter}/")
}

fn country_url(code: &str) -> String {
    format!("/country/{}/", slugify(code))
}

fn style_url(style: &str) -> String {
    format!("/style/{}/", slugify(style))
}

/// ASCII index letter for the `/letter/` pages, if the name has one.
fn letter_of(record: &NameRecord) -> Option<char> {
    slugify(&record.letter())
        .chars()
        .next()
        .filter(char::is_ascii_lowercase)
}

/// Shared state for rendering: the dataset plus the link targets every
/// footer and listing needs.
struct Site<'a> {
    data: &'a Dataset,
    /// Names that own their slug, in dataset order.
    names: Vec<&'a NameRecord>,
    surnames: Vec<&'a SurnameRecord>,
    letters: Vec<char>,
    genders: Vec<Gender>,
    countries: Vec<&'a str>,
    styles: Vec<&'a str>,
}

impl<'a> Site<'a> {
    fn new(data: &'a Dataset) -> Self {
        let names: Vec<&NameRecord> = data
            .names
            .iter()
            .filter(|n| data.name_by_slug(&n.name).is_some_and(|owner| owner.id == n.id))
            .collect();

        let mut seen = HashSet::new();
        let surnames: Vec<&SurnameRecord> = data
            .surnames
            .iter()
            .filter(|s| {
                let slug = slugify(&s.name);
                !slug.is_empty() && seen.insert(slug)
            })
            .collect();

        let letters: BTreeSet<char> = names.iter().filter_map(|n| letter_of(n)).collect();
        let genders = Gender::ALL
            .into_iter()
            .filter(|g| names.iter().any(|n| n.gender == *g))
            .collect();

        let mut seen = HashSet::new();
        let countries = data
            .popularity_countries()
            .into_iter()
            .filter(|c| {
                let slug = slugify(c);
                !slug.is_empty() && seen.insert(slug)
            })
            .collect();
        let mut seen = HashSet::new();
        let styles = data
            .style_names()
            .into_iter()
            .filter(|s| {
                let slug = slugify(s);
                !slug.is_empty() && seen.insert(slug)
            })
            .collect();

        Self {
            data,
            names,
            surnames,
            letters: letters.into_iter().collect(),
            genders,
            countries,
            styles,
        }
    }

    fn plan(&self) -> Vec<PageSpec<'a>> {
        let mut specs = vec![PageSpec::Index];
        for &name in &self.names {
            specs.push(PageSpec::Profile(name));
            specs.push(PageSpec::NamesLike(name));
            specs.push(PageSpec::Sibling(name));
        }
        specs.extend(self.surnames.iter().map(|&s| PageSpec::Surname(s)));
        specs.extend(self.genders.iter().map(|&g| PageSpec::Filter(Filter::Gender(g))));
        specs.extend(self.letters.iter().map(|&l| PageSpec::Filter(Filter::Letter(l))));
        specs.extend(
            self.countries
                .iter()
                .map(|&c| PageSpec::Filter(Filter::Country(c))),
        );
        specs.extend(self.styles.iter().map(|&s| PageSpec::Filter(Filter::Style(s))));
        specs.extend(self.data.pages.iter().map(PageSpec::Legal));
        specs
    }

    fn render(&self, spec: &PageSpec<'a>) -> RenderedPage {
        let (url, kind, markup) = match *spec {
            PageSpec::Index => ("/".to_string(), PageKind::Index, self.render_index()),
            PageSpec::Profile(n) => (name_url(n), PageKind::NameProfile, self.render_profile(n)),
            PageSpec::NamesLike(n) => (
                names_like_url(n),
                PageKind::NamesLike,
                self.render_names_like(n),
            ),
            PageSpec::Sibling(n) => (sibling_url(n), PageKind::Sibling, self.render_sibling(n)),
            PageSpec::Surname(s) => (surname_url(s), PageKind::Surname, self.render_surname(s)),
            PageSpec::Filter(f) => (
                self.filter_url(&f),
                PageKind::Filter,
                self.render_filter(&f),
            ),
            PageSpec::Legal(p) => (
                format!("/{}/", p.slug),
                PageKind::Legal,
                self.render_legal(p),
            ),
        };
        RenderedPage {
            url,
            kind,
            html: markup.into_string(),
        }
    }

    // ========================================================================
    // Shared components
    // ========================================================================

    fn base_document(&self, url: &str, title: &str, description: &str, content: Markup) -> Markup {
        let site = &self.data.config.site;
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (title) " | " (site.name) }
                    meta name="description" content=(description);
                    link rel="canonical" href={ (site.base_url()) (url) };
                    style { (PreEscaped(CSS)) }
                }
                body {
                    (self.site_header())
                    main { (content) }
                    (self.site_footer())
                }
            }
        }
    }

    fn site_header(&self) -> Markup {
        let site = &self.data.config.site;
        html! {
            header.site-header {
                a.brand href="/" { (site.name) }
                span.tagline { (site.tagline) }
            }
        }
    }

    fn site_footer(&self) -> Markup {
        html! {
            footer.site-footer {
                nav.letters aria-label="Names by letter" {
                    "Names by letter: "
                    @for &letter in &self.letters {
                        a href=(letter_url(letter)) { (letter.to_ascii_uppercase()) }
                    }
                }
                nav.genders aria-label="Names by gender" {
                    @for &gender in &self.genders {
                        a href=(gender_url(gender)) { (gender.label()) " names" }
                    }
                }
                @if !self.data.pages.is_empty() {
                    nav.legal {
                        @for page in &self.data.pages {
                            a href={ "/" (page.slug) "/" } { (page.title) }
                        }
                    }
                }
            }
        }
    }

    /// One paragraph from `slot`, or nothing when the slot is empty.
    fn prose(&self, slot: &str, seed: &str, ctx: &Context) -> Markup {
        let text = self.data.variants.render(slot, seed, ctx);
        paragraph(&text)
    }

    /// Closing paragraph, chosen with its own salt.
    fn closing(&self, slot: &str, seed: &str, ctx: &Context) -> Markup {
        let templates = self.data.variants.slot(slot);
        let text = templates
            .get(variants::closing_index(seed, templates.len()))
            .map(|t| variants::render(t, ctx))
            .unwrap_or_default();
        paragraph(&text)
    }

    fn name_link(&self, record: &NameRecord) -> Markup {
        html! { a href=(name_url(record)) { (record.name) } }
    }

    fn name_list_item(&self, record: &NameRecord) -> Markup {
        html! {
            li {
                (self.name_link(record))
                " ("
                (record.gender.label())
                ")"
                @if let Some(meaning) = record.meaning.as_deref().filter(|m| !m.trim().is_empty()) {
                    ": " (meaning)
                }
            }
        }
    }

    fn origin_of(&self, record: &'a NameRecord) -> Option<&'a str> {
        record
            .origin_country
            .as_deref()
            .or(record.language.as_deref())
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }

    fn name_context(&self, record: &'a NameRecord) -> Context {
        let index = self.data.index();
        Context::new()
            .with("NAME", &record.name)
            .with("GENDER", record.gender.as_str())
            .with("MEANING", record.meaning.as_deref().unwrap_or("a name of its own"))
            .with("ORIGIN", self.origin_of(record).unwrap_or("many traditions"))
            .with("SYLLABLES", record.syllables())
            .with("LETTER", record.letter().to_uppercase())
            .with("LENGTH", record.name.trim().chars().count())
            .with("BAND", index.band(record.id).label())
            .with("STYLE", index.primary_category(record.id).unwrap_or("timeless"))
            .with("SITE", &self.data.config.site.name)
    }

    /// Whether `record` has its own profile page.
    fn owns_slug(&self, record: &NameRecord) -> bool {
        self.names.iter().any(|owned| owned.id == record.id)
    }

    /// Sibling candidates: every other page-owning name.
    fn sibling_matches(&self, base: &NameRecord, limit: usize) -> Vec<HarmonyMatch<'a>> {
        harmony::top_matches(base, self.names.iter().copied(), self.data.index(), limit)
    }

    /// Same-gender (or unisex) names ranked by harmony.
    fn similar_names(&self, base: &NameRecord, limit: usize) -> Vec<HarmonyMatch<'a>> {
        let pool = self
            .names
            .iter()
            .copied()
            .filter(|n| n.gender == base.gender || n.gender == Gender::Unisex);
        harmony::top_matches(base, pool, self.data.index(), limit)
    }

    /// Surnames that suit a first name, best first.
    fn surnames_for(&self, first: &NameRecord, limit: usize) -> Vec<(&'a SurnameRecord, f64)> {
        let mut scored: Vec<(&SurnameRecord, f64)> = self
            .surnames
            .iter()
            .map(|&s| (s, compat::global_score(first, s)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(limit);
        scored
    }

    // ========================================================================
    // Page renderers
    // ========================================================================

    fn render_index(&self) -> Markup {
        let data = self.data;
        let site = &data.config.site;
        let ctx = Context::new()
            .with("SITE", &site.name)
            .with("NAME_COUNT", self.names.len())
            .with("SURNAME_COUNT", self.surnames.len());

        let mut popular: Vec<(&NameRecord, u32)> = self
            .names
            .iter()
            .filter_map(|&n| data.index().best_rank(n.id).map(|r| (n, r)))
            .collect();
        popular.sort_by_key(|&(_, rank)| rank);
        popular.truncate(24);

        let content = html! {
            h1 { (site.name) }
            p.lede { (site.tagline) }
            (self.prose("index_intro_variants", &site.name, &ctx))
            section {
                h2 { "Browse by gender" }
                ul {
                    @for &gender in &self.genders {
                        li { a href=(gender_url(gender)) { (gender.label()) " names" } }
                    }
                }
            }
            @if !popular.is_empty() {
                section {
                    h2 { "Popular right now" }
                    ol {
                        @for (record, _) in &popular {
                            (self.name_list_item(record))
                        }
                    }
                }
            }
            @if !self.styles.is_empty() {
                section {
                    h2 { "Browse by style" }
                    ul {
                        @for style in &self.styles {
                            li { a href=(style_url(style)) { (style) " names" } }
                        }
                    }
                }
            }
            @if !self.countries.is_empty() {
                section {
                    h2 { "Browse by country" }
                    ul {
                        @for code in &self.countries {
                            li { a href=(country_url(code)) { "Popular in " (data.country_name(code)) } }
                        }
                    }
                }
            }
            @if !self.surnames.is_empty() {
                section {
                    h2 { "First names for your surname" }
                    ul {
                        @for surname in &self.surnames {
                            li { a href=(surname_url(surname)) { (surname.name) } }
                        }
                    }
                }
            }
        };

        let description = format!(
            "{}: {} baby names with meanings, sibling ideas and surname matches.",
            site.name,
            self.names.len()
        );
        self.base_document("/", &site.name, &description, content)
    }

    fn render_profile(&self, record: &'a NameRecord) -> Markup {
        let data = self.data;
        let limits = &data.config.limits;
        let index = data.index();
        let ctx = self.name_context(record);
        let seed = record.name.as_str();
        let band = index.band(record.id);
        let categories = index.categories(record.id);

        let facts = html! {
            dl.facts {
                dt { "Gender" }
                dd { a href=(gender_url(record.gender)) { (record.gender.label()) } }
                @if let Some(meaning) = &record.meaning {
                    dt { "Meaning" }
                    dd { (meaning) }
                }
                @if let Some(origin) = self.origin_of(record) {
                    dt { "Origin" }
                    dd { (origin) }
                }
                dt { "Syllables" }
                dd { (record.syllables()) }
                dt { "Popularity" }
                dd { (band.label()) }
                @if let Some(letter) = letter_of(record) {
                    dt { "First letter" }
                    dd { a href=(letter_url(letter)) { (letter.to_ascii_uppercase()) } }
                }
                @if !categories.is_empty() {
                    dt { "Style" }
                    dd {
                        @for category in categories {
                            a href=(style_url(category)) { (category) } " "
                        }
                    }
                }
            }
        };

        let analysis = html! {
            section.analysis {
                h2 { "How " (record.name) " sounds" }
                (self.prose("profile_analysis_variants", seed, &ctx))
                @let surnames = self.surnames_for(record, limits.surname_featured);
                @if !surnames.is_empty() {
                    h3 { "Surnames that suit " (record.name) }
                    ul {
                        @for (surname, _) in &surnames {
                            @let tagged = compat::score_pair(record, *surname, Profile::Tagged);
                            li {
                                a href=(surname_url(surname)) { (record.name) " " (surname.name) }
                                " "
                                span.score { "(" (FlowTier::from_smoothness(compat::smoothness(tagged.score)).label()) ")" }
                            }
                        }
                    }
                }
            }
        };

        let siblings = self.sibling_matches(record, limits.sibling_matches);
        let lists = html! {
            section.lists {
                h2 { "Names that go with " (record.name) }
                @if !siblings.is_empty() {
                    ul {
                        @for m in &siblings {
                            li {
                                (self.name_link(m.record))
                                " "
                                span.score { (m.harmony.score) "/100" }
                            }
                        }
                    }
                }
                p {
                    "See the full "
                    a href=(sibling_url(record)) { "sibling name analysis for " (record.name) }
                    " or browse "
                    a href=(names_like_url(record)) { "names like " (record.name) }
                    "."
                }
            }
        };

        let content = html! {
            h1 { (record.name) }
            (self.prose("profile_intro_variants", seed, &ctx))
            (facts)
            @match variants::block_order(seed) {
                BlockOrder::AnalysisFirst => { (analysis) (lists) }
                BlockOrder::ListsFirst => { (lists) (analysis) }
            }
            (self.closing("profile_closing_variants", seed, &ctx))
        };

        let description = match &record.meaning {
            Some(meaning) => format!(
                "{}: meaning \"{}\", origin, popularity, sibling names and surname matches.",
                record.name, meaning
            ),
            None => format!(
                "{}: origin, popularity, sibling names and surname matches.",
                record.name
            ),
        };
        self.base_document(&name_url(record), &record.name, &description, content)
    }

    fn render_names_like(&self, record: &'a NameRecord) -> Markup {
        let limits = &self.data.config.limits;
        let similar = self.similar_names(record, limits.names_like);
        let seed = record.name.as_str();
        let ctx = self
            .name_context(record)
            .with("COUNT", similar.len());

        let content = html! {
            h1 { "Names like " (record.name) }
            (self.prose("names_like_intro_variants", seed, &ctx))
            @if similar.is_empty() {
                p { "No close matches for " (record.name) " yet." }
            } @else {
                ol {
                    @for m in &similar {
                        li {
                            (self.name_link(m.record))
                            @if let Some(meaning) = &m.record.meaning {
                                ": " (meaning)
                            }
                            @let traits = shared_traits(record, m);
                            @if !traits.is_empty() {
                                " (shares " (traits.join(", ")) ")"
                            }
                        }
                    }
                }
            }
            p {
                "Back to "
                (self.name_link(record))
                ", or see "
                a href=(sibling_url(record)) { "sibling names for " (record.name) }
                "."
            }
            (self.closing("closing_variants", seed, &ctx))
        };

        let title = format!("Names like {}", record.name);
        let description = format!(
            "{} {} names similar to {} in sound, origin and style.",
            similar.len(),
            record.gender.label().to_lowercase(),
            record.name
        );
        self.base_document(&names_like_url(record), &title, &description, content)
    }

    fn render_sibling(&self, record: &'a NameRecord) -> Markup {
        let limits = &self.data.config.limits;
        let index = self.data.index();
        let seed = record.name.as_str();
        let matches = self.sibling_matches(record, limits.sibling_matches);
        let clashes = harmony::clashing_names(
            record,
            self.names.iter().copied(),
            index,
            limits.clashing_names,
        );

        let mut ctx = self.name_context(record);
        if let Some(best) = matches.first() {
            ctx.set("TOP_MATCH", &best.record.name);
            ctx.set("TOP_SCORE", best.harmony.score);
            ctx.set("TOP_TIER", best.harmony.tier().label());
        }

        let content = html! {
            h1 { "Sibling names for " (record.name) }
            (self.prose("sibling_intro_variants", seed, &ctx))
            section {
                h2 { "How harmony is scored" }
                table {
                    thead { tr { th { "Component" } th { "Weight" } } }
                    tbody {
                        tr { td { "Shared origin" } td { (harmony::ORIGIN_WEIGHT) "%" } }
                        tr { td { "Phonetic rhythm" } td { (harmony::RHYTHM_WEIGHT) "%" } }
                        tr { td { "Popularity band" } td { (harmony::POPULARITY_WEIGHT) "%" } }
                        tr { td { "Length balance" } td { (harmony::LENGTH_WEIGHT) "%" } }
                        tr { td { "Style cluster" } td { (harmony::STYLE_WEIGHT) "%" } }
                    }
                }
            }
            section {
                h2 { "Best matches" }
                @if matches.is_empty() {
                    p { "No other names to compare with yet." }
                } @else {
                    ol {
                        @for m in &matches {
                            li {
                                (self.name_link(m.record))
                                " ("
                                (m.record.gender.label())
                                ") "
                                span.score { (m.harmony.score) "/100, " (m.harmony.tier().label()) }
                                @if let Some(origin) = &m.harmony.shared_origin {
                                    ". Both " (origin)
                                }
                                @if let Some(style) = &m.harmony.style_match {
                                    ". Both " (style)
                                }
                            }
                        }
                    }
                }
            }
            @if !clashes.is_empty() {
                section {
                    h2 { "Names that contrast with " (record.name) }
                    (self.prose("sibling_clash_variants", seed, &ctx))
                    ul {
                        @for c in &clashes {
                            li {
                                (self.name_link(c.record))
                                " "
                                span.score { "harmony " (c.harmony.score) "/100" }
                            }
                        }
                    }
                }
            }
            p {
                "More about "
                (self.name_link(record))
                " and "
                a href=(names_like_url(record)) { "names like " (record.name) }
                "."
            }
            (self.closing("closing_variants", seed, &ctx))
        };

        let title = format!("Sibling names for {}", record.name);
        let description = format!(
            "Brother and sister names that go with {}, scored for origin, rhythm, popularity, length and style.",
            record.name
        );
        self.base_document(&sibling_url(record), &title, &description, content)
    }

    fn render_surname(&self, surname: &'a SurnameRecord) -> Markup {
        let limits = &self.data.config.limits;
        let seed = surname.name.as_str();
        let shortlist = compat::rank_first_names(
            self.names.iter().copied(),
            surname,
            Profile::Global,
            limits.surname_candidates,
        );

        // Featured names are explained with the tagged profile.
        let featured: Vec<(&NameRecord, compat::CompatScore, u8)> = shortlist
            .iter()
            .take(limits.surname_featured)
            .map(|ranked| {
                let tagged = compat::score_pair(ranked.record, surname, Profile::Tagged);
                let smooth = compat::smoothness(tagged.score);
                (ranked.record, tagged, smooth)
            })
            .collect();

        let mut tier_counts: BTreeMap<usize, usize> = BTreeMap::new();
        for (_, _, smooth) in &featured {
            let tier = FlowTier::from_smoothness(*smooth);
            let position = FlowTier::ALL.iter().position(|t| *t == tier).unwrap_or(0);
            *tier_counts.entry(position).or_default() += 1;
        }
        // Most common tier; ties go to the better tier.
        let dominant = tier_counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(&pos, &count)| (FlowTier::ALL[pos], count));

        let name = surname.name.trim();
        let mut ctx = Context::new()
            .with("SURNAME", name)
            .with("SYLLABLES", surname.syllables())
            .with("FIRST_LETTER", crate::phonetics::first_char(name).to_uppercase())
            .with("LAST_LETTER", crate::phonetics::last_char(name).to_uppercase())
            .with("LENGTH", name.chars().count())
            .with("COUNT", featured.len())
            .with("SITE", &self.data.config.site.name);
        if let Some((first, _, smooth)) = featured.first() {
            ctx.set("TOP_NAME", &first.name);
            ctx.set("TOP_SCORE", smooth);
        }
        if let Some((tier, count)) = dominant {
            ctx.set("TIER", tier.label());
            ctx.set("TIER_COUNT", count);
        }

        let content = html! {
            h1 { "First names that go with " (name) }
            (self.prose("surname_intro_variants", seed, &ctx))
            section.phonetics {
                h2 { "The sound of " (name) }
                @for section in variants::phonetic_block_order(seed) {
                    h3 { (section.heading()) }
                    (self.prose(section.slot(), seed, &ctx))
                }
            }
            @if dominant.is_some() {
                section.tiers {
                    (self.prose("tier_block_variants", seed, &ctx))
                }
            }
            @if !featured.is_empty() {
                section.featured {
                    h2 { "Top picks" }
                    @for (record, score, smooth) in &featured {
                        article {
                            h3 {
                                (self.name_link(record)) " " (name)
                                " "
                                @let tier = FlowTier::from_smoothness(*smooth);
                                span class={ "score tier-" (tier.slug()) } { (smooth) "/100, " (tier.label()) }
                            }
                            @if score.reasons.is_empty() {
                                p { "No strong pull either way between " (record.name) " and " (name) "." }
                            } @else {
                                ul {
                                    @for reason in &score.reasons {
                                        li { (reason.explain(&record.name, name)) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            @if shortlist.len() > featured.len() {
                section.shortlist {
                    h2 { "More names to try with " (name) }
                    ul {
                        @for ranked in shortlist.iter().skip(featured.len()) {
                            li { (self.name_link(ranked.record)) }
                        }
                    }
                }
            }
            (self.closing("surname_closing_variants", seed, &ctx))
        };

        let title = format!("First names for {name}");
        let description = format!(
            "The first names that flow best with the surname {name}, with a phonetic breakdown of each pairing."
        );
        self.base_document(&surname_url(surname), &title, &description, content)
    }

    fn filter_url(&self, filter: &Filter<'_>) -> String {
        match filter {
            Filter::Gender(g) => gender_url(*g),
            Filter::Letter(l) => letter_url(*l),
            Filter::Country(c) => country_url(c),
            Filter::Style(s) => style_url(s),
        }
    }

    fn render_filter(&self, filter: &Filter<'a>) -> Markup {
        let data = self.data;
        let (label, names, siblings): (String, Vec<&NameRecord>, Vec<(String, String)>) =
            match filter {
                Filter::Gender(g) => (
                    format!("{} names", g.label()),
                    self.names.iter().copied().filter(|n| n.gender == *g).collect(),
                    self.genders
                        .iter()
                        .filter(|other| *other != g)
                        .map(|o| (gender_url(*o), format!("{} names", o.label())))
                        .collect(),
                ),
                Filter::Letter(l) => (
                    format!("Names starting with {}", l.to_ascii_uppercase()),
                    self.names
                        .iter()
                        .copied()
                        .filter(|n| letter_of(n) == Some(*l))
                        .collect(),
                    Vec::new(),
                ),
                Filter::Country(code) => (
                    format!("Popular names in {}", data.country_name(code)),
                    data.names_in_country(code)
                        .into_iter()
                        .filter(|n| self.owns_slug(n))
                        .collect(),
                    self.countries
                        .iter()
                        .filter(|other| *other != code)
                        .map(|o| (country_url(o), format!("Popular in {}", data.country_name(o))))
                        .collect(),
                ),
                Filter::Style(style) => (
                    format!("{style} names"),
                    data.names_with_style(style)
                        .into_iter()
                        .filter(|n| self.owns_slug(n))
                        .collect(),
                    self.styles
                        .iter()
                        .filter(|other| *other != style)
                        .map(|o| (style_url(o), format!("{o} names")))
                        .collect(),
                ),
            };

        let url = self.filter_url(filter);
        let ctx = Context::new()
            .with("LABEL", &label)
            .with("COUNT", names.len())
            .with("SITE", &data.config.site.name);

        let content = html! {
            h1 { (label) }
            (self.prose("filter_intro_variants", &label, &ctx))
            ul.name-list {
                @for record in &names {
                    (self.name_list_item(record))
                }
            }
            @if !siblings.is_empty() {
                section {
                    h2 { "Keep browsing" }
                    ul {
                        @for (href, text) in &siblings {
                            li { a href=(href) { (text) } }
                        }
                    }
                }
            }
            (self.closing("closing_variants", &label, &ctx))
        };

        let description = format!(
            "{label}: {} names with meanings, origins and links to sibling and surname ideas.",
            names.len()
        );
        self.base_document(&url, &label, &description, content)
    }

    fn render_legal(&self, page: &StaticPage) -> Markup {
        let parser = Parser::new(&page.body);
        let mut body_html = String::new();
        md_html::push_html(&mut body_html, parser);

        let content = html! {
            article.legal {
                (PreEscaped(body_html))
            }
        };
        let description = format!("{} for {}.", page.title, self.data.config.site.name);
        self.base_document(&format!("/{}/", page.slug), &page.title, &description, content)
    }
}

fn paragraph(text: &str) -> Markup {
    html! {
        @if !text.trim().is_empty() {
            p { (text) }
        }
    }
}

/// Short phrases naming what a similar name has in common with the base.
fn shared_traits(base: &NameRecord, m: &HarmonyMatch<'_>) -> Vec<String> {
    let mut traits = Vec::new();
    if let Some(origin) = &m.harmony.shared_origin {
        traits.push(format!("{origin} roots"));
    }
    if let Some(style) = &m.harmony.style_match {
        traits.push(format!("a {} style", style.to_lowercase()));
    }
    if base.syllables() == m.record.syllables() {
        traits.push(format!("{} syllables", base.syllables()));
    }
    if m.harmony.components.popularity == harmony::POPULARITY_WEIGHT {
        traits.push("its popularity".to_string());
    }
    traits
}
