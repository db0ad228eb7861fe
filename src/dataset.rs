//! Dataset loading.
//!
//! First stage of the build. Reads the JSON exports in a data directory into
//! a read-only [`Dataset`] that every later stage borrows.
//!
//! ## Directory Structure
//!
//! ```text
//! data/
//! ├── config.toml        # Site configuration (optional)
//! ├── names.json         # [NameRecord]            required
//! ├── surnames.json      # [SurnameRecord]         optional
//! ├── popularity.json    # [PopularityRow]         optional
//! ├── categories.json    # [CategoryRow]           optional
//! ├── countries.json     # [Country]               optional
//! ├── variants.json      # { slot: [template] }    optional
//! └── pages/
//!     ├── 010-privacy.md # Legal page, footer order 10
//!     └── terms.md       # Legal page, listed after numbered ones
//! ```
//!
//! ## Validation
//!
//! - Duplicate name ids and duplicate surnames (case-insensitive) are errors.
//! - Two page files with the same slug, or a page slug that shadows a
//!   generated section (`names`, `style`, ...), are errors.
//! - Popularity and category rows pointing at unknown name ids are dropped
//!   with a warning. One bad row never fails a build.
//! - Names and surnames keep file order; everything downstream that needs a
//!   different order sorts explicitly.

use crate::config::{self, SiteConfig};
use crate::harmony::NameIndex;
use crate::naming::{parse_entry_name, slugify};
use crate::types::{CategoryRow, Country, NameRecord, PageKind, PopularityRow, SurnameRecord};
use crate::variants::VariantLibrary;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Required file missing: {0}")]
    Missing(PathBuf),
    #[error("Duplicate name id {0}")]
    DuplicateId(u32),
    #[error("Duplicate surname {0:?}")]
    DuplicateSurname(String),
    #[error("Pages {first} and {second} both publish to /{slug}/")]
    DuplicatePageSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Page {path} would publish to /{slug}/, which is a generated section")]
    ReservedPageSlug { slug: String, path: PathBuf },
}

/// A Markdown page from `data/pages/`.
#[derive(Debug, Clone, Serialize)]
pub struct StaticPage {
    /// URL slug (file stem with number prefix stripped).
    pub slug: String,
    /// First `# heading`, else the slug as a title.
    pub title: String,
    /// Raw Markdown.
    pub body: String,
    /// Footer order from the number prefix; unnumbered pages sort last.
    pub sort_key: u32,
}

/// Everything a build reads, loaded once.
#[derive(Debug)]
pub struct Dataset {
    pub names: Vec<NameRecord>,
    pub surnames: Vec<SurnameRecord>,
    pub popularity: Vec<PopularityRow>,
    pub categories: Vec<CategoryRow>,
    pub countries: Vec<Country>,
    pub variants: VariantLibrary,
    pub pages: Vec<StaticPage>,
    pub config: SiteConfig,
    index: NameIndex,
    by_id: HashMap<u32, usize>,
    by_slug: HashMap<String, usize>,
}

/// Load a data directory.
pub fn load(root: &Path) -> Result<Dataset, DatasetError> {
    let config = config::load_config(root)?;

    let names_path = root.join("names.json");
    if !names_path.is_file() {
        return Err(DatasetError::Missing(names_path));
    }
    let names: Vec<NameRecord> = read_json(&names_path)?;
    let surnames: Vec<SurnameRecord> = read_optional_json(&root.join("surnames.json"))?;
    let popularity: Vec<PopularityRow> = read_optional_json(&root.join("popularity.json"))?;
    let categories: Vec<CategoryRow> = read_optional_json(&root.join("categories.json"))?;
    let countries: Vec<Country> = read_optional_json(&root.join("countries.json"))?;
    let variants: VariantLibrary = read_optional_json(&root.join("variants.json"))?;
    let pages = load_pages(&root.join("pages"))?;

    let dataset = Dataset::new(
        names, surnames, popularity, categories, countries, variants, pages, config,
    )?;
    debug!(
        names = dataset.names.len(),
        surnames = dataset.surnames.len(),
        popularity_rows = dataset.popularity.len(),
        templates = dataset.variants.template_count(),
        "dataset loaded"
    );
    Ok(dataset)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, DatasetError> {
    if path.is_file() {
        read_json(path)
    } else {
        debug!(path = %path.display(), "optional dataset file absent");
        Ok(T::default())
    }
}

fn load_pages(dir: &Path) -> Result<Vec<StaticPage>, DatasetError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut md_files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();
    md_files.sort();

    let mut pages = Vec::new();
    let mut owners: HashMap<String, &Path> = HashMap::new();
    for md_path in &md_files {
        let stem = md_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let parsed = parse_entry_name(&stem);
        let slug = slugify(&parsed.name);
        if slug.is_empty() {
            warn!(path = %md_path.display(), "page file name has no usable slug, skipped");
            continue;
        }
        if PageKind::from_url_path(&slug) != PageKind::Legal {
            return Err(DatasetError::ReservedPageSlug {
                slug,
                path: md_path.clone(),
            });
        }
        if let Some(first) = owners.insert(slug.clone(), md_path) {
            return Err(DatasetError::DuplicatePageSlug {
                slug,
                first: first.to_path_buf(),
                second: md_path.clone(),
            });
        }
        let body = fs::read_to_string(md_path)?;
        let title = body
            .lines()
            .find(|line| line.starts_with("# "))
            .map(|line| line.trim_start_matches("# ").trim().to_string())
            .unwrap_or(parsed.display_title);
        pages.push(StaticPage {
            slug,
            title,
            body,
            sort_key: parsed.number.unwrap_or(u32::MAX),
        });
    }
    pages.sort_by(|a, b| a.sort_key.cmp(&b.sort_key).then_with(|| a.slug.cmp(&b.slug)));
    Ok(pages)
}

impl Dataset {
    /// Validate and index already-parsed records.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        names: Vec<NameRecord>,
        surnames: Vec<SurnameRecord>,
        popularity: Vec<PopularityRow>,
        categories: Vec<CategoryRow>,
        countries: Vec<Country>,
        variants: VariantLibrary,
        pages: Vec<StaticPage>,
        config: SiteConfig,
    ) -> Result<Self, DatasetError> {
        let mut by_id = HashMap::with_capacity(names.len());
        let mut by_slug = HashMap::with_capacity(names.len());
        for (i, record) in names.iter().enumerate() {
            if by_id.insert(record.id, i).is_some() {
                return Err(DatasetError::DuplicateId(record.id));
            }
            let slug = slugify(&record.name);
            if slug.is_empty() {
                warn!(id = record.id, name = %record.name, "name has no usable slug");
                continue;
            }
            // First record wins a slug collision ("Zoe" and "Zoë").
            by_slug.entry(slug).or_insert(i);
        }

        let mut seen = HashSet::new();
        for record in &surnames {
            let key = record.name.trim().to_lowercase();
            if key.is_empty() {
                warn!("surname without a name, skipped");
                continue;
            }
            if !seen.insert(key) {
                return Err(DatasetError::DuplicateSurname(record.name.clone()));
            }
        }

        let popularity = retain_known(popularity, &by_id, "popularity", |r| r.name_id);
        let categories = retain_known(categories, &by_id, "category", |r| r.name_id);
        let index = NameIndex::build(&popularity, &categories);

        Ok(Self {
            names,
            surnames,
            popularity,
            categories,
            countries,
            variants,
            pages,
            config,
            index,
            by_id,
            by_slug,
        })
    }

    pub fn index(&self) -> &NameIndex {
        &self.index
    }

    pub fn name_by_id(&self, id: u32) -> Option<&NameRecord> {
        self.by_id.get(&id).map(|&i| &self.names[i])
    }

    /// Look a name up by its URL slug or any spelling that slugifies to it.
    pub fn name_by_slug(&self, slug_or_name: &str) -> Option<&NameRecord> {
        self.by_slug
            .get(&slugify(slug_or_name))
            .map(|&i| &self.names[i])
    }

    pub fn surname_by_slug(&self, slug_or_name: &str) -> Option<&SurnameRecord> {
        let wanted = slugify(slug_or_name);
        self.surnames.iter().find(|s| slugify(&s.name) == wanted)
    }

    pub fn categories(&self, id: u32) -> &[String] {
        self.index.categories(id)
    }

    pub fn primary_category(&self, id: u32) -> Option<&str> {
        self.index.primary_category(id)
    }

    /// Country display name for a code; the code itself when unknown.
    pub fn country_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
            .map(|c| c.name.as_str())
            .unwrap_or(code)
    }

    /// Distinct country codes seen in popularity rows, sorted.
    pub fn popularity_countries(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.popularity.iter().map(|r| r.country.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }

    /// Names with a popularity row in `country`, best rank there first.
    pub fn names_in_country(&self, country: &str) -> Vec<&NameRecord> {
        let mut best: HashMap<u32, u32> = HashMap::new();
        for row in self.popularity.iter().filter(|r| r.country == country) {
            let rank = row.rank.unwrap_or(u32::MAX);
            best.entry(row.name_id)
                .and_modify(|b| *b = (*b).min(rank))
                .or_insert(rank);
        }
        let mut names: Vec<(&NameRecord, u32)> = self
            .names
            .iter()
            .filter_map(|n| best.get(&n.id).map(|&rank| (n, rank)))
            .collect();
        names.sort_by_key(|&(_, rank)| rank);
        names.into_iter().map(|(n, _)| n).collect()
    }

    /// Distinct categories in first-seen order.
    pub fn style_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.categories
            .iter()
            .map(|c| c.category.trim())
            .filter(|c| !c.is_empty() && seen.insert(*c))
            .collect()
    }

    pub fn names_with_style(&self, style: &str) -> Vec<&NameRecord> {
        self.names
            .iter()
            .filter(|n| self.categories(n.id).iter().any(|c| c == style))
            .collect()
    }
}

fn retain_known<T>(
    rows: Vec<T>,
    known: &HashMap<u32, usize>,
    table: &str,
    name_id: impl Fn(&T) -> u32,
) -> Vec<T> {
    let before = rows.len();
    let kept: Vec<T> = rows
        .into_iter()
        .filter(|row| known.contains_key(&name_id(row)))
        .collect();
    let dropped = before - kept.len();
    if dropped > 0 {
        warn!(table, dropped, "rows reference unknown name ids and were dropped");
    }
    kept
}
