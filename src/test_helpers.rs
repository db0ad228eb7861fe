//! Shared test utilities for the name-atlas test suite.
//!
//! Record builders keep unit tests focused on the field under test, and the
//! fixture helpers give each test an isolated copy of `fixtures/data/`.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut emma = name(1, "Emma");
//! emma.origin_country = Some("England".to_string());
//! let result = score_pair(&emma, &surname("Smith"), Profile::Tagged);
//!
//! let data = fixture_dataset();
//! let page = find_name(&data, "olivia");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::dataset::{self, Dataset};
use crate::types::{CategoryRow, Gender, NameRecord, PopularityRow, SurnameRecord};

// =========================================================================
// Record builders
// =========================================================================

/// A girl's name with only an id and spelling set.
pub fn name(id: u32, spelling: &str) -> NameRecord {
    NameRecord {
        id,
        name: spelling.to_string(),
        gender: Gender::Girl,
        origin_country: None,
        language: None,
        meaning: None,
        syllables: None,
        first_letter: None,
    }
}

pub fn surname(spelling: &str) -> SurnameRecord {
    SurnameRecord {
        name: spelling.to_string(),
        origin: None,
        syllables: None,
    }
}

pub fn popularity(name_id: u32, country: &str, year: u16, rank: Option<u32>) -> PopularityRow {
    PopularityRow {
        name_id,
        country: country.to_string(),
        year,
        rank,
        count: None,
    }
}

pub fn category(name_id: u32, category: &str) -> CategoryRow {
    CategoryRow {
        name_id,
        category: category.to_string(),
    }
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/data/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/data");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load the fixture dataset straight from `fixtures/data/`.
pub fn fixture_dataset() -> Dataset {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/data");
    dataset::load(&fixtures).unwrap()
}

// =========================================================================
// Dataset lookups (panic with the available entries on miss)
// =========================================================================

/// Find a name by slug. Panics if not found.
pub fn find_name<'a>(data: &'a Dataset, slug: &str) -> &'a NameRecord {
    data.name_by_slug(slug).unwrap_or_else(|| {
        let names: Vec<&str> = data.names.iter().map(|n| n.name.as_str()).collect();
        panic!("name '{slug}' not found. Available: {names:?}")
    })
}

/// Find a surname by slug. Panics if not found.
pub fn find_surname<'a>(data: &'a Dataset, slug: &str) -> &'a SurnameRecord {
    data.surname_by_slug(slug).unwrap_or_else(|| {
        let names: Vec<&str> = data.surnames.iter().map(|s| s.name.as_str()).collect();
        panic!("surname '{slug}' not found. Available: {names:?}")
    })
}
