//! Dataset records shared by every stage.
//!
//! These mirror the JSON exports one-to-one. Optional columns are `Option`s
//! rather than empty strings so scoring code can tell "unknown" apart from
//! "known and blank".

use serde::{Deserialize, Serialize};

/// Gender bucket a name is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Boy,
    Girl,
    Unisex,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Boy, Gender::Girl, Gender::Unisex];

    /// URL segment and JSON spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Boy => "boy",
            Gender::Girl => "girl",
            Gender::Unisex => "unisex",
        }
    }

    /// Plural label used in page headings ("Boy names").
    pub fn label(self) -> &'static str {
        match self {
            Gender::Boy => "Boy",
            Gender::Girl => "Girl",
            Gender::Unisex => "Unisex",
        }
    }
}

/// A given name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameRecord {
    pub id: u32,
    /// Blank when the export omits it; such records get no pages.
    #[serde(default)]
    pub name: String,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    /// Curated syllable count. Computed from the spelling when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syllables: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_letter: Option<String>,
}

impl NameRecord {
    /// Lower-cased index letter: the curated `first_letter`, else the first
    /// character of the name.
    pub fn letter(&self) -> String {
        self.first_letter
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| crate::phonetics::first_char(&self.name))
    }
}

/// A family name used for first-name compatibility pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurnameRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syllables: Option<u32>,
}

/// One ranking observation for a name in a country and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularityRow {
    pub name_id: u32,
    pub country: String,
    pub year: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// Style tag attached to a name. A name may carry several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub name_id: u32,
    pub category: String,
}

/// Kind of generated page. Decides the content floor a page must meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Index,
    NameProfile,
    NamesLike,
    Sibling,
    Surname,
    Filter,
    Legal,
}

impl PageKind {
    pub const ALL: [PageKind; 7] = [
        PageKind::Index,
        PageKind::NameProfile,
        PageKind::NamesLike,
        PageKind::Sibling,
        PageKind::Surname,
        PageKind::Filter,
        PageKind::Legal,
    ];

    /// Classify a site-relative URL path (`/names/emma/`) by its first segment.
    pub fn from_url_path(path: &str) -> Self {
        let first = path.trim_matches('/').split('/').next().unwrap_or("");
        match first {
            "" | "index.html" => PageKind::Index,
            "names" => PageKind::NameProfile,
            "names-like" => PageKind::NamesLike,
            "sibling-names" => PageKind::Sibling,
            "surnames" => PageKind::Surname,
            "gender" | "letter" | "country" | "style" => PageKind::Filter,
            _ => PageKind::Legal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PageKind::Index => "index",
            PageKind::NameProfile => "name profiles",
            PageKind::NamesLike => "names like",
            PageKind::Sibling => "sibling names",
            PageKind::Surname => "surname matches",
            PageKind::Filter => "filters",
            PageKind::Legal => "legal",
        }
    }
}

/// Country metadata for filter page titles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}
