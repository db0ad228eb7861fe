//! Deterministic prose variants.
//!
//! Thousands of pages share the same structure. To keep them from reading as
//! duplicates, each prose slot holds several interchangeable templates and a
//! page picks one by hashing its subject (a name or surname). No randomness
//! is involved: rebuilding the same dataset reproduces every page byte for
//! byte.
//!
//! ```text
//! variants.json                       seed "Smith"
//! {                                   hash = 80004067
//!   "tier_block_variants": [          80004067 % 3 = 1
//!     "…{NAME}…",                     → template 1, placeholders filled
//!     "…{NAME}…",
//!     "…{NAME}…"
//!   ]
//! }
//! ```
//!
//! Section ordering is varied the same way: [`block_order`] and
//! [`phonetic_block_order`] hash the seed with a salt suffix so that
//! independent decisions do not all flip together.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Salt for the profile page block order.
const PROFILE_ORDER_SALT: &str = "p";
/// Salt for the phonetic section rotation.
const PHONETIC_ORDER_SALT: &str = "r";
/// Salt for the closing call-to-action choice.
const CLOSING_SALT: &str = "c";

/// 32-bit polynomial rolling hash (`h = h * 31 + c`) over UTF-16 code units,
/// wrapping on overflow, returned as the absolute value of the signed result.
///
/// Depends only on the string contents, never on platform or locale.
pub fn hash(seed: &str) -> u32 {
    let mut h: i32 = 0;
    for unit in seed.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    h.unsigned_abs()
}

/// Pick one template for `seed`. An empty list yields `""`.
pub fn pick_variant<'a>(templates: &'a [String], seed: &str) -> &'a str {
    if templates.is_empty() {
        return "";
    }
    &templates[hash(seed) as usize % templates.len()]
}

/// Placeholder values for [`render`].
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl ToString) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Replace every `{KEY}` with its context value, or `""` when unset.
///
/// Braces that do not enclose a plain `[A-Za-z0-9_]+` key are copied as-is.
/// There are no conditionals, loops or escapes.
pub fn render(template: &str, context: &Context) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_placeholder_key(&after[..close]) => {
                out.push_str(context.get(&after[..close]).unwrap_or(""));
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Slot name → interchangeable templates, loaded once from `variants.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantLibrary {
    slots: BTreeMap<String, Vec<String>>,
}

impl VariantLibrary {
    /// Templates for a slot. A missing slot behaves like an empty one.
    pub fn slot(&self, name: &str) -> &[String] {
        self.slots.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn template_count(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    /// Pick a template from `slot` for `seed` and fill it in.
    pub fn render(&self, slot: &str, seed: &str, context: &Context) -> String {
        render(pick_variant(self.slot(slot), seed), context)
    }
}

/// Arrangement of the two main blocks on a profile-style page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOrder {
    /// Analysis prose first, then the name lists.
    AnalysisFirst,
    /// Name lists first, then the analysis prose.
    ListsFirst,
}

pub fn block_order(seed: &str) -> BlockOrder {
    if hash(&format!("{seed}{PROFILE_ORDER_SALT}")) % 2 == 0 {
        BlockOrder::AnalysisFirst
    } else {
        BlockOrder::ListsFirst
    }
}

/// Sections of the phonetic breakdown on surname pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneticSection {
    Syllables,
    Boundary,
    Rhythm,
    Length,
}

impl PhoneticSection {
    pub const CANONICAL: [PhoneticSection; 4] = [
        PhoneticSection::Syllables,
        PhoneticSection::Boundary,
        PhoneticSection::Rhythm,
        PhoneticSection::Length,
    ];

    /// Variant slot holding the prose for this section.
    pub fn slot(self) -> &'static str {
        match self {
            PhoneticSection::Syllables => "syllable_analysis_variants",
            PhoneticSection::Boundary => "boundary_analysis_variants",
            PhoneticSection::Rhythm => "rhythm_analysis_variants",
            PhoneticSection::Length => "length_analysis_variants",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            PhoneticSection::Syllables => "Syllable pattern",
            PhoneticSection::Boundary => "Where the names meet",
            PhoneticSection::Rhythm => "Rhythm",
            PhoneticSection::Length => "Length and balance",
        }
    }
}

/// The four phonetic sections rotated by `hash(seed + "r") % 4`.
pub fn phonetic_block_order(seed: &str) -> [PhoneticSection; 4] {
    let mut order = PhoneticSection::CANONICAL;
    let shift = hash(&format!("{seed}{PHONETIC_ORDER_SALT}")) as usize % order.len();
    order.rotate_left(shift);
    order
}

/// Index of the closing call-to-action among `count` options.
pub fn closing_index(seed: &str, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    hash(&format!("{seed}{CLOSING_SALT}")) as usize % count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn hash_of_empty_string_is_zero() {
        assert_eq!(hash(""), 0);
    }

    #[test]
    fn hash_matches_known_values() {
        assert_eq!(hash("a"), 97);
        assert_eq!(hash("Smith"), 80_004_067);
    }

    #[test]
    fn hash_wraps_instead_of_overflowing() {
        // Long enough to overflow i32 many times over; must not panic.
        let long = "Wolfeschlegelsteinhausenbergerdorff".repeat(4);
        let _ = hash(&long);
    }

    #[test]
    fn hash_counts_utf16_units() {
        // U+00E9 is one UTF-16 unit; the code unit value is used directly.
        assert_eq!(hash("é"), 0xE9);
    }

    #[test]
    fn pick_variant_is_stable_for_smith() {
        let templates = strings(&["a", "b", "c"]);
        assert_eq!(pick_variant(&templates, "Smith"), "b");
        for _ in 0..10 {
            assert_eq!(pick_variant(&templates, "Smith"), "b");
        }
    }

    #[test]
    fn pick_variant_on_empty_list() {
        assert_eq!(pick_variant(&[], "Smith"), "");
    }

    #[test]
    fn render_substitutes_known_and_blanks_unknown() {
        let ctx = Context::new().with("NAME", "Emma").with("SCORE", 92);
        assert_eq!(
            render("{NAME} scores {SCORE}{UNIT}.", &ctx),
            "Emma scores 92."
        );
    }

    #[test]
    fn render_replaces_every_occurrence() {
        let ctx = Context::new().with("NAME", "Leo");
        assert_eq!(render("{NAME}, {NAME}!", &ctx), "Leo, Leo!");
    }

    #[test]
    fn render_leaves_non_placeholders_alone() {
        let ctx = Context::new().with("A", "x");
        assert_eq!(render("{ not a key } {A} {", &ctx), "{ not a key } x {");
        assert_eq!(render("{}", &ctx), "{}");
    }

    #[test]
    fn library_missing_slot_renders_empty() {
        let library = VariantLibrary::default();
        assert_eq!(library.render("tier_block_variants", "Smith", &Context::new()), "");
    }

    #[test]
    fn library_deserializes_from_json_object() {
        let library: VariantLibrary = serde_json::from_str(
            r#"{"tier_block_variants": ["One {NAME}", "Two {NAME}", "Three {NAME}"]}"#,
        )
        .unwrap();
        assert_eq!(library.slot("tier_block_variants").len(), 3);
        assert_eq!(library.template_count(), 3);
        let ctx = Context::new().with("NAME", "Smith");
        assert_eq!(
            library.render("tier_block_variants", "Smith", &ctx),
            "Two Smith"
        );
    }

    #[test]
    fn phonetic_order_is_a_permutation() {
        for seed in ["Smith", "Jones", "", "Nguyen", "O'Brien"] {
            let order = phonetic_block_order(seed);
            for section in PhoneticSection::CANONICAL {
                assert_eq!(order.iter().filter(|s| **s == section).count(), 1);
            }
            assert_eq!(order, phonetic_block_order(seed));
        }
    }

    #[test]
    fn salts_decouple_decisions() {
        // With the salt appended, the order hash differs from the plain hash.
        assert_ne!(hash("Smithp"), hash("Smith"));
        assert_ne!(hash("Smithr"), hash("Smithc"));
        assert_eq!(block_order("Smith"), block_order("Smith"));
    }

    #[test]
    fn closing_index_in_range() {
        assert_eq!(closing_index("Smith", 0), 0);
        for seed in ["a", "bb", "Smith"] {
            assert!(closing_index(seed, 4) < 4);
        }
    }
}
