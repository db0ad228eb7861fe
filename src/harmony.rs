//! Sibling-name harmony.
//!
//! Two given names are scored 0–100 from five weighted components. The
//! weights are printed on sibling pages, so they are part of the published
//! contract and must keep summing to 100:
//!
//! | Component | Weight | Full points when |
//! |-----------|--------|------------------|
//! | Shared origin | 30 | same origin country (or language) |
//! | Phonetic rhythm | 25 | same syllable count and first letter |
//! | Popularity band | 20 | same band |
//! | Length balance | 15 | lengths within one character |
//! | Style cluster | 10 | at least one shared category |
//!
//! Components are whole points, so the sum is exact and every component is
//! symmetric: `harmony(a, b).score == harmony(b, a).score`.

use crate::compat::Spelled;
use crate::types::{CategoryRow, NameRecord, PopularityRow};
use serde::Serialize;
use std::collections::HashMap;

pub const ORIGIN_WEIGHT: u8 = 30;
pub const RHYTHM_WEIGHT: u8 = 25;
pub const POPULARITY_WEIGHT: u8 = 20;
pub const LENGTH_WEIGHT: u8 = 15;
pub const STYLE_WEIGHT: u8 = 10;

/// Extra clash points per mismatch on the clashing-names view.
const CLASH_MISMATCH_PENALTY: u16 = 10;

/// Coarse popularity bucket from a name's best rank anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PopularityBand {
    Top100,
    Top500,
    Top1000,
    Other,
}

impl PopularityBand {
    pub fn from_rank(best_rank: Option<u32>) -> Self {
        match best_rank {
            Some(1..=100) => PopularityBand::Top100,
            Some(101..=500) => PopularityBand::Top500,
            Some(501..=1000) => PopularityBand::Top1000,
            _ => PopularityBand::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PopularityBand::Top100 => "Top 100",
            PopularityBand::Top500 => "Top 500",
            PopularityBand::Top1000 => "Top 1000",
            PopularityBand::Other => "Outside the top 1000",
        }
    }

    fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Per-name lookups derived from the popularity and category tables.
#[derive(Debug, Default, Clone)]
pub struct NameIndex {
    best_rank: HashMap<u32, u32>,
    categories: HashMap<u32, Vec<String>>,
}

impl NameIndex {
    pub fn build(popularity: &[PopularityRow], categories: &[CategoryRow]) -> Self {
        let mut best_rank: HashMap<u32, u32> = HashMap::new();
        for row in popularity {
            let Some(rank) = row.rank.filter(|&r| r > 0) else {
                continue;
            };
            best_rank
                .entry(row.name_id)
                .and_modify(|best| *best = (*best).min(rank))
                .or_insert(rank);
        }

        let mut by_name: HashMap<u32, Vec<String>> = HashMap::new();
        for row in categories {
            let category = row.category.trim();
            if category.is_empty() {
                continue;
            }
            let list = by_name.entry(row.name_id).or_default();
            if !list.iter().any(|c| c == category) {
                list.push(category.to_string());
            }
        }

        Self {
            best_rank,
            categories: by_name,
        }
    }

    /// Lowest recorded rank across every country and year.
    pub fn best_rank(&self, name_id: u32) -> Option<u32> {
        self.best_rank.get(&name_id).copied()
    }

    pub fn band(&self, name_id: u32) -> PopularityBand {
        PopularityBand::from_rank(self.best_rank(name_id))
    }

    /// Categories in dataset order, duplicates removed.
    pub fn categories(&self, name_id: u32) -> &[String] {
        self.categories
            .get(&name_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn primary_category(&self, name_id: u32) -> Option<&str> {
        self.categories(name_id).first().map(String::as_str)
    }
}

/// Points earned per component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HarmonyComponents {
    pub origin: u8,
    pub rhythm: u8,
    pub popularity: u8,
    pub length: u8,
    pub style: u8,
}

impl HarmonyComponents {
    pub fn total(&self) -> u8 {
        self.origin + self.rhythm + self.popularity + self.length + self.style
    }
}

/// Harmony between two names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Harmony {
    pub score: u8,
    pub components: HarmonyComponents,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_match: Option<String>,
}

impl Harmony {
    pub fn tier(&self) -> HarmonyTier {
        HarmonyTier::from_score(self.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HarmonyTier {
    NaturalPair,
    GoodMatch,
    Mixed,
    Contrasting,
}

impl HarmonyTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => HarmonyTier::NaturalPair,
            60..=79 => HarmonyTier::GoodMatch,
            40..=59 => HarmonyTier::Mixed,
            _ => HarmonyTier::Contrasting,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HarmonyTier::NaturalPair => "Natural Pair",
            HarmonyTier::GoodMatch => "Good Match",
            HarmonyTier::Mixed => "Mixed",
            HarmonyTier::Contrasting => "Contrasting",
        }
    }
}

/// Normalized origin key: origin country, else language; lower-cased with
/// all whitespace removed.
fn origin_key(record: &NameRecord) -> Option<String> {
    record
        .origin_country
        .as_deref()
        .or(record.language.as_deref())
        .map(|o| {
            o.chars()
                .filter(|c| !c.is_whitespace())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|k| !k.is_empty())
}

fn origin_display(record: &NameRecord) -> Option<String> {
    record
        .origin_country
        .as_deref()
        .or(record.language.as_deref())
        .map(|o| o.trim().to_string())
}

fn rhythm_points(a: &NameRecord, b: &NameRecord) -> u8 {
    let base = match a.syllables().abs_diff(b.syllables()) {
        0 => 20,
        1 => 12,
        _ => 0,
    };
    let letter_a = a.letter();
    let bonus = if !letter_a.is_empty() && letter_a == b.letter() {
        5
    } else {
        0
    };
    base + bonus
}

fn popularity_points(a: PopularityBand, b: PopularityBand) -> u8 {
    match a.ordinal().abs_diff(b.ordinal()) {
        0 => POPULARITY_WEIGHT,
        1 => POPULARITY_WEIGHT / 2,
        _ => 0,
    }
}

fn length_points(a: &str, b: &str) -> u8 {
    match a.chars().count().abs_diff(b.chars().count()) {
        0 | 1 => LENGTH_WEIGHT,
        2 => 10,
        3 => 5,
        _ => 0,
    }
}

/// Score two names. Blank names score zero on every component.
pub fn harmony(a: &NameRecord, b: &NameRecord, index: &NameIndex) -> Harmony {
    let (name_a, name_b) = (a.name.trim(), b.name.trim());
    if name_a.is_empty() || name_b.is_empty() {
        return Harmony {
            score: 0,
            components: HarmonyComponents::default(),
            shared_origin: None,
            style_match: None,
        };
    }

    let mut components = HarmonyComponents::default();

    let shared_origin = match (origin_key(a), origin_key(b)) {
        (Some(ka), Some(kb)) if ka == kb => {
            components.origin = ORIGIN_WEIGHT;
            origin_display(a)
        }
        _ => None,
    };

    components.rhythm = rhythm_points(a, b);
    components.popularity = popularity_points(index.band(a.id), index.band(b.id));
    components.length = length_points(name_a, name_b);

    let other = index.categories(b.id);
    let style_match = index
        .categories(a.id)
        .iter()
        .find(|&c| other.contains(c))
        .cloned();
    if style_match.is_some() {
        components.style = STYLE_WEIGHT;
    }

    Harmony {
        score: components.total(),
        components,
        shared_origin,
        style_match,
    }
}

/// A candidate sibling name with its harmony against the base name.
#[derive(Debug, Clone)]
pub struct HarmonyMatch<'a> {
    pub record: &'a NameRecord,
    pub harmony: Harmony,
}

/// Best sibling matches for `base`, highest harmony first, input order on ties.
pub fn top_matches<'a>(
    base: &NameRecord,
    names: impl IntoIterator<Item = &'a NameRecord>,
    index: &NameIndex,
    limit: usize,
) -> Vec<HarmonyMatch<'a>> {
    let mut matches: Vec<HarmonyMatch<'a>> = names
        .into_iter()
        .filter(|candidate| candidate.id != base.id)
        .map(|record| HarmonyMatch {
            harmony: harmony(base, record, index),
            record,
        })
        .collect();
    matches.sort_by(|a, b| b.harmony.score.cmp(&a.harmony.score));
    matches.truncate(limit);
    matches
}

/// A contrasting name: low harmony plus explicit mismatches.
#[derive(Debug, Clone)]
pub struct ClashMatch<'a> {
    pub record: &'a NameRecord,
    pub harmony: Harmony,
    pub clash: u16,
}

fn clash_score(base: &NameRecord, other: &NameRecord, harmony: &Harmony, index: &NameIndex) -> u16 {
    let mut clash = u16::from(100 - harmony.score);
    if matches!((origin_key(base), origin_key(other)), (Some(ka), Some(kb)) if ka != kb) {
        clash += CLASH_MISMATCH_PENALTY;
    }
    let (cats_a, cats_b) = (index.categories(base.id), index.categories(other.id));
    if !cats_a.is_empty() && !cats_b.is_empty() && harmony.style_match.is_none() {
        clash += CLASH_MISMATCH_PENALTY;
    }
    if base.syllables().abs_diff(other.syllables()) >= 2 {
        clash += CLASH_MISMATCH_PENALTY;
    }
    clash
}

/// Names that sound least like siblings of `base`, strongest clash first.
pub fn clashing_names<'a>(
    base: &NameRecord,
    names: impl IntoIterator<Item = &'a NameRecord>,
    index: &NameIndex,
    limit: usize,
) -> Vec<ClashMatch<'a>> {
    let mut clashes: Vec<ClashMatch<'a>> = names
        .into_iter()
        .filter(|candidate| candidate.id != base.id)
        .map(|record| {
            let harmony = harmony(base, record, index);
            let clash = clash_score(base, record, &harmony, index);
            ClashMatch {
                record,
                harmony,
                clash,
            }
        })
        .collect();
    clashes.sort_by(|a, b| b.clash.cmp(&a.clash));
    clashes.truncate(limit);
    clashes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{category, name, popularity};
    use crate::types::Gender;

    fn irish(id: u32, spelling: &str) -> NameRecord {
        let mut record = name(id, spelling);
        record.origin_country = Some("Ireland".to_string());
        record
    }

    #[test]
    fn weights_sum_to_one_hundred() {
        let total = u16::from(ORIGIN_WEIGHT)
            + u16::from(RHYTHM_WEIGHT)
            + u16::from(POPULARITY_WEIGHT)
            + u16::from(LENGTH_WEIGHT)
            + u16::from(STYLE_WEIGHT);
        assert_eq!(total, 100);
    }

    #[test]
    fn shared_origin_beats_missing_origin() {
        let index = NameIndex::default();
        let with = harmony(&irish(1, "Aoife"), &irish(2, "Niamh"), &index);
        let without = harmony(&name(3, "Aoife"), &name(4, "Niamh"), &index);
        assert!(with.components.origin > without.components.origin);
        assert_eq!(with.components.origin, ORIGIN_WEIGHT);
        assert_eq!(without.components.origin, 0);
        assert_eq!(with.shared_origin.as_deref(), Some("Ireland"));
    }

    #[test]
    fn origin_comparison_ignores_case_and_whitespace() {
        let index = NameIndex::default();
        let mut a = name(1, "Mateo");
        a.origin_country = Some("Costa Rica".to_string());
        let mut b = name(2, "Lucia");
        b.origin_country = Some(" costarica ".to_string());
        assert_eq!(harmony(&a, &b, &index).components.origin, ORIGIN_WEIGHT);
    }

    #[test]
    fn language_is_the_origin_fallback() {
        let index = NameIndex::default();
        let mut a = name(1, "Hans");
        a.language = Some("German".to_string());
        let mut b = name(2, "Greta");
        b.language = Some("german".to_string());
        assert_eq!(harmony(&a, &b, &index).components.origin, ORIGIN_WEIGHT);
    }

    #[test]
    fn popularity_band_from_best_rank() {
        let rows = vec![
            popularity(1, "US", 2020, Some(340)),
            popularity(1, "UK", 2021, Some(42)),
            popularity(2, "US", 2020, None),
            popularity(3, "US", 2020, Some(999)),
        ];
        let index = NameIndex::build(&rows, &[]);
        assert_eq!(index.best_rank(1), Some(42));
        assert_eq!(index.band(1), PopularityBand::Top100);
        assert_eq!(index.band(2), PopularityBand::Other);
        assert_eq!(index.band(3), PopularityBand::Top1000);
        assert_eq!(index.band(99), PopularityBand::Other);
    }

    #[test]
    fn popularity_points_reward_same_and_adjacent_bands() {
        assert_eq!(
            popularity_points(PopularityBand::Top100, PopularityBand::Top100),
            20
        );
        assert_eq!(
            popularity_points(PopularityBand::Top100, PopularityBand::Top500),
            10
        );
        assert_eq!(
            popularity_points(PopularityBand::Top100, PopularityBand::Other),
            0
        );
    }

    #[test]
    fn style_match_uses_base_category_order() {
        let cats = vec![
            category(1, "Classic"),
            category(1, "Royal"),
            category(2, "Royal"),
            category(2, "Classic"),
        ];
        let index = NameIndex::build(&[], &cats);
        let h = harmony(&name(1, "Henry"), &name(2, "George"), &index);
        assert_eq!(h.style_match.as_deref(), Some("Classic"));
        assert_eq!(h.components.style, STYLE_WEIGHT);
    }

    #[test]
    fn harmony_is_symmetric() {
        let cats = vec![category(1, "Nature"), category(2, "Nature")];
        let rows = vec![popularity(1, "US", 2022, Some(12))];
        let index = NameIndex::build(&rows, &cats);
        let a = irish(1, "Rowan");
        let mut b = name(2, "Willow");
        b.gender = Gender::Girl;
        assert_eq!(harmony(&a, &b, &index), harmony(&b, &a, &index));
    }

    #[test]
    fn score_stays_within_bounds() {
        let cats = vec![category(1, "Classic"), category(2, "Classic")];
        let rows = vec![
            popularity(1, "US", 2020, Some(5)),
            popularity(2, "US", 2020, Some(8)),
        ];
        let index = NameIndex::build(&rows, &cats);
        let best = harmony(&irish(1, "Emma"), &irish(2, "Ella"), &index);
        assert_eq!(best.score, 100);
        let blank = harmony(&name(3, ""), &name(4, "Ella"), &index);
        assert_eq!(blank.score, 0);
    }

    #[test]
    fn top_matches_excludes_base_and_sorts() {
        let index = NameIndex::default();
        let names = vec![
            irish(1, "Aoife"),
            irish(2, "Niamh"),
            name(3, "Bartholomew"),
            irish(4, "Ciara"),
        ];
        let matches = top_matches(&names[0], &names, &index, 10);
        assert_eq!(matches.len(), 3);
        assert!(matches.iter().all(|m| m.record.id != 1));
        assert!(
            matches
                .windows(2)
                .all(|w| w[0].harmony.score >= w[1].harmony.score)
        );
        assert_eq!(matches.last().unwrap().record.name, "Bartholomew");
    }

    #[test]
    fn clashing_names_puts_mismatches_first() {
        let index = NameIndex::default();
        let mut bartholomew = name(3, "Bartholomew");
        bartholomew.origin_country = Some("England".to_string());
        let names = vec![irish(1, "Aoife"), irish(2, "Niamh"), bartholomew];
        let clashes = clashing_names(&names[0], &names, &index, 1);
        assert_eq!(clashes.len(), 1);
        assert_eq!(clashes[0].record.name, "Bartholomew");
        assert!(clashes[0].clash > 100 - u16::from(clashes[0].harmony.score));
    }

    fn counted(id: u32, spelling: &str, syllables: u32) -> NameRecord {
        let mut record = name(id, spelling);
        record.syllables = Some(syllables);
        record
    }

    #[test]
    fn rhythm_points_step_down_with_syllable_gap() {
        let ava = counted(1, "Ava", 2);
        assert_eq!(rhythm_points(&ava, &counted(2, "Lily", 2)), 20);
        assert_eq!(rhythm_points(&ava, &counted(2, "Lily", 3)), 12);
        assert_eq!(rhythm_points(&ava, &counted(2, "Lily", 1)), 12);
        assert_eq!(rhythm_points(&ava, &counted(2, "Lily", 4)), 0);
        assert_eq!(rhythm_points(&ava, &counted(2, "Lily", 7)), 0);
    }

    #[test]
    fn rhythm_first_letter_bonus() {
        let ava = counted(1, "Ava", 2);
        assert_eq!(rhythm_points(&ava, &counted(2, "Abigail", 4)), 5);
        assert_eq!(rhythm_points(&ava, &counted(2, "Amelia", 3)), 17);
        assert_eq!(rhythm_points(&ava, &counted(2, "Anna", 2)), RHYTHM_WEIGHT);

        let mut lily = counted(3, "Lily", 4);
        lily.first_letter = Some("A".to_string());
        assert_eq!(rhythm_points(&ava, &lily), 5);
    }

    #[test]
    fn length_points_step_down_with_letter_gap() {
        assert_eq!(length_points("Ava", "Eva"), LENGTH_WEIGHT);
        assert_eq!(length_points("Ava", "Ella"), LENGTH_WEIGHT);
        assert_eq!(length_points("Ava", "Emily"), 10);
        assert_eq!(length_points("Ava", "Amelia"), 5);
        assert_eq!(length_points("Ava", "Abigail"), 0);
        assert_eq!(length_points("Ava", "Isabella"), 0);
        assert_eq!(length_points("Zoë", "Zoe"), LENGTH_WEIGHT);
    }

    #[test]
    fn clash_adds_penalty_for_disjoint_categories() {
        let emma = counted(1, "Emma", 2);
        let ella = counted(2, "Ella", 2);

        let disjoint = NameIndex::build(&[], &[category(1, "Classic"), category(2, "Nature")]);
        let h = harmony(&emma, &ella, &disjoint);
        assert_eq!(clash_score(&emma, &ella, &h, &disjoint), u16::from(100 - h.score) + 10);

        let shared = NameIndex::build(&[], &[category(1, "Classic"), category(2, "Classic")]);
        let h = harmony(&emma, &ella, &shared);
        assert_eq!(clash_score(&emma, &ella, &h, &shared), u16::from(100 - h.score));

        let one_side = NameIndex::build(&[], &[category(1, "Classic")]);
        let h = harmony(&emma, &ella, &one_side);
        assert_eq!(clash_score(&emma, &ella, &h, &one_side), u16::from(100 - h.score));
    }

    #[test]
    fn clash_adds_penalty_for_syllable_gap_of_two() {
        let index = NameIndex::default();
        let emma = counted(1, "Emma", 2);

        let close = counted(2, "Ella", 3);
        let h = harmony(&emma, &close, &index);
        assert_eq!(clash_score(&emma, &close, &h, &index), u16::from(100 - h.score));

        let far = counted(3, "Elizabeth", 4);
        let h = harmony(&emma, &far, &index);
        assert_eq!(clash_score(&emma, &far, &h, &index), u16::from(100 - h.score) + 10);
    }

    #[test]
    fn clash_penalties_stack() {
        let mut emma = counted(1, "Emma", 1);
        emma.origin_country = Some("England".to_string());
        let mut aoife = counted(2, "Aoife", 3);
        aoife.origin_country = Some("Ireland".to_string());
        let index = NameIndex::build(&[], &[category(1, "Classic"), category(2, "Celtic")]);

        let h = harmony(&emma, &aoife, &index);
        assert_eq!(clash_score(&emma, &aoife, &h, &index), u16::from(100 - h.score) + 30);
    }

    #[test]
    fn tiers_cover_the_range() {
        assert_eq!(HarmonyTier::from_score(100), HarmonyTier::NaturalPair);
        assert_eq!(HarmonyTier::from_score(60), HarmonyTier::GoodMatch);
        assert_eq!(HarmonyTier::from_score(59), HarmonyTier::Mixed);
        assert_eq!(HarmonyTier::from_score(0), HarmonyTier::Contrasting);
    }
}
