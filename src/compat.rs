//! First name × surname compatibility.
//!
//! A pair is scored by independent additive rules over the two spellings:
//!
//! | Rule | Effect | Tag |
//! |------|--------|-----|
//! | surname 1 syllable, first name 2–3 | +1.5 | `syllable_contrast` |
//! | surname 2 syllables, first name 1–3 | +1.0 | `syllable_balance` |
//! | otherwise syllable gap ≤ 1 | +0.5 | `syllable_close` |
//! | syllable gap ≥ 3 | −0.5 | `syllable_gap` |
//! | first ends in vowel, surname starts with consonant | +1.0 | `vowel_consonant` |
//! | first ends in consonant, surname starts with vowel | +1.0 | `consonant_vowel` |
//! | same sound either side of the boundary | −1.0 / −0.5 | `repeated_sound` |
//! | hard consonant on both sides of the boundary | −0.5 | `hard_stop` |
//! | length ratio in [0.5, 2] (global profile only) | +0.5 | `length_balance` |
//! | length ratio > 3 or < 0.33 (global profile only) | −0.3 | `length_mismatch` |
//!
//! ## Profiles
//!
//! Two call sites use different magnitudes and are kept apart as named
//! [`Profile`]s. [`Profile::Tagged`] drives surname pages, where every fired
//! rule is explained to the reader. [`Profile::Global`] is the broad ranking
//! used for candidate shortlists and adds the length-ratio term.
//!
//! ## Smoothness
//!
//! Readers see a 0–100 smoothness number and one of five fixed
//! [`FlowTier`]s instead of the raw sum. The tagged score spans
//! [`TAGGED_MIN`]..=[`TAGGED_MAX`]; [`smoothness`] maps that range linearly
//! onto 0–100.

use crate::phonetics;
use crate::types::{NameRecord, SurnameRecord};
use serde::Serialize;

/// Lowest reachable [`Profile::Tagged`] score (gap, repeated sound, hard stop).
pub const TAGGED_MIN: f64 = -2.0;
/// Highest reachable [`Profile::Tagged`] score (contrast + boundary bonus).
pub const TAGGED_MAX: f64 = 2.5;

/// Anything with a spelling and an optional curated syllable count.
pub trait Spelled {
    fn spelling(&self) -> &str;
    fn curated_syllables(&self) -> Option<u32>;

    /// Curated syllable count, or the heuristic count from the spelling.
    fn syllables(&self) -> u32 {
        self.curated_syllables()
            .filter(|&n| n > 0)
            .unwrap_or_else(|| phonetics::syllable_count(self.spelling()))
    }
}

impl Spelled for NameRecord {
    fn spelling(&self) -> &str {
        &self.name
    }

    fn curated_syllables(&self) -> Option<u32> {
        self.syllables
    }
}

impl Spelled for SurnameRecord {
    fn spelling(&self) -> &str {
        &self.name
    }

    fn curated_syllables(&self) -> Option<u32> {
        self.syllables
    }
}

impl Spelled for &str {
    fn spelling(&self) -> &str {
        self
    }

    fn curated_syllables(&self) -> Option<u32> {
        None
    }
}

/// Scoring profile. The two magnitudes for a repeated boundary sound are
/// deliberately separate; do not unify them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Surname pages: −1.0 for a repeated sound, reasons explained.
    Tagged,
    /// Candidate shortlists: −0.5 for a repeated sound, length ratio counted.
    Global,
}

impl Profile {
    fn repeated_sound_penalty(self) -> f64 {
        match self {
            Profile::Tagged => 1.0,
            Profile::Global => 0.5,
        }
    }

    fn counts_length_ratio(self) -> bool {
        matches!(self, Profile::Global)
    }
}

/// A rule that fired for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    SyllableContrast,
    SyllableBalance,
    SyllableClose,
    SyllableGap,
    VowelConsonant,
    ConsonantVowel,
    RepeatedSound,
    HardStop,
    LengthBalance,
    LengthMismatch,
}

impl Reason {
    /// Stable tag used in templates and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::SyllableContrast => "syllable_contrast",
            Reason::SyllableBalance => "syllable_balance",
            Reason::SyllableClose => "syllable_close",
            Reason::SyllableGap => "syllable_gap",
            Reason::VowelConsonant => "vowel_consonant",
            Reason::ConsonantVowel => "consonant_vowel",
            Reason::RepeatedSound => "repeated_sound",
            Reason::HardStop => "hard_stop",
            Reason::LengthBalance => "length_balance",
            Reason::LengthMismatch => "length_mismatch",
        }
    }

    /// Whether the rule adds to the score.
    pub fn is_bonus(self) -> bool {
        !matches!(
            self,
            Reason::SyllableGap
                | Reason::RepeatedSound
                | Reason::HardStop
                | Reason::LengthMismatch
        )
    }

    /// One sentence explaining the rule for this pair.
    pub fn explain(self, first: &str, surname: &str) -> String {
        match self {
            Reason::SyllableContrast => format!(
                "The longer rhythm of {first} sets off the single beat of {surname}."
            ),
            Reason::SyllableBalance => format!(
                "{first} sits comfortably in front of the two-beat {surname}."
            ),
            Reason::SyllableClose => format!(
                "{first} and {surname} have a similar number of syllables, so neither half dominates."
            ),
            Reason::SyllableGap => format!(
                "{first} and {surname} differ by three or more syllables, which can feel lopsided."
            ),
            Reason::VowelConsonant => format!(
                "{first} ends on a vowel and {surname} opens on a consonant, so the two names do not blur together."
            ),
            Reason::ConsonantVowel => format!(
                "{first} ends on a consonant and {surname} opens on a vowel, giving a clean link between them."
            ),
            Reason::RepeatedSound => format!(
                "The last sound of {first} repeats as the first sound of {surname}, which can run the names together."
            ),
            Reason::HardStop => format!(
                "Two hard consonants meet between {first} and {surname}, adding a small stumble when spoken."
            ),
            Reason::LengthBalance => format!("{first} and {surname} are similar in length."),
            Reason::LengthMismatch => {
                format!("{first} and {surname} are very different in length.")
            }
        }
    }
}

/// Score for one first name × surname pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatScore {
    pub score: f64,
    /// Fired rules in evaluation order.
    pub reasons: Vec<Reason>,
}

impl CompatScore {
    fn neutral() -> Self {
        Self {
            score: 0.0,
            reasons: Vec::new(),
        }
    }

    fn apply(&mut self, delta: f64, reason: Reason) {
        self.score += delta;
        self.reasons.push(reason);
    }

    pub fn has(&self, reason: Reason) -> bool {
        self.reasons.contains(&reason)
    }
}

/// Score a pair under the given profile.
///
/// A blank spelling on either side yields a neutral `0.0` with no reasons.
pub fn score_pair(first: &impl Spelled, surname: &impl Spelled, profile: Profile) -> CompatScore {
    let first_name = first.spelling().trim();
    let surname_name = surname.spelling().trim();
    if first_name.is_empty() || surname_name.is_empty() {
        return CompatScore::neutral();
    }

    let mut result = CompatScore::neutral();

    let first_syl = first.syllables();
    let surname_syl = surname.syllables();
    let gap = first_syl.abs_diff(surname_syl);
    if surname_syl == 1 && (2..=3).contains(&first_syl) {
        result.apply(1.5, Reason::SyllableContrast);
    } else if surname_syl == 2 && (1..=3).contains(&first_syl) {
        result.apply(1.0, Reason::SyllableBalance);
    } else if gap <= 1 {
        result.apply(0.5, Reason::SyllableClose);
    }
    if gap >= 3 {
        result.apply(-0.5, Reason::SyllableGap);
    }

    if phonetics::ends_with_vowel(first_name) && phonetics::starts_with_consonant(surname_name) {
        result.apply(1.0, Reason::VowelConsonant);
    } else if phonetics::ends_with_consonant(first_name)
        && phonetics::starts_with_vowel(surname_name)
    {
        result.apply(1.0, Reason::ConsonantVowel);
    }

    let tail = phonetics::last_char(first_name);
    let head = phonetics::first_char(surname_name);
    if !tail.is_empty() && tail == head {
        result.apply(-profile.repeated_sound_penalty(), Reason::RepeatedSound);
    }
    if phonetics::is_hard_consonant(&tail) && phonetics::is_hard_consonant(&head) {
        result.apply(-0.5, Reason::HardStop);
    }

    if profile.counts_length_ratio() {
        let ratio = first_name.chars().count() as f64 / surname_name.chars().count() as f64;
        if (0.5..=2.0).contains(&ratio) {
            result.apply(0.5, Reason::LengthBalance);
        } else if !(0.33..=3.0).contains(&ratio) {
            result.apply(-0.3, Reason::LengthMismatch);
        }
    }

    result
}

/// The broad shortlist score: [`Profile::Global`] without the reasons.
pub fn global_score(first: &impl Spelled, surname: &impl Spelled) -> f64 {
    score_pair(first, surname, Profile::Global).score
}

/// A candidate first name with its score against a fixed surname.
#[derive(Debug, Clone)]
pub struct RankedName<'a> {
    pub record: &'a NameRecord,
    pub score: CompatScore,
}

/// Rank candidate first names for a surname, best first.
///
/// The sort is stable: equal scores keep their input order.
pub fn rank_first_names<'a>(
    candidates: impl IntoIterator<Item = &'a NameRecord>,
    surname: &SurnameRecord,
    profile: Profile,
    limit: usize,
) -> Vec<RankedName<'a>> {
    let mut ranked: Vec<RankedName<'a>> = candidates
        .into_iter()
        .map(|record| RankedName {
            score: score_pair(record, surname, profile),
            record,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.score.total_cmp(&a.score.score));
    ranked.truncate(limit);
    ranked
}

/// Map a [`Profile::Tagged`] score onto 0–100.
pub fn smoothness(score: f64) -> u8 {
    let normalized = (score - TAGGED_MIN) / (TAGGED_MAX - TAGGED_MIN) * 100.0;
    normalized.round().clamp(0.0, 100.0) as u8
}

/// Reader-facing smoothness band. Labels and boundaries are published on
/// the site and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FlowTier {
    ExcellentFlow,
    StrongFlow,
    Neutral,
    SlightFriction,
    HighFriction,
}

impl FlowTier {
    pub const ALL: [FlowTier; 5] = [
        FlowTier::ExcellentFlow,
        FlowTier::StrongFlow,
        FlowTier::Neutral,
        FlowTier::SlightFriction,
        FlowTier::HighFriction,
    ];

    pub fn from_smoothness(value: u8) -> Self {
        match value {
            85.. => FlowTier::ExcellentFlow,
            70..=84 => FlowTier::StrongFlow,
            50..=69 => FlowTier::Neutral,
            30..=49 => FlowTier::SlightFriction,
            _ => FlowTier::HighFriction,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FlowTier::ExcellentFlow => "Excellent Flow",
            FlowTier::StrongFlow => "Strong Flow",
            FlowTier::Neutral => "Neutral",
            FlowTier::SlightFriction => "Slight Friction",
            FlowTier::HighFriction => "High Friction",
        }
    }

    /// Inclusive smoothness range covered by the tier.
    pub fn range(self) -> (u8, u8) {
        match self {
            FlowTier::ExcellentFlow => (85, 100),
            FlowTier::StrongFlow => (70, 84),
            FlowTier::Neutral => (50, 69),
            FlowTier::SlightFriction => (30, 49),
            FlowTier::HighFriction => (0, 29),
        }
    }

    /// Suffix of the `tier-*` CSS class on surname page score badges.
    pub fn slug(self) -> &'static str {
        match self {
            FlowTier::ExcellentFlow => "excellent",
            FlowTier::StrongFlow => "strong",
            FlowTier::Neutral => "neutral",
            FlowTier::SlightFriction => "slight-friction",
            FlowTier::HighFriction => "high-friction",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{name, surname};

    #[test]
    fn emma_smith_gets_vowel_consonant_bonus() {
        let result = score_pair(&name(1, "Emma"), &surname("Smith"), Profile::Tagged);
        assert!(result.has(Reason::VowelConsonant));
        assert!(result.has(Reason::SyllableContrast));
        assert_eq!(result.score, 2.5);
    }

    #[test]
    fn consonant_vowel_bonus_fires_alone() {
        let result = score_pair(&name(1, "Liam"), &surname("Anders"), Profile::Tagged);
        assert!(result.has(Reason::ConsonantVowel));
        assert!(!result.has(Reason::VowelConsonant));
    }

    #[test]
    fn syllable_balance_for_two_beat_surname() {
        let result = score_pair(&name(1, "Jack"), &surname("Turner"), Profile::Tagged);
        assert!(result.has(Reason::SyllableBalance));
        assert!(!result.has(Reason::SyllableContrast));
    }

    #[test]
    fn syllable_gap_penalty_co_applies() {
        // 4 syllables against 1
        let result = score_pair(&name(1, "Olivia"), &surname("Smith"), Profile::Tagged);
        assert!(result.has(Reason::SyllableGap));
        assert!(!result.has(Reason::SyllableContrast));
    }

    #[test]
    fn curated_syllables_win_over_heuristic() {
        let mut grace = name(1, "Grace");
        grace.syllables = Some(1);
        let mut stone = surname("Stone");
        stone.syllables = Some(1);
        let result = score_pair(&grace, &stone, Profile::Tagged);
        assert!(result.has(Reason::SyllableClose));
    }

    #[test]
    fn repeated_sound_penalty_differs_by_profile() {
        let first = name(1, "Sam");
        let last = surname("Miller");
        let tagged = score_pair(&first, &last, Profile::Tagged);
        let global = score_pair(&first, &last, Profile::Global);
        assert!(tagged.has(Reason::RepeatedSound));
        assert!(global.has(Reason::RepeatedSound));
        // syllable_balance +1.0, then −1.0 vs −0.5, plus length_balance +0.5
        assert_eq!(tagged.score, 0.0);
        assert_eq!(global.score, 1.0);
    }

    #[test]
    fn hard_stop_penalty() {
        let result = score_pair(&name(1, "Brook"), &surname("Taylor"), Profile::Tagged);
        assert!(result.has(Reason::HardStop));
        assert!(!result.has(Reason::RepeatedSound));
    }

    #[test]
    fn length_ratio_only_in_global_profile() {
        let first = name(1, "Al");
        let last = surname("Montgomery-Whitfield");
        let global = score_pair(&first, &last, Profile::Global);
        let tagged = score_pair(&first, &last, Profile::Tagged);
        assert!(global.has(Reason::LengthMismatch));
        assert!(!tagged.has(Reason::LengthMismatch));

        let balanced = score_pair(&name(2, "Clara"), &surname("Hughes"), Profile::Global);
        assert!(balanced.has(Reason::LengthBalance));
    }

    #[test]
    fn blank_input_is_neutral() {
        let result = score_pair(&name(1, ""), &surname("Smith"), Profile::Tagged);
        assert_eq!(result.score, 0.0);
        assert!(result.reasons.is_empty());
        assert_eq!(global_score(&"Emma", &"  "), 0.0);
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let candidates = vec![
            name(1, "Sam"),
            name(2, "Emma"),
            name(3, "Ella"),
            name(4, "Olivia"),
        ];
        let ranked = rank_first_names(&candidates, &surname("Smith"), Profile::Tagged, 3);
        let names: Vec<&str> = ranked.iter().map(|r| r.record.name.as_str()).collect();
        // Emma and Ella tie at 2.5, Sam and Olivia at 0.5; input order is kept.
        assert_eq!(names, vec!["Emma", "Ella", "Sam"]);
    }

    #[test]
    fn smoothness_endpoints_and_tiers() {
        assert_eq!(smoothness(TAGGED_MAX), 100);
        assert_eq!(smoothness(TAGGED_MIN), 0);
        assert_eq!(smoothness(10.0), 100);
        assert_eq!(smoothness(0.0), 44);
        assert_eq!(FlowTier::from_smoothness(100), FlowTier::ExcellentFlow);
        assert_eq!(FlowTier::from_smoothness(85), FlowTier::ExcellentFlow);
        assert_eq!(FlowTier::from_smoothness(84), FlowTier::StrongFlow);
        assert_eq!(FlowTier::from_smoothness(50), FlowTier::Neutral);
        assert_eq!(FlowTier::from_smoothness(49), FlowTier::SlightFriction);
        assert_eq!(FlowTier::from_smoothness(29), FlowTier::HighFriction);
        assert_eq!(FlowTier::from_smoothness(0), FlowTier::HighFriction);
    }

    #[test]
    fn tier_labels_are_fixed() {
        let labels: Vec<&str> = FlowTier::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Excellent Flow",
                "Strong Flow",
                "Neutral",
                "Slight Friction",
                "High Friction"
            ]
        );
        for tier in FlowTier::ALL {
            let (lo, hi) = tier.range();
            assert_eq!(FlowTier::from_smoothness(lo), tier);
            assert_eq!(FlowTier::from_smoothness(hi), tier);
        }
    }

    #[test]
    fn reason_tags_are_snake_case() {
        assert_eq!(Reason::VowelConsonant.as_str(), "vowel_consonant");
        assert_eq!(
            serde_json::to_string(&Reason::RepeatedSound).unwrap(),
            r#""repeated_sound""#
        );
    }
}
