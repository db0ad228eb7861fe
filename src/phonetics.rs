//! Spelling-based phonetic heuristics.
//!
//! Everything here works on the written form only. There is no pronunciation
//! dictionary: a vowel is one of `a e i o u y`, and a syllable is a run of
//! vowels. That is wrong for plenty of English words ("Grace" counts two) but
//! it is stable, cheap and good enough to rank names against each other.
//!
//! All functions are total. Empty or non-alphabetic input yields the neutral
//! answer (`1` syllable, `false`, empty string) instead of an error.

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

/// Vowel pairs that split a vowel run into two syllables ("Ol-iv-i-a", "Le-o").
const HIATUS_PAIRS: &[(char, char)] = &[
    ('i', 'a'),
    ('i', 'o'),
    ('i', 'u'),
    ('e', 'o'),
    ('u', 'a'),
    ('u', 'o'),
];

/// Consonants that produce a hard stop when two of them meet at a word
/// boundary ("Brook Thompson").
pub const HARD_CONSONANTS: &[char] = &['t', 'k', 'p', 'b', 'd', 'g'];

fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

/// Count syllables as maximal vowel runs, splitting a run at each hiatus pair.
///
/// ```text
/// "Smith"  → 1   (i)
/// "Emily"  → 3   (e, i, y)
/// "Olivia" → 4   (o, i, i|a)
/// ""       → 1
/// ```
pub fn syllable_count(word: &str) -> u32 {
    let mut count = 0u32;
    let mut prev: Option<char> = None;
    for c in word.chars().flat_map(char::to_lowercase) {
        if is_vowel(c) {
            match prev {
                Some(p) if is_vowel(p) => {
                    if HIATUS_PAIRS.contains(&(p, c)) {
                        count += 1;
                    }
                }
                _ => count += 1,
            }
        }
        prev = Some(c);
    }
    count.max(1)
}

/// Lower-cased first character of the trimmed word, or `""`.
pub fn first_char(word: &str) -> String {
    word.trim()
        .chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default()
}

/// Lower-cased last character of the trimmed word, or `""`.
pub fn last_char(word: &str) -> String {
    word.trim()
        .chars()
        .next_back()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default()
}

fn edge_is_vowel(edge: Option<char>) -> bool {
    edge.is_some_and(|c| c.to_lowercase().all(is_vowel))
}

/// Whether the trimmed word starts with `a e i o u y`.
pub fn starts_with_vowel(word: &str) -> bool {
    edge_is_vowel(word.trim().chars().next())
}

/// Whether the trimmed word ends with `a e i o u y`.
pub fn ends_with_vowel(word: &str) -> bool {
    edge_is_vowel(word.trim().chars().next_back())
}

fn edge_is_consonant(edge: Option<char>) -> bool {
    edge.is_some_and(|c| c.is_alphabetic() && !c.to_lowercase().all(is_vowel))
}

/// Whether the trimmed word starts with a letter that is not a vowel.
pub fn starts_with_consonant(word: &str) -> bool {
    edge_is_consonant(word.trim().chars().next())
}

/// Whether the trimmed word ends with a letter that is not a vowel.
pub fn ends_with_consonant(word: &str) -> bool {
    edge_is_consonant(word.trim().chars().next_back())
}

/// Whether the character string is a single hard consonant.
pub fn is_hard_consonant(ch: &str) -> bool {
    let mut chars = ch.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => HARD_CONSONANTS.contains(&c),
        _ => false,
    }
}
