//! URL slugs and display titles.
//!
//! Every route segment derived from data (`/names/<slug>/`,
//! `/surnames/<slug>/`, `/style/<slug>/`) goes through [`slugify`], so the
//! same name always lands on the same URL.
//!
//! Legal pages in `data/pages/` follow an `NNN-name.md` convention: the
//! optional numeric prefix orders them in the footer, the rest becomes the
//! slug and the title.
//! - `010-privacy.md` → slug `privacy`, title "Privacy"
//! - `020-terms-of-use.md` → slug `terms-of-use`, title "Terms Of Use"
//! - `about.md` → slug `about`, title "About"

/// Result of parsing a numbered entry name like `020-terms-of-use`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (e.g., `20` from `020-terms-of-use`)
    pub number: Option<u32>,
    /// Raw name part after `NNN-`, dashes preserved. Empty if number-only.
    /// For unnumbered entries, this is the full input.
    pub name: String,
    /// Dashes converted to spaces, each word capitalized.
    pub display_title: String,
}

/// Parse an entry name following the `NNN-name` convention.
pub fn parse_entry_name(name: &str) -> ParsedName {
    if let Some((prefix, rest)) = name.split_once('-')
        && let Ok(num) = prefix.parse::<u32>()
    {
        return ParsedName {
            number: Some(num),
            name: rest.to_string(),
            display_title: display_title(rest),
        };
    }
    if let Ok(num) = name.parse::<u32>() {
        return ParsedName {
            number: Some(num),
            name: String::new(),
            display_title: String::new(),
        };
    }
    ParsedName {
        number: None,
        name: name.to_string(),
        display_title: display_title(name),
    }
}

/// `terms-of-use` → "Terms Of Use".
pub fn display_title(raw: &str) -> String {
    raw.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Latin letters with diacritics folded to ASCII. Anything not listed and
/// not ASCII alphanumeric becomes a separator.
fn fold_char(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ğ' | 'ģ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ķ' => "k",
        'ł' | 'ľ' | 'ļ' | 'ĺ' => "l",
        'ñ' | 'ń' | 'ň' | 'ņ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' | 'ŕ' => "r",
        'ś' | 'š' | 'ş' | 'ș' => "s",
        'ß' => "ss",
        'ť' | 'ţ' | 'ț' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}

/// Lower-case ASCII slug: diacritics folded, apostrophes dropped, every other
/// run of non-alphanumerics collapsed to a single `-`, no leading or
/// trailing dash.
///
/// ```
/// use name_atlas::naming::slugify;
/// assert_eq!(slugify("Zoë"), "zoe");
/// assert_eq!(slugify("O'Brien"), "obrien");
/// assert_eq!(slugify("Mary Jane"), "mary-jane");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars().flat_map(char::to_lowercase) {
        if matches!(c, '\'' | '’' | '`') {
            continue;
        }
        let piece = if c.is_ascii_alphanumeric() {
            Some(c.encode_utf8(&mut [0; 4]).to_string())
        } else {
            fold_char(c).map(str::to_string)
        };
        match piece {
            Some(text) => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push_str(&text);
            }
            None => pending_dash = true,
        }
    }
    slug
}
