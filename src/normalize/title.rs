use once_cell::sync::Lazy;
use regex::Regex;

// Hour mentions like "35h" / "39 H" that leak into titles
static HOURS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:[.,]\d+)?\s?[hH]").unwrap());

// Noise tokens: schedule and contract mentions, gender tags, parenthesized
// segments, isolated dashes and pipes
static NOISE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)temps\s?plein",
        r"(?i)temps\s?partiel",
        r"(?i)\bCDI\b",
        r"(?i)\bCDD\b",
        r"(?i)\bIntérim\b",
        r"(?i)\bStage\b",
        r"(?i)\bAlternance\b",
        r"(?i)\bH/F\b",
        r"(?i)\bF/H\b",
        r"\(.*?\)",
        r"\s-\s",
        r"\|",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static DASHES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_]").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strips boilerplate from a scraped job title: hour mentions, contract and
/// schedule keywords, gender tags, parenthesized segments. Whitespace runs
/// collapse to single spaces and the result is sentence-cased. Total and
/// idempotent; an empty input stays empty.
pub fn clean_title(title_text: &str) -> String {
    let mut title = HOURS_RE.replace_all(title_text, "").into_owned();

    for noise in NOISE_RES.iter() {
        title = noise.replace_all(&title, " ").into_owned();
    }

    let title = DASHES_RE.replace_all(&title, " ");
    let title = WHITESPACE_RE.replace_all(&title, " ");
    capitalize(title.trim())
}

// Python-style capitalize: first char uppercased, the rest lowercased
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
