use once_cell::sync::Lazy;
use regex::Regex;

// Trailing arrondissement markers: "Paris 15e", "Lyon 2ème", "Marseille 1er"
static ARRONDISSEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s\d+(?:er|e|ème)?$").unwrap());

// "City (69)" shape used by some feeds
static PAREN_DEPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<city>.+?)\s*\((?P<dept>[^()]+)\)$").unwrap());

/// Splits a combined location string into (city, department).
///
/// Two shapes are recognized: `"City - 75"` (split on the last `" - "`) and
/// `"City (69)"`. Anything else is returned as the city with the department
/// absent. Trailing arrondissement markers are folded away so big cities
/// aggregate ("Paris 15e" becomes "Paris"). Never fails.
pub fn split_location(location_text: &str) -> (Option<String>, Option<String>) {
    let trimmed = location_text.trim();
    if trimmed.is_empty() {
        return (None, None);
    }

    let (city, department) = if let Some((city, dept)) = trimmed.rsplit_once(" - ") {
        (city.trim().to_string(), Some(dept.trim().to_string()))
    } else if let Some(caps) = PAREN_DEPT_RE.captures(trimmed) {
        (
            caps["city"].trim().to_string(),
            Some(caps["dept"].trim().to_string()),
        )
    } else {
        (trimmed.to_string(), None)
    };

    let city = ARRONDISSEMENT_RE.replace(&city, "").into_owned();
    let city = if city.is_empty() { None } else { Some(city) };
    let department = department.filter(|d| !d.is_empty());

    (city, department)
}
