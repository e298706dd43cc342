use once_cell::sync::Lazy;
use regex::Regex;

/// Legal 35-hour month in France, in hours.
const HOURS_PER_MONTH: f64 = 151.67;
/// Standard executive day-rate year ("forfait jour"), in worked days.
const DAYS_PER_YEAR: f64 = 218.0;

/// Annual figures outside this window are treated as entry errors.
const MIN_PLAUSIBLE_ANNUAL: f64 = 14_000.0;
const MAX_PLAUSIBLE_ANNUAL: f64 = 200_000.0;

/// Bare figures in this range are statistically monthly salaries.
const MONTHLY_RANGE: std::ops::RangeInclusive<f64> = 1_200.0..=12_000.0;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

/// Converts a free-text salary expression into an annual gross figure in
/// euros, or `None` when nothing exploitable can be extracted.
///
/// Accepted shapes include `"2 500 € / mois"`, `"35k €"`, `"15 € / heure"`,
/// `"500 € / jour"` and ranges like `"30 000 - 40 000 € / an"`. Ranges
/// resolve to their midpoint (the mean of every number found). Monthly,
/// hourly and daily figures are converted to annual; a bare figure between
/// 1 200 and 12 000 is assumed monthly. Results outside the plausible
/// 14 000–200 000 window are dropped.
pub fn parse_salary(salary_text: &str) -> Option<f64> {
    let lowered = salary_text.to_lowercase();
    if lowered.trim().is_empty() || lowered.contains("non affiché") {
        return None;
    }

    // Strip regular, no-break and narrow no-break spaces, expand k -> 000
    let cleaned: String = lowered
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .collect::<String>()
        .replace('k', "000");

    let values: Vec<f64> = NUMBER_RE
        .find_iter(&cleaned)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();
    if values.is_empty() {
        return None;
    }

    // Range tie-break: midpoint
    let value = values.iter().sum::<f64>() / values.len() as f64;

    let multiplier = if cleaned.contains("mois") {
        12.0
    } else if cleaned.contains("heure") {
        HOURS_PER_MONTH * 12.0
    } else if cleaned.contains("jour") {
        DAYS_PER_YEAR
    } else if MONTHLY_RANGE.contains(&value) {
        12.0
    } else {
        1.0
    };

    let annual = value * multiplier;
    if !(MIN_PLAUSIBLE_ANNUAL..=MAX_PLAUSIBLE_ANNUAL).contains(&annual) {
        return None;
    }

    Some((annual * 100.0).round() / 100.0)
}
