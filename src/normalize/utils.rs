/// Trim whitespace and strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

/// Drop thousands separators and the currency symbol: `"$1,234.50"` → `"1234.50"`.
fn strip_currency(raw: &str) -> String {
    clean_str(raw)
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect::<String>()
        .trim()
        .to_string()
}

/// `None` when the cell is not a number once currency noise is removed.
pub fn try_parse_currency(raw: &str) -> Option<f64> {
    strip_currency(raw)
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
}

/// Currency cell → number, or `0.0` when unreadable.
pub fn parse_currency(raw: &str) -> f64 {
    try_parse_currency(raw).unwrap_or(0.0)
}

/// Whole units. Decimal input is truncated toward zero.
pub fn try_parse_units(raw: &str) -> Option<i64> {
    let cleaned = strip_currency(raw);
    cleaned.parse::<i64>().ok().or_else(|| {
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.trunc() as i64)
    })
}

pub fn parse_units(raw: &str) -> i64 {
    try_parse_units(raw).unwrap_or(0)
}
