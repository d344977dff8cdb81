//! Money and quantity display formatting.

/// Formats a value with exactly two decimals, rounding half away from zero.
///
/// Rounding applies to the binary value, not the decimal literal it came from:
/// `1.005` is stored just below the midpoint and formats as `"1.00"`.
///
/// Non-finite input (NaN, infinity) formats as `"0.00"` so a missing or
/// broken number never reaches a display surface. Negative values that round
/// to zero lose their sign.
#[must_use]
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 || !rounded.is_finite() {
        return "0.00".to_string();
    }
    format!("{rounded:.2}")
}

/// Parses a user-entered decimal, accepting surrounding whitespace and a
/// comma as the decimal separator.
///
/// Returns None for empty, unparseable or non-finite input.
#[must_use]
pub fn parse_decimal(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
