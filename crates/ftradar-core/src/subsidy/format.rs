/// Placeholder for values that are undefined or not finite.
pub const UNDEFINED_PLACEHOLDER: &str = "—";

/// German currency notation: `1.234,56 €`. Non-finite values render as `—`.
#[must_use]
pub fn format_eur(value: f64) -> String {
    if !value.is_finite() {
        return UNDEFINED_PLACEHOLDER.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{},{fraction} €", group_thousands(whole))
}

#[must_use]
pub fn format_optional_eur(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED_PLACEHOLDER.to_string(), format_eur)
}

/// Whole-percent rendering of a fraction; zero rates show the placeholder.
#[must_use]
pub fn format_rate_percent(rate: f64) -> String {
    if rate == 0.0 || !rate.is_finite() {
        return UNDEFINED_PLACEHOLDER.to_string();
    }
    format!("{:.0} %", rate * 100.0)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push('.');
        }
        out.push(digit);
    }
    out
}
