use std::ops::RangeInclusive;

/// Source of raw configuration values, keyed by environment variable name.
pub trait EnvLookup {
    fn get(&self, name: &str) -> Option<String>;
}

impl<F> EnvLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        self(name)
    }
}

#[must_use]
pub(super) fn read_non_empty(lookup: &dyn EnvLookup, name: &str) -> Option<String> {
    lookup
        .get(name)
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Values below the range, or not a number, fall back to `default_value`;
/// values above it are clamped. Both cases are logged.
#[must_use]
pub(super) fn read_u32(
    lookup: &dyn EnvLookup,
    name: &str,
    default_value: u32,
    bounds: RangeInclusive<u32>,
) -> u32 {
    let Some(raw) = read_non_empty(lookup, name) else {
        return default_value;
    };
    match raw.parse::<u32>() {
        Ok(value) if value > *bounds.end() => {
            tracing::warn!(name, value, max = *bounds.end(), "value above limit; clamped");
            *bounds.end()
        }
        Ok(value) if value >= *bounds.start() => value,
        _ => {
            tracing::warn!(name, raw = %raw, default_value, "invalid value ignored; using default");
            default_value
        }
    }
}

#[must_use]
pub(super) fn read_u16(lookup: &dyn EnvLookup, name: &str) -> Option<u16> {
    lookup
        .get(name)
        .and_then(|raw| raw.trim().parse::<u16>().ok())
}

#[must_use]
pub(super) fn parse_enabled_default_false(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|value| value.trim().to_ascii_lowercase())
            .as_deref(),
        Some("true" | "1" | "yes" | "on")
    )
}

#[must_use]
pub(super) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .collect()
}
