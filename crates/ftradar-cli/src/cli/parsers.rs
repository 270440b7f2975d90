use chrono::NaiveDate;
use ftradar_core::models::{Category, ChangeType, Region, parse_date};
use ftradar_core::subsidy::{Jurisdiction, MAX_TARGET_YEAR, MIN_TARGET_YEAR};

pub(super) fn parse_category(raw: &str) -> std::result::Result<Category, String> {
    raw.parse::<Category>().map_err(|_| {
        let allowed: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
        format!("unknown category '{raw}', expected one of: {}", allowed.join(", "))
    })
}

pub(super) fn parse_region(raw: &str) -> std::result::Result<Region, String> {
    raw.parse::<Region>().map_err(|_| {
        let allowed: Vec<&str> = Region::ALL.iter().map(Region::code).collect();
        format!("unknown region '{raw}', expected one of: {}", allowed.join(", "))
    })
}

pub(super) fn parse_change_type(raw: &str) -> std::result::Result<ChangeType, String> {
    raw.parse::<ChangeType>().map_err(|_| {
        let allowed: Vec<&str> = ChangeType::ALL.iter().map(ChangeType::as_str).collect();
        format!("unknown change type '{raw}', expected one of: {}", allowed.join(", "))
    })
}

pub(super) fn parse_effective_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(raw).map_err(|_| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

pub(super) fn parse_jurisdiction(raw: &str) -> std::result::Result<Jurisdiction, String> {
    raw.parse::<Jurisdiction>()
        .map_err(|_| format!("unknown jurisdiction '{raw}', expected All or a region code"))
}

pub(super) fn parse_min_one_u32(raw: &str) -> std::result::Result<u32, String> {
    let value = raw
        .parse::<u32>()
        .map_err(|_| format!("invalid integer value '{raw}'"))?;
    if value == 0 {
        return Err("value must be >= 1".to_string());
    }
    Ok(value)
}

pub(super) fn parse_investment(raw: &str) -> std::result::Result<f64, String> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| format!("invalid amount '{raw}'"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("investment must be finite and >= 0, got {value}"));
    }
    Ok(value)
}

pub(super) fn parse_target_year(raw: &str) -> std::result::Result<i32, String> {
    let value = raw
        .parse::<i32>()
        .map_err(|_| format!("invalid year '{raw}'"))?;
    if !(MIN_TARGET_YEAR..=MAX_TARGET_YEAR).contains(&value) {
        return Err(format!(
            "year must be within {MIN_TARGET_YEAR}..={MAX_TARGET_YEAR}, got {value}"
        ));
    }
    Ok(value)
}
