use std::collections::BTreeSet;

use serde::Deserialize;

use ftradar_core::ItemQuery;
use ftradar_core::config::MAX_DASHBOARD_DAYS;
use ftradar_core::error::{RadarError, Result};
use ftradar_core::models::{Category, Region};
use ftradar_core::subsidy::{Jurisdiction, ProjectParams};

const DEFAULT_INVESTMENT: f64 = 120_000.0;
const DEFAULT_TARGET_YEAR: i32 = 2025;
const DEFAULT_SECTORS: [&str; 1] = ["Wohnungswirtschaft"];
const DEFAULT_TECHNOLOGIES: [&str; 2] = ["PV", "Speicher"];

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub code: String,
}

/// Every value given for `key`, split on commas, trimmed, blanks dropped.
/// Repeated keys and comma-separated lists are equivalent.
fn values<'a>(pairs: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    pairs
        .iter()
        .filter(|(name, _)| name == key)
        .flat_map(|(_, value)| value.split(','))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect()
}

fn single<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    values(pairs, key).into_iter().last()
}

/// Dashboard radar filters as given on the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RadarFilter {
    pub(crate) days: u32,
    pub(crate) categories: Vec<Category>,
    pub(crate) regions: Vec<Region>,
    pub(crate) text: Option<String>,
}

impl RadarFilter {
    pub(crate) fn from_pairs(pairs: &[(String, String)], default_days: u32) -> Result<Self> {
        let days = match single(pairs, "days") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| RadarError::Validation(format!("invalid days value: {raw}")))?,
            None => default_days,
        };
        if !(1..=MAX_DASHBOARD_DAYS).contains(&days) {
            return Err(RadarError::Validation(format!(
                "days must be within 1..={MAX_DASHBOARD_DAYS}, got {days}"
            )));
        }
        let categories = values(pairs, "category")
            .into_iter()
            .map(str::parse::<Category>)
            .collect::<Result<Vec<_>>>()?;
        let regions = values(pairs, "region")
            .into_iter()
            .map(str::parse::<Region>)
            .collect::<Result<Vec<_>>>()?;
        let text = pairs
            .iter()
            .rev()
            .find(|(name, _)| name == "q")
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Ok(Self {
            days,
            categories,
            regions,
            text,
        })
    }

    pub(crate) fn query(&self) -> Result<ItemQuery> {
        let query = ItemQuery::last_days(self.days)?
            .with_categories(self.categories.iter().copied())
            .with_regions(self.regions.iter().copied());
        Ok(match &self.text {
            Some(text) => query.with_text(text.clone()),
            None => query,
        })
    }

    /// Query string reproducing this filter, for the CSV link.
    pub(crate) fn query_string(&self) -> String {
        let mut parts = vec![format!("days={}", self.days)];
        if !self.categories.is_empty() {
            let joined: Vec<&str> = self.categories.iter().map(Category::as_str).collect();
            parts.push(format!("category={}", joined.join(",")));
        }
        if !self.regions.is_empty() {
            let joined: Vec<&str> = self.regions.iter().map(Region::code).collect();
            parts.push(format!("region={}", joined.join(",")));
        }
        if let Some(text) = &self.text {
            parts.push(format!("q={}", urlencoding::encode(text)));
        }
        parts.join("&")
    }
}

/// Calculator inputs; an empty query string yields the sample project defaults.
pub(crate) fn project_params_from_pairs(pairs: &[(String, String)]) -> Result<ProjectParams> {
    if pairs.is_empty() {
        return Ok(ProjectParams {
            jurisdiction: Jurisdiction::All,
            sectors: DEFAULT_SECTORS.iter().map(ToString::to_string).collect(),
            technologies: DEFAULT_TECHNOLOGIES.iter().map(ToString::to_string).collect(),
            investment: DEFAULT_INVESTMENT,
            target_year: DEFAULT_TARGET_YEAR,
        });
    }

    let jurisdiction = single(pairs, "jurisdiction")
        .map(str::parse::<Jurisdiction>)
        .transpose()?
        .unwrap_or(Jurisdiction::All);
    let investment = match single(pairs, "investment") {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| RadarError::Validation(format!("invalid investment: {raw}")))?,
        None => DEFAULT_INVESTMENT,
    };
    let target_year = match single(pairs, "year") {
        Some(raw) => raw
            .parse::<i32>()
            .map_err(|_| RadarError::Validation(format!("invalid year: {raw}")))?,
        None => DEFAULT_TARGET_YEAR,
    };
    let params = ProjectParams {
        jurisdiction,
        sectors: collect_set(values(pairs, "sector")),
        technologies: collect_set(values(pairs, "tech")),
        investment,
        target_year,
    };
    params.validate()?;
    Ok(params)
}

fn collect_set(values: Vec<&str>) -> BTreeSet<String> {
    values.into_iter().map(ToString::to_string).collect()
}

pub(crate) fn project_query_string(params: &ProjectParams) -> String {
    let mut parts = vec![
        format!("jurisdiction={}", params.jurisdiction.code()),
        format!("investment={}", params.investment),
        format!("year={}", params.target_year),
    ];
    for sector in &params.sectors {
        parts.push(format!("sector={}", urlencoding::encode(sector)));
    }
    for tech in &params.technologies {
        parts.push(format!("tech={}", urlencoding::encode(tech)));
    }
    parts.join("&")
}
