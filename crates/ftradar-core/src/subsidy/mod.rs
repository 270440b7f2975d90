//! Advisory estimates for German funding programs.
//!
//! A [`ProgramCatalog`] is matched against [`ProjectParams`]; each match yields a
//! [`SubsidyEstimate`] in catalog order. Amounts are indicative only.

mod catalog;
mod format;

use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RadarError, Result};
use crate::models::Region;

pub use catalog::ProgramCatalog;
pub use format::{UNDEFINED_PLACEHOLDER, format_eur, format_optional_eur, format_rate_percent};

/// Months over which a one-off grant is spread for the monthly benefit figure.
pub const GRANT_HORIZON_MONTHS: f64 = 120.0;

/// Monthly interest saving attributed to loans. No model supplies one yet.
pub const LOAN_SAVING_PER_MONTH: f64 = 0.0;

pub const MIN_TARGET_YEAR: i32 = 2024;
pub const MAX_TARGET_YEAR: i32 = 2030;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    #[serde(alias = "Zuschuss")]
    Grant,
    #[serde(alias = "Kredit")]
    Loan,
}

impl Instrument {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Grant => "Grant",
            Self::Loan => "Loan",
        }
    }
}

impl Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Instrument {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Grant" | "Zuschuss" => Ok(Self::Grant),
            "Loan" | "Kredit" => Ok(Self::Loan),
            other => Err(RadarError::Validation(format!("unknown instrument: {other}"))),
        }
    }
}

/// Where a program applies. `All` is a wildcard on both sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Jurisdiction {
    All,
    Region(Region),
}

impl Jurisdiction {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Region(region) => region.code(),
        }
    }
}

impl Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Jurisdiction {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed == "Alle" {
            return Ok(Self::All);
        }
        trimmed.parse::<Region>().map(Self::Region)
    }
}

impl TryFrom<String> for Jurisdiction {
    type Error = RadarError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Jurisdiction> for String {
    fn from(value: Jurisdiction) -> Self {
        value.code().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubsidyProgram {
    pub id: String,
    pub name: String,
    pub agency: String,
    pub instrument: Instrument,
    #[serde(default, alias = "tech")]
    pub technologies: Vec<String>,
    #[serde(default, alias = "sector")]
    pub sectors: Vec<String>,
    #[serde(alias = "bundeslaender")]
    pub jurisdictions: Vec<Jurisdiction>,
    #[serde(default)]
    pub grant_rate: f64,
    #[serde(default)]
    pub grant_cap: f64,
    #[serde(default)]
    pub loan_apr: Option<f64>,
    #[serde(default)]
    pub loan_term_years: Option<i32>,
    pub source: String,
}

impl SubsidyProgram {
    #[must_use]
    pub fn matches(&self, params: &ProjectParams) -> bool {
        let jurisdiction_ok = match params.jurisdiction {
            Jurisdiction::All => true,
            requested => self
                .jurisdictions
                .iter()
                .any(|accepted| *accepted == Jurisdiction::All || *accepted == requested),
        };
        jurisdiction_ok
            && intersects_or_unconstrained(&params.sectors, &self.sectors)
            && intersects_or_unconstrained(&params.technologies, &self.technologies)
    }

    #[must_use]
    pub fn estimate(&self, investment: f64) -> SubsidyEstimate {
        let grant = match self.instrument {
            Instrument::Grant => grant_amount(investment, self.grant_rate, self.grant_cap),
            Instrument::Loan => 0.0,
        };
        let monthly_loan_payment = match self.instrument {
            Instrument::Grant => None,
            Instrument::Loan => annuity_payment(investment, self.loan_apr, self.loan_term_years),
        };
        SubsidyEstimate {
            program_id: self.id.clone(),
            program_name: self.name.clone(),
            agency: self.agency.clone(),
            instrument: self.instrument,
            technologies: self.technologies.clone(),
            grant_rate: self.grant_rate,
            grant_amount: grant,
            monthly_loan_payment,
            monthly_benefit: monthly_benefit(grant, None),
            source: self.source.clone(),
        }
    }
}

fn intersects_or_unconstrained(requested: &BTreeSet<String>, offered: &[String]) -> bool {
    requested.is_empty() || offered.iter().any(|value| requested.contains(value))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectParams {
    pub jurisdiction: Jurisdiction,
    #[serde(default)]
    pub sectors: BTreeSet<String>,
    #[serde(default)]
    pub technologies: BTreeSet<String>,
    pub investment: f64,
    pub target_year: i32,
}

impl ProjectParams {
    pub fn validate(&self) -> Result<()> {
        if !self.investment.is_finite() || self.investment < 0.0 {
            return Err(RadarError::Validation(format!(
                "investment must be a non-negative amount, got {}",
                self.investment
            )));
        }
        if !(MIN_TARGET_YEAR..=MAX_TARGET_YEAR).contains(&self.target_year) {
            return Err(RadarError::Validation(format!(
                "target year must be within {MIN_TARGET_YEAR}..={MAX_TARGET_YEAR}, got {}",
                self.target_year
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubsidyEstimate {
    pub program_id: String,
    pub program_name: String,
    pub agency: String,
    pub instrument: Instrument,
    pub technologies: Vec<String>,
    pub grant_rate: f64,
    pub grant_amount: f64,
    /// `None` when the program lacks a usable rate or term.
    pub monthly_loan_payment: Option<f64>,
    pub monthly_benefit: f64,
    pub source: String,
}

/// Display strings for one estimate row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstimateRow {
    pub program: String,
    pub agency: String,
    pub instrument: String,
    pub technologies: String,
    pub grant_rate: String,
    pub grant_amount: String,
    pub monthly_loan_payment: String,
    pub monthly_benefit: String,
    pub source: String,
}

impl SubsidyEstimate {
    #[must_use]
    pub fn display_row(&self) -> EstimateRow {
        EstimateRow {
            program: self.program_name.clone(),
            agency: self.agency.clone(),
            instrument: self.instrument.to_string(),
            technologies: self.technologies.join(", "),
            grant_rate: format_rate_percent(self.grant_rate),
            grant_amount: format_eur(self.grant_amount),
            monthly_loan_payment: format_optional_eur(self.monthly_loan_payment),
            monthly_benefit: format_eur(self.monthly_benefit),
            source: self.source.clone(),
        }
    }
}

/// Matching programs with estimates, in catalog order.
pub fn estimate_subsidies(
    catalog: &ProgramCatalog,
    params: &ProjectParams,
) -> Result<Vec<SubsidyEstimate>> {
    params.validate()?;
    let estimates: Vec<SubsidyEstimate> = catalog
        .programs()
        .iter()
        .filter(|program| program.matches(params))
        .map(|program| program.estimate(params.investment))
        .collect();
    tracing::debug!(
        jurisdiction = %params.jurisdiction,
        matches = estimates.len(),
        "subsidy estimates computed"
    );
    Ok(estimates)
}

#[must_use]
pub fn grant_amount(investment: f64, rate: f64, cap: f64) -> f64 {
    (investment * rate).min(cap)
}

/// Fixed-rate annuity over `term_years * 12` monthly periods.
///
/// A zero rate repays straight-line. A missing rate or term, or a term of zero
/// or less, has no defined payment.
#[must_use]
pub fn annuity_payment(
    principal: f64,
    annual_rate: Option<f64>,
    term_years: Option<i32>,
) -> Option<f64> {
    let (annual_rate, term_years) = (annual_rate?, term_years?);
    if term_years <= 0 || !annual_rate.is_finite() {
        return None;
    }
    let periods = f64::from(term_years) * 12.0;
    let monthly_rate = annual_rate / 12.0;
    if monthly_rate == 0.0 {
        return Some(principal / periods);
    }
    let growth = (1.0 + monthly_rate).powf(periods);
    Some(principal * monthly_rate * growth / (growth - 1.0))
}

/// Grant spread over [`GRANT_HORIZON_MONTHS`] plus an optional loan saving.
#[must_use]
pub fn monthly_benefit(grant_amount: f64, loan_saving: Option<f64>) -> f64 {
    grant_amount / GRANT_HORIZON_MONTHS + loan_saving.unwrap_or(LOAN_SAVING_PER_MONTH)
}

#[cfg(test)]
mod tests;
