use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RadarError, Result};
use crate::subsidy::format_eur;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    pub name: String,
    pub price_eur_per_month: f64,
    #[serde(default)]
    pub includes_vat: Option<bool>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl PricingTier {
    #[must_use]
    pub fn monthly_price_label(&self) -> String {
        format!("{} / month", format_eur(self.price_eur_per_month))
    }

    /// Only an explicit `includes_vat: false` marks the price as net.
    #[must_use]
    pub fn is_net_price(&self) -> bool {
        self.includes_vat == Some(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingTiers {
    #[serde(default)]
    pub tiers: Vec<PricingTier>,
}

impl PricingTiers {
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let parsed: Self = serde_norway::from_str(raw)?;
        for tier in &parsed.tiers {
            if tier.name.trim().is_empty() {
                return Err(RadarError::Validation("pricing tier without name".to_string()));
            }
            if !tier.price_eur_per_month.is_finite() || tier.price_eur_per_month < 0.0 {
                return Err(RadarError::Validation(format!(
                    "pricing tier {}: price must be a non-negative amount",
                    tier.name
                )));
            }
        }
        Ok(parsed)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }
}
