use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RadarError, Result};

/// Regulatory area an item belongs to. Codes are stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "EEG")]
    Eeg,
    #[serde(rename = "BEG")]
    Beg,
    #[serde(rename = "KfW")]
    Kfw,
    #[serde(rename = "MSBG")]
    Msbg,
    #[serde(rename = "Tarif")]
    Tarif,
    #[serde(rename = "Netzentgelt")]
    Netzentgelt,
    #[serde(rename = "Sonstiges")]
    Sonstiges,
}

impl Category {
    pub const ALL: [Self; 7] = [
        Self::Eeg,
        Self::Beg,
        Self::Kfw,
        Self::Msbg,
        Self::Tarif,
        Self::Netzentgelt,
        Self::Sonstiges,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eeg => "EEG",
            Self::Beg => "BEG",
            Self::Kfw => "KfW",
            Self::Msbg => "MSBG",
            Self::Tarif => "Tarif",
            Self::Netzentgelt => "Netzentgelt",
            Self::Sonstiges => "Sonstiges",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == trimmed)
            .ok_or_else(|| RadarError::InvalidCategory(s.to_string()))
    }
}

/// Jurisdiction code. `Nationwide` (`DE`) is the wildcard an absent region stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "DE")]
    Nationwide,
    #[serde(rename = "BW")]
    BadenWuerttemberg,
    #[serde(rename = "BY")]
    Bavaria,
    #[serde(rename = "BE")]
    Berlin,
    #[serde(rename = "BB")]
    Brandenburg,
    #[serde(rename = "HB")]
    Bremen,
    #[serde(rename = "HH")]
    Hamburg,
    #[serde(rename = "HE")]
    Hesse,
    #[serde(rename = "MV")]
    MecklenburgVorpommern,
    #[serde(rename = "NI")]
    LowerSaxony,
    #[serde(rename = "NW")]
    NorthRhineWestphalia,
    #[serde(rename = "RP")]
    RhinelandPalatinate,
    #[serde(rename = "SL")]
    Saarland,
    #[serde(rename = "SN")]
    Saxony,
    #[serde(rename = "ST")]
    SaxonyAnhalt,
    #[serde(rename = "SH")]
    SchleswigHolstein,
    #[serde(rename = "TH")]
    Thuringia,
    #[serde(rename = "EU")]
    EuropeanUnion,
}

impl Region {
    pub const ALL: [Self; 18] = [
        Self::Nationwide,
        Self::BadenWuerttemberg,
        Self::Bavaria,
        Self::Berlin,
        Self::Brandenburg,
        Self::Bremen,
        Self::Hamburg,
        Self::Hesse,
        Self::MecklenburgVorpommern,
        Self::LowerSaxony,
        Self::NorthRhineWestphalia,
        Self::RhinelandPalatinate,
        Self::Saarland,
        Self::Saxony,
        Self::SaxonyAnhalt,
        Self::SchleswigHolstein,
        Self::Thuringia,
        Self::EuropeanUnion,
    ];

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Nationwide => "DE",
            Self::BadenWuerttemberg => "BW",
            Self::Bavaria => "BY",
            Self::Berlin => "BE",
            Self::Brandenburg => "BB",
            Self::Bremen => "HB",
            Self::Hamburg => "HH",
            Self::Hesse => "HE",
            Self::MecklenburgVorpommern => "MV",
            Self::LowerSaxony => "NI",
            Self::NorthRhineWestphalia => "NW",
            Self::RhinelandPalatinate => "RP",
            Self::Saarland => "SL",
            Self::Saxony => "SN",
            Self::SaxonyAnhalt => "ST",
            Self::SchleswigHolstein => "SH",
            Self::Thuringia => "TH",
            Self::EuropeanUnion => "EU",
        }
    }

    /// German display name, also accepted when parsing catalog files.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Nationwide => "Deutschland",
            Self::BadenWuerttemberg => "Baden-Württemberg",
            Self::Bavaria => "Bayern",
            Self::Berlin => "Berlin",
            Self::Brandenburg => "Brandenburg",
            Self::Bremen => "Bremen",
            Self::Hamburg => "Hamburg",
            Self::Hesse => "Hessen",
            Self::MecklenburgVorpommern => "Mecklenburg-Vorpommern",
            Self::LowerSaxony => "Niedersachsen",
            Self::NorthRhineWestphalia => "Nordrhein-Westfalen",
            Self::RhinelandPalatinate => "Rheinland-Pfalz",
            Self::Saarland => "Saarland",
            Self::Saxony => "Sachsen",
            Self::SaxonyAnhalt => "Sachsen-Anhalt",
            Self::SchleswigHolstein => "Schleswig-Holstein",
            Self::Thuringia => "Thüringen",
            Self::EuropeanUnion => "EU",
        }
    }

    #[must_use]
    pub const fn is_nationwide(&self) -> bool {
        matches!(self, Self::Nationwide)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|region| {
                region.code().eq_ignore_ascii_case(trimmed) || region.name() == trimmed
            })
            .ok_or_else(|| RadarError::InvalidRegion(s.to_string()))
    }
}

/// Kind of regulatory change. Legacy German labels are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    #[serde(alias = "Neu")]
    New,
    #[serde(alias = "Änderung")]
    Amendment,
    #[serde(alias = "Auslaufend")]
    Expiring,
    #[serde(alias = "Klarstellung")]
    Clarification,
}

impl ChangeType {
    pub const ALL: [Self; 4] = [
        Self::New,
        Self::Amendment,
        Self::Expiring,
        Self::Clarification,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Amendment => "Amendment",
            Self::Expiring => "Expiring",
            Self::Clarification => "Clarification",
        }
    }

    const fn legacy_label(&self) -> &'static str {
        match self {
            Self::New => "Neu",
            Self::Amendment => "Änderung",
            Self::Expiring => "Auslaufend",
            Self::Clarification => "Klarstellung",
        }
    }
}

impl Display for ChangeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == trimmed || kind.legacy_label() == trimmed)
            .ok_or_else(|| RadarError::InvalidChangeType(s.to_string()))
    }
}
