use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::{RadarError, Result};
use crate::models::Region;

use super::{Instrument, Jurisdiction, SubsidyProgram};

const SECTOR_HOUSING: &str = "Wohnungswirtschaft";
const SECTOR_COMMERCIAL: &str = "Gewerbe/Industrie";
const SECTOR_MUNICIPAL: &str = "Kommunen";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    programs: Vec<SubsidyProgram>,
}

/// Validated, ordered set of funding programs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramCatalog {
    programs: Vec<SubsidyProgram>,
}

impl ProgramCatalog {
    pub fn new(programs: Vec<SubsidyProgram>) -> Result<Self> {
        validate_programs(&programs)?;
        Ok(Self { programs })
    }

    /// Sample programs shipped with the tool.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            programs: builtin_programs(),
        }
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let file: CatalogFile = serde_norway::from_str(raw)?;
        Self::new(file.programs)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_yaml_str(&raw).map_err(|err| match err {
            RadarError::Validation(message) => {
                RadarError::Validation(format!("{}: {message}", path.display()))
            }
            other => other,
        })?;
        tracing::info!(
            path = %path.display(),
            programs = catalog.programs.len(),
            "program catalog loaded"
        );
        Ok(catalog)
    }

    /// Catalog file when configured, built-in programs otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::builtin()), Self::load)
    }

    #[must_use]
    pub fn programs(&self) -> &[SubsidyProgram] {
        &self.programs
    }

    /// `All` first, then every region some program accepts.
    #[must_use]
    pub fn jurisdiction_options(&self) -> Vec<Jurisdiction> {
        let mut options: BTreeSet<Jurisdiction> = self
            .programs
            .iter()
            .flat_map(|program| program.jurisdictions.iter().copied())
            .collect();
        options.insert(Jurisdiction::All);
        options.into_iter().collect()
    }

    #[must_use]
    pub fn sector_options(&self) -> Vec<String> {
        collect_sorted(self.programs.iter().flat_map(|program| &program.sectors))
    }

    #[must_use]
    pub fn technology_options(&self) -> Vec<String> {
        collect_sorted(self.programs.iter().flat_map(|program| &program.technologies))
    }
}

impl Default for ProgramCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn collect_sorted<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn validate_programs(programs: &[SubsidyProgram]) -> Result<()> {
    let mut seen = HashSet::new();
    for program in programs {
        let id = program.id.trim();
        if id.is_empty() {
            return Err(RadarError::Validation("program id must not be empty".to_string()));
        }
        if !seen.insert(id) {
            return Err(RadarError::Validation(format!("duplicate program id: {id}")));
        }
        if !program.grant_rate.is_finite() || !(0.0..=1.0).contains(&program.grant_rate) {
            return Err(RadarError::Validation(format!(
                "{id}: grant rate must be within [0, 1], got {}",
                program.grant_rate
            )));
        }
        if !program.grant_cap.is_finite() || program.grant_cap < 0.0 {
            return Err(RadarError::Validation(format!(
                "{id}: grant cap must not be negative, got {}",
                program.grant_cap
            )));
        }
        if program.jurisdictions.is_empty() {
            return Err(RadarError::Validation(format!(
                "{id}: at least one jurisdiction is required"
            )));
        }
        match program.instrument {
            Instrument::Grant if program.loan_apr.is_some() || program.loan_term_years.is_some() => {
                return Err(RadarError::Validation(format!(
                    "{id}: loan terms are only allowed on loan programs"
                )));
            }
            Instrument::Loan if program.grant_rate != 0.0 => {
                return Err(RadarError::Validation(format!(
                    "{id}: grant rate must be 0 on loan programs"
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn builtin_programs() -> Vec<SubsidyProgram> {
    vec![
        SubsidyProgram {
            id: "BAFA-WP-2025".to_string(),
            name: "BAFA – Bundesförderung effiziente Gebäude (BEG) – Einzelmaßnahmen Wärmepumpe".to_string(),
            agency: "BAFA".to_string(),
            instrument: Instrument::Grant,
            technologies: strings(&["Wärmepumpe"]),
            sectors: strings(&[SECTOR_HOUSING, SECTOR_COMMERCIAL]),
            jurisdictions: vec![Jurisdiction::All],
            grant_rate: 0.25,
            grant_cap: 30_000.0,
            loan_apr: None,
            loan_term_years: None,
            source: "https://www.bafa.de/DE/Energie/BEG/EM/Heizung/heizung_node.html".to_string(),
        },
        SubsidyProgram {
            id: "KfW-270-2025".to_string(),
            name: "KfW 270 – Erneuerbare Energien – Standard (PV & Speicher)".to_string(),
            agency: "KfW".to_string(),
            instrument: Instrument::Loan,
            technologies: strings(&["PV", "Speicher"]),
            sectors: strings(&[SECTOR_HOUSING, SECTOR_COMMERCIAL, SECTOR_MUNICIPAL]),
            jurisdictions: vec![Jurisdiction::All],
            grant_rate: 0.0,
            grant_cap: 0.0,
            loan_apr: Some(0.03),
            loan_term_years: Some(10),
            source: "https://www.kfw.de/270/".to_string(),
        },
        SubsidyProgram {
            id: "Land-BW-PV-2025".to_string(),
            name: "Landesprogramm BW – PV auf Mehrfamilienhäusern (Beispiel)".to_string(),
            agency: "MWK/Landesbank".to_string(),
            instrument: Instrument::Grant,
            technologies: strings(&["PV"]),
            sectors: strings(&[SECTOR_HOUSING]),
            jurisdictions: vec![Jurisdiction::Region(Region::BadenWuerttemberg)],
            grant_rate: 0.10,
            grant_cap: 50_000.0,
            loan_apr: None,
            loan_term_years: None,
            source: "https://www.baden-wuerttemberg.de".to_string(),
        },
    ]
}
