use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use ftradar_core::models::{Category, ChangeType, Region};
use ftradar_core::subsidy::Jurisdiction;

use super::parsers::{
    parse_category, parse_change_type, parse_effective_date, parse_investment, parse_jurisdiction,
    parse_min_one_u32, parse_region, parse_target_year,
};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Explicit id; a random UUID is assigned when omitted.
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long, alias = "effective_date", value_parser = parse_effective_date)]
    pub effective_date: Option<NaiveDate>,
    #[arg(long, value_parser = parse_category)]
    pub category: Category,
    /// Region code (`BY`) or German name; omit for nationwide items.
    #[arg(long, value_parser = parse_region)]
    pub region: Option<Region>,
    #[arg(long)]
    pub title: String,
    /// Summary text, may contain inline Markdown.
    #[arg(long, alias = "summary_md")]
    pub summary: String,
    #[arg(long, alias = "source_url")]
    pub source_url: Option<String>,
    #[arg(long, alias = "source_org")]
    pub source_org: Option<String>,
    #[arg(long, alias = "change_type", value_parser = parse_change_type)]
    pub change_type: ChangeType,
    #[arg(long, alias = "impact_notes")]
    pub impact_notes: Option<String>,
    /// Comma-separated tags.
    #[arg(long, alias = "tags_csv")]
    pub tags: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,
    #[arg(long, value_parser = parse_region)]
    pub region: Option<Region>,
    /// Only items recorded within the last N days.
    #[arg(long, value_parser = parse_min_one_u32)]
    pub days: Option<u32>,
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct PathArg {
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct DigestArgs {
    /// Lookback window; defaults to `FT_RADAR_DIGEST_DAYS`.
    #[arg(long, value_parser = parse_min_one_u32)]
    pub days: Option<u32>,
    /// Write the files but never send mail.
    #[arg(long, default_value_t = false)]
    pub no_mail: bool,
}

#[derive(Debug, Args)]
pub struct SubsidyArgs {
    #[arg(long, default_value = "All", value_parser = parse_jurisdiction)]
    pub jurisdiction: Jurisdiction,
    #[arg(long = "sector", value_name = "SECTOR")]
    pub sectors: Vec<String>,
    #[arg(long = "tech", value_name = "TECHNOLOGY")]
    pub technologies: Vec<String>,
    /// Investment volume in EUR.
    #[arg(long, value_parser = parse_investment)]
    pub investment: f64,
    #[arg(long, default_value_t = 2025, value_parser = parse_target_year)]
    pub year: i32,
    /// Program catalog YAML; defaults to `FT_RADAR_PROGRAMS_PATH` or the built-in catalog.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 8501)]
    pub port: u16,
}
