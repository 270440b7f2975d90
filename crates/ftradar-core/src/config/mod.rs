use std::path::PathBuf;

mod env;
mod mail;

pub use env::EnvLookup;
pub use mail::{MailConfig, SmtpSettings};

use env::{parse_enabled_default_false, read_non_empty, read_u32};

const ENV_DB_PATH: &str = "FT_RADAR_DB_PATH";
const ENV_DEFAULT_DAYS: &str = "FT_RADAR_DEFAULT_DAYS";
const ENV_DIGEST_DAYS: &str = "FT_RADAR_DIGEST_DAYS";
const ENV_DIGEST_MD: &str = "FT_RADAR_DIGEST_MD";
const ENV_DIGEST_HTML: &str = "FT_RADAR_DIGEST_HTML";
const ENV_ACCESS_CODE: &str = "FT_RADAR_ACCESS_CODE";
const ENV_ALLOW_PUBLIC: &str = "FT_RADAR_ALLOW_PUBLIC";
const ENV_TIERS_PATH: &str = "FT_RADAR_TIERS_PATH";
const ENV_PROGRAMS_PATH: &str = "FT_RADAR_PROGRAMS_PATH";

const DEFAULT_DB_PATH: &str = "data/radar.db";
const DEFAULT_DASHBOARD_DAYS: u32 = 14;
const DEFAULT_DIGEST_DAYS: u32 = 7;
const DEFAULT_DIGEST_MD: &str = "data/digest_last_7_days.md";
const DEFAULT_DIGEST_HTML: &str = "data/digest_last_7_days.html";
const DEFAULT_TIERS_PATH: &str = "config/tiers.yaml";

/// Longest lookback the dashboard accepts, in days.
pub const MAX_DASHBOARD_DAYS: u32 = 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadarConfig {
    pub db_path: PathBuf,
    pub default_days: u32,
    pub digest: DigestConfig,
    pub mail: MailConfig,
    pub access: AccessConfig,
    pub tiers_path: PathBuf,
    pub programs_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestConfig {
    pub days: u32,
    pub markdown_path: PathBuf,
    pub html_path: PathBuf,
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccessConfig {
    pub access_code: Option<String>,
    pub allow_public: bool,
}

impl std::fmt::Debug for AccessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessConfig")
            .field("access_code", &self.access_code.as_ref().map(|_| "<redacted>"))
            .field("allow_public", &self.allow_public)
            .finish()
    }
}

impl RadarConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(&|name: &str| std::env::var(name).ok())
    }

    #[must_use]
    pub fn from_lookup(lookup: &dyn EnvLookup) -> Self {
        Self {
            db_path: read_path(lookup, ENV_DB_PATH, DEFAULT_DB_PATH),
            default_days: read_u32(
                lookup,
                ENV_DEFAULT_DAYS,
                DEFAULT_DASHBOARD_DAYS,
                1..=MAX_DASHBOARD_DAYS,
            ),
            digest: DigestConfig {
                days: read_u32(lookup, ENV_DIGEST_DAYS, DEFAULT_DIGEST_DAYS, 1..=u32::MAX),
                markdown_path: read_path(lookup, ENV_DIGEST_MD, DEFAULT_DIGEST_MD),
                html_path: read_path(lookup, ENV_DIGEST_HTML, DEFAULT_DIGEST_HTML),
            },
            mail: MailConfig::from_lookup(lookup),
            access: AccessConfig {
                access_code: read_non_empty(lookup, ENV_ACCESS_CODE),
                allow_public: parse_enabled_default_false(
                    read_non_empty(lookup, ENV_ALLOW_PUBLIC).as_deref(),
                ),
            },
            tiers_path: read_path(lookup, ENV_TIERS_PATH, DEFAULT_TIERS_PATH),
            programs_path: read_non_empty(lookup, ENV_PROGRAMS_PATH).map(PathBuf::from),
        }
    }
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self::from_lookup(&|_: &str| None)
    }
}

fn read_path(lookup: &dyn EnvLookup, name: &str, default_value: &str) -> PathBuf {
    PathBuf::from(read_non_empty(lookup, name).unwrap_or_else(|| default_value.to_string()))
}
