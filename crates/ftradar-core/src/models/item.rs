use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RadarError, Result};

use super::taxonomy::{Category, ChangeType, Region};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One curated regulatory change record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegulatoryItem {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    pub effective_date: Option<NaiveDate>,
    pub category: Category,
    pub region: Option<Region>,
    pub title: String,
    pub summary: String,
    pub source_url: Option<String>,
    pub source_org: Option<String>,
    pub change_type: ChangeType,
    pub impact_notes: Option<String>,
    pub tags: Vec<String>,
}

/// Row-schema shaped record used for JSON import/export and raw storage reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub recorded_at: String,
    #[serde(default)]
    pub effective_date: Option<String>,
    pub category: String,
    #[serde(default)]
    pub region: Option<String>,
    pub title: String,
    #[serde(alias = "summary_md")]
    pub summary: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source_org: Option<String>,
    pub change_type: String,
    #[serde(default)]
    pub impact_notes: Option<String>,
    #[serde(default, alias = "tags_csv")]
    pub tags: Option<String>,
}

/// Input for a manual entry; id and timestamp are assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub id: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub category: Category,
    pub region: Option<Region>,
    pub title: String,
    pub summary: String,
    pub source_url: Option<String>,
    pub source_org: Option<String>,
    pub change_type: ChangeType,
    pub impact_notes: Option<String>,
    pub tags: Vec<String>,
}

impl NewItem {
    pub fn into_item(self, recorded_at: DateTime<Utc>) -> Result<RegulatoryItem> {
        let id = match normalize_optional(self.id) {
            Some(id) => id,
            None => uuid::Uuid::new_v4().to_string(),
        };
        let item = RegulatoryItem {
            id,
            recorded_at: recorded_at.trunc_subsecs(0),
            effective_date: self.effective_date,
            category: self.category,
            region: self.region,
            title: self.title.trim().to_string(),
            summary: self.summary.trim().to_string(),
            source_url: normalize_optional(self.source_url),
            source_org: normalize_optional(self.source_org),
            change_type: self.change_type,
            impact_notes: normalize_optional(self.impact_notes),
            tags: self
                .tags
                .into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
        };
        item.validate()?;
        Ok(item)
    }
}

impl RegulatoryItem {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(RadarError::Validation("item id must not be empty".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(RadarError::Validation(format!(
                "item {} has an empty title",
                self.id
            )));
        }
        if self.summary.trim().is_empty() {
            return Err(RadarError::Validation(format!(
                "item {} has an empty summary",
                self.id
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn tags_text(&self) -> Option<String> {
        join_tags(&self.tags)
    }

    /// Case-insensitive substring match over title, summary, impact notes and tags.
    #[must_use]
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        if needle_lower.is_empty() {
            return true;
        }
        let contains = |value: &str| value.to_lowercase().contains(needle_lower);
        contains(&self.title)
            || contains(&self.summary)
            || self.impact_notes.as_deref().is_some_and(contains)
            || self.tags_text().as_deref().is_some_and(contains)
    }
}

impl TryFrom<ItemRecord> for RegulatoryItem {
    type Error = RadarError;

    fn try_from(record: ItemRecord) -> Result<Self> {
        let item = Self {
            id: record.id.trim().to_string(),
            recorded_at: parse_timestamp(&record.recorded_at)?,
            effective_date: normalize_optional(record.effective_date)
                .map(|raw| parse_date(&raw))
                .transpose()?,
            category: record.category.parse()?,
            region: normalize_optional(record.region)
                .map(|raw| raw.parse())
                .transpose()?,
            title: record.title.trim().to_string(),
            summary: record.summary.trim().to_string(),
            source_url: normalize_optional(record.source_url),
            source_org: normalize_optional(record.source_org),
            change_type: record.change_type.parse()?,
            impact_notes: normalize_optional(record.impact_notes),
            tags: record.tags.as_deref().map(parse_tags).unwrap_or_default(),
        };
        item.validate()?;
        Ok(item)
    }
}

impl From<&RegulatoryItem> for ItemRecord {
    fn from(item: &RegulatoryItem) -> Self {
        Self {
            id: item.id.clone(),
            recorded_at: format_timestamp(&item.recorded_at),
            effective_date: item.effective_date.map(|date| format_date(&date)),
            category: item.category.as_str().to_string(),
            region: item.region.map(|region| region.code().to_string()),
            title: item.title.clone(),
            summary: item.summary.clone(),
            source_url: item.source_url.clone(),
            source_org: item.source_org.clone(),
            change_type: item.change_type.as_str().to_string(),
            impact_notes: item.impact_notes.clone(),
            tags: item.tags_text(),
        }
    }
}

#[must_use]
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses RFC 3339 or a bare `YYYY-MM-DDTHH:MM:SS` (taken as UTC), truncated to seconds.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc).trunc_subsecs(0));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().trunc_subsecs(0))
        .map_err(|_| RadarError::InvalidTimestamp(raw.to_string()))
}

#[must_use]
pub fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| RadarError::InvalidTimestamp(raw.to_string()))
}

#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[must_use]
pub fn join_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(","))
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record() -> ItemRecord {
        ItemRecord {
            id: "eeg-1".to_string(),
            recorded_at: "2025-03-01T08:30:00Z".to_string(),
            effective_date: Some("2025-04-01".to_string()),
            category: "EEG".to_string(),
            region: Some("BY".to_string()),
            title: "Feed-in tariff update".to_string(),
            summary: "New rates for *small* PV.".to_string(),
            source_url: None,
            source_org: Some("BNetzA".to_string()),
            change_type: "Neu".to_string(),
            impact_notes: Some("  ".to_string()),
            tags: Some("pv, tariff,,".to_string()),
        }
    }

    #[test]
    fn record_converts_into_validated_item() {
        let item = RegulatoryItem::try_from(record()).expect("convert");
        assert_eq!(item.category, Category::Eeg);
        assert_eq!(item.region, Some(Region::Bavaria));
        assert_eq!(item.change_type, ChangeType::New);
        assert_eq!(item.impact_notes, None);
        assert_eq!(item.tags, vec!["pv".to_string(), "tariff".to_string()]);
        assert_eq!(
            item.recorded_at,
            Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).single().expect("ts")
        );
    }

    #[test]
    fn record_roundtrip_is_canonical() {
        let item = RegulatoryItem::try_from(record()).expect("convert");
        let back = ItemRecord::from(&item);
        assert_eq!(back.recorded_at, "2025-03-01T08:30:00Z");
        assert_eq!(back.change_type, "New");
        assert_eq!(back.tags.as_deref(), Some("pv,tariff"));
    }

    #[test]
    fn record_with_unknown_category_is_rejected() {
        let mut raw = record();
        raw.category = "Energy".to_string();
        assert!(matches!(
            RegulatoryItem::try_from(raw),
            Err(RadarError::InvalidCategory(_))
        ));
    }

    #[test]
    fn legacy_json_aliases_are_accepted() {
        let raw = r#"{
            "id": "x1",
            "recorded_at": "2025-01-02T03:04:05.678Z",
            "category": "BEG",
            "title": "t",
            "summary_md": "s",
            "change_type": "Amendment",
            "tags_csv": "a,b"
        }"#;
        let record: ItemRecord = serde_json::from_str(raw).expect("parse");
        let item = RegulatoryItem::try_from(record).expect("convert");
        assert_eq!(item.summary, "s");
        assert_eq!(item.tags.len(), 2);
        assert_eq!(format_timestamp(&item.recorded_at), "2025-01-02T03:04:05Z");
    }

    #[test]
    fn bare_timestamp_is_read_as_utc() {
        let parsed = parse_timestamp("2025-01-02T03:04:05").expect("parse");
        assert_eq!(format_timestamp(&parsed), "2025-01-02T03:04:05Z");
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn text_match_is_case_insensitive_across_fields() {
        let mut item = RegulatoryItem::try_from(record()).expect("convert");
        item.impact_notes = Some("Betrifft Wärmepumpen".to_string());
        assert!(item.matches_text("feed-in"));
        assert!(item.matches_text("wärmepumpen"));
        assert!(item.matches_text("tariff"));
        assert!(!item.matches_text("speicher"));
    }

    #[test]
    fn new_item_gets_generated_id_and_whole_seconds() {
        let now = Utc
            .with_ymd_and_hms(2025, 5, 5, 12, 0, 0)
            .single()
            .expect("ts")
            + chrono::Duration::milliseconds(750);
        let item = NewItem {
            id: None,
            effective_date: None,
            category: Category::Tarif,
            region: None,
            title: "Grid fee".to_string(),
            summary: "Summary".to_string(),
            source_url: Some(String::new()),
            source_org: None,
            change_type: ChangeType::Clarification,
            impact_notes: None,
            tags: vec![" a ".to_string(), String::new()],
        }
        .into_item(now)
        .expect("item");
        assert!(!item.id.is_empty());
        assert_eq!(format_timestamp(&item.recorded_at), "2025-05-05T12:00:00Z");
        assert_eq!(item.source_url, None);
        assert_eq!(item.tags, vec!["a".to_string()]);
    }
}
