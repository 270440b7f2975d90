use std::collections::BTreeSet;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};

use crate::error::{RadarError, Result};
use crate::models::{Category, Region, format_timestamp};

use super::ITEM_COLUMNS;

/// Filtered, newest-first read over the item table.
///
/// Filters combine with AND:
/// - recency: `recorded_at >= now - days` (inclusive), `now` taken at execution
///   unless pinned with [`ItemQuery::at`];
/// - categories: exact membership;
/// - regions: membership, plus rows without a region when the nationwide code
///   is requested;
/// - text: case-insensitive substring over title, summary, impact notes, tags.
///
/// Empty category/region sets and an absent text token do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    days: Option<u32>,
    categories: BTreeSet<&'static str>,
    regions: BTreeSet<&'static str>,
    text: Option<String>,
    limit: Option<usize>,
    now: Option<DateTime<Utc>>,
}

impl ItemQuery {
    /// Query without a recency bound.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    pub fn last_days(days: u32) -> Result<Self> {
        if days == 0 {
            return Err(RadarError::Validation(
                "lookback window must be at least 1 day".to_string(),
            ));
        }
        Ok(Self {
            days: Some(days),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories
            .extend(categories.into_iter().map(|category| category.as_str()));
        self
    }

    #[must_use]
    pub fn with_regions(mut self, regions: impl IntoIterator<Item = Region>) -> Self {
        self.regions
            .extend(regions.into_iter().map(|region| region.code()));
        self
    }

    /// Blank tokens are ignored.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        self.text = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Pins the evaluation time instead of sampling the clock at execution.
    #[must_use]
    pub const fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    #[must_use]
    pub const fn days(&self) -> Option<u32> {
        self.days
    }

    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub(super) fn evaluation_time(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now).trunc_subsecs(0)
    }

    pub(super) fn text_needle(&self) -> Option<String> {
        self.text.as_deref().map(str::to_lowercase)
    }

    /// Oldest included `recorded_at`. `None` without a recency bound, and also
    /// when the window reaches past the earliest representable instant, since
    /// such a window cannot exclude any row.
    #[must_use]
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let window = TimeDelta::try_days(i64::from(self.days?))?;
        now.trunc_subsecs(0).checked_sub_signed(window)
    }

    /// Recency, category and region filters as one parameterized statement.
    /// The text filter is applied by the caller on decoded rows.
    pub(super) fn to_sql(&self, now: DateTime<Utc>) -> (String, Vec<String>) {
        let mut conds = Vec::new();
        let mut values = Vec::new();

        if let Some(cutoff) = self.cutoff(now) {
            conds.push("recorded_at >= ?".to_string());
            values.push(format_timestamp(&cutoff));
        }
        if !self.categories.is_empty() {
            conds.push(format!("category IN ({})", placeholders(self.categories.len())));
            values.extend(self.categories.iter().map(ToString::to_string));
        }
        if !self.regions.is_empty() {
            let membership = format!("region IN ({})", placeholders(self.regions.len()));
            if self.regions.contains(Region::Nationwide.code()) {
                conds.push(format!("({membership} OR region IS NULL)"));
            } else {
                conds.push(membership);
            }
            values.extend(self.regions.iter().map(ToString::to_string));
        }

        let mut sql = format!("SELECT {ITEM_COLUMNS} FROM reg_items");
        if !conds.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conds.join(" AND "));
        }
        sql.push_str(" ORDER BY recorded_at DESC, id ASC");
        (sql, values)
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
            .single()
            .expect("fixed time")
    }

    #[test]
    fn zero_day_window_is_rejected() {
        assert!(matches!(
            ItemQuery::last_days(0),
            Err(RadarError::Validation(_))
        ));
    }

    #[test]
    fn sql_without_filters_selects_everything_newest_first() {
        let (sql, values) = ItemQuery::all().to_sql(fixed_now());
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY recorded_at DESC, id ASC"));
        assert!(values.is_empty());
    }

    #[test]
    fn sql_combines_filters_with_and_in_parameter_order() {
        let query = ItemQuery::last_days(7)
            .expect("query")
            .with_categories([Category::Eeg, Category::Kfw])
            .with_regions([Region::Bavaria]);
        let (sql, values) = query.to_sql(fixed_now());
        assert!(sql.contains(
            "WHERE recorded_at >= ? AND category IN (?,?) AND region IN (?)"
        ));
        assert!(!sql.contains("IS NULL"));
        assert_eq!(
            values,
            vec!["2025-06-08T12:00:00Z", "EEG", "KfW", "BY"]
        );
    }

    #[test]
    fn nationwide_region_also_matches_rows_without_region() {
        let query = ItemQuery::all().with_regions([Region::Nationwide, Region::Berlin]);
        let (sql, values) = query.to_sql(fixed_now());
        assert!(sql.contains("(region IN (?,?) OR region IS NULL)"));
        assert_eq!(values, vec!["BE", "DE"]);
    }

    #[test]
    fn blank_text_token_is_dropped() {
        let query = ItemQuery::all().with_text("   ");
        assert_eq!(query.text_needle(), None);
        let query = ItemQuery::all().with_text(" Wärme ");
        assert_eq!(query.text_needle().as_deref(), Some("wärme"));
    }

    #[test]
    fn window_past_the_calendar_range_has_no_cutoff() {
        let query = ItemQuery::last_days(u32::MAX).expect("query");
        assert_eq!(query.cutoff(fixed_now()), None);
        let (sql, values) = query.to_sql(fixed_now());
        assert!(!sql.contains("recorded_at >="));
        assert!(values.is_empty());
    }

    #[test]
    fn cutoff_is_whole_seconds() {
        let now = fixed_now() + TimeDelta::milliseconds(900);
        let query = ItemQuery::last_days(1).expect("query");
        assert_eq!(
            query.cutoff(now),
            Some(Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).single().expect("ts"))
        );
    }
}
