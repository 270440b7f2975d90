use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::Connection;
use tempfile::tempdir;

use crate::models::{Category, ChangeType, NewItem, Region, format_timestamp};

use super::*;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
        .single()
        .expect("fixed time")
}

fn record(id: &str, recorded_at: DateTime<Utc>, category: &str, region: Option<&str>) -> ItemRecord {
    ItemRecord {
        id: id.to_string(),
        recorded_at: format_timestamp(&recorded_at),
        effective_date: None,
        category: category.to_string(),
        region: region.map(ToString::to_string),
        title: format!("Title {id}"),
        summary: format!("Summary {id}"),
        source_url: None,
        source_org: None,
        change_type: "New".to_string(),
        impact_notes: None,
        tags: None,
    }
}

fn open_store() -> (tempfile::TempDir, ItemStore) {
    let temp = tempdir().expect("tempdir");
    let store = ItemStore::open(temp.path().join("nested").join("radar.db")).expect("open");
    (temp, store)
}

fn ids(items: &[RegulatoryItem]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}

#[test]
fn open_creates_parent_directory_and_schema() {
    let (temp, store) = open_store();
    assert!(temp.path().join("nested").is_dir());
    assert!(store.schema_ready().expect("schema"));
    assert_eq!(store.count().expect("count"), 0);
}

#[test]
fn add_assigns_id_and_rejects_duplicates() {
    let (_temp, store) = open_store();
    let new_item = NewItem {
        id: Some("manual-1".to_string()),
        effective_date: None,
        category: Category::Beg,
        region: Some(Region::Hesse),
        title: "Heat pump bonus".to_string(),
        summary: "Bonus raised".to_string(),
        source_url: None,
        source_org: Some("BAFA".to_string()),
        change_type: ChangeType::Amendment,
        impact_notes: None,
        tags: vec!["wp".to_string()],
    };
    let item = store.add(new_item.clone()).expect("add");
    assert_eq!(item.id, "manual-1");
    assert_eq!(store.get("manual-1").expect("get"), Some(item));

    let duplicate = store.add(new_item);
    assert!(matches!(duplicate, Err(RadarError::Sqlite(_))));
    assert_eq!(store.count().expect("count"), 1);

    let generated = store
        .add(NewItem {
            id: None,
            effective_date: None,
            category: Category::Sonstiges,
            region: None,
            title: "t".to_string(),
            summary: "s".to_string(),
            source_url: None,
            source_org: None,
            change_type: ChangeType::New,
            impact_notes: None,
            tags: Vec::new(),
        })
        .expect("add generated");
    assert!(uuid::Uuid::parse_str(&generated.id).is_ok());
}

#[test]
fn import_same_id_twice_keeps_last_values() {
    let (_temp, store) = open_store();
    let first = record("dup", fixed_now(), "EEG", None);
    let mut second = record("dup", fixed_now(), "KfW", Some("BW"));
    second.title = "Replacement".to_string();

    store.import_records(vec![first]).expect("first import");
    store.import_records(vec![second]).expect("second import");

    assert_eq!(store.count().expect("count"), 1);
    let stored = store.get("dup").expect("get").expect("present");
    assert_eq!(stored.title, "Replacement");
    assert_eq!(stored.category, Category::Kfw);
    assert_eq!(stored.region, Some(Region::BadenWuerttemberg));
}

#[test]
fn invalid_import_writes_nothing() {
    let (_temp, store) = open_store();
    let good = record("good", fixed_now(), "EEG", None);
    let mut bad = record("bad", fixed_now(), "EEG", None);
    bad.change_type = "Removed".to_string();

    let err = store.import_records(vec![good, bad]).expect_err("must reject");
    assert!(err.to_string().contains("import record #1"));
    assert_eq!(store.count().expect("count"), 0);
}

#[test]
fn export_then_import_reproduces_rows() {
    let (temp, store) = open_store();
    let mut rich = record("rich", fixed_now(), "Tarif", Some("NW"));
    rich.effective_date = Some("2025-07-01".to_string());
    rich.source_url = Some("https://example.org/a_b".to_string());
    rich.impact_notes = Some("Check contracts".to_string());
    rich.tags = Some("grid,fees".to_string());
    store
        .import_records(vec![
            rich,
            record("older", fixed_now() - Duration::days(3), "EEG", None),
        ])
        .expect("seed");

    let export_path = temp.path().join("out").join("export.json");
    assert_eq!(store.export_json(&export_path).expect("export"), 2);

    let target = ItemStore::open(temp.path().join("copy.db")).expect("open copy");
    assert_eq!(target.import_json(&export_path).expect("import"), 2);

    let by_id = |records: Vec<ItemRecord>| -> BTreeMap<String, ItemRecord> {
        records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect()
    };
    assert_eq!(
        by_id(store.export_records().expect("source rows")),
        by_id(target.export_records().expect("copied rows"))
    );
}

#[test]
fn export_orders_newest_first() {
    let (_temp, store) = open_store();
    store
        .import_records(vec![
            record("old", fixed_now() - Duration::days(10), "EEG", None),
            record("new", fixed_now(), "EEG", None),
            record("mid", fixed_now() - Duration::days(1), "EEG", None),
        ])
        .expect("seed");
    let order: Vec<String> = store
        .export_records()
        .expect("export")
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(order, vec!["new", "mid", "old"]);
}

#[test]
fn recency_boundary_is_inclusive_to_the_second() {
    let (_temp, store) = open_store();
    let now = fixed_now();
    let cutoff = now - Duration::days(7);
    store
        .import_records(vec![
            record("at-cutoff", cutoff, "EEG", None),
            record("before-cutoff", cutoff - Duration::seconds(1), "EEG", None),
            record("recent", now - Duration::hours(1), "EEG", None),
        ])
        .expect("seed");

    let query = ItemQuery::last_days(7).expect("query").at(now);
    let found = store.query(&query).expect("query");
    assert_eq!(ids(&found), vec!["recent", "at-cutoff"]);
}

#[test]
fn oversized_window_returns_every_row() {
    let (_temp, store) = open_store();
    store
        .import_records(vec![
            record("recent", fixed_now() - Duration::hours(1), "EEG", None),
            record("ancient", fixed_now() - Duration::days(36_500), "EEG", None),
        ])
        .expect("seed");

    for days in [100_000_000, u32::MAX] {
        let query = ItemQuery::last_days(days).expect("query").at(fixed_now());
        let found = store.query(&query).expect("query");
        assert_eq!(ids(&found), vec!["recent", "ancient"], "days={days}");
    }
}

#[test]
fn region_filter_treats_absent_region_as_nationwide_only_on_request() {
    let (_temp, store) = open_store();
    store
        .import_records(vec![
            record("federal", fixed_now(), "EEG", None),
            record("bavaria", fixed_now() - Duration::minutes(1), "EEG", Some("BY")),
            record("explicit-de", fixed_now() - Duration::minutes(2), "EEG", Some("DE")),
        ])
        .expect("seed");

    let nationwide = ItemQuery::all().with_regions([Region::Nationwide]);
    assert_eq!(
        ids(&store.query(&nationwide).expect("query")),
        vec!["federal", "explicit-de"]
    );

    let bavaria_only = ItemQuery::all().with_regions([Region::Bavaria]);
    assert_eq!(ids(&store.query(&bavaria_only).expect("query")), vec!["bavaria"]);
}

#[test]
fn category_and_text_filters_combine_with_limit() {
    let (_temp, store) = open_store();
    let mut tagged = record("tagged", fixed_now(), "BEG", None);
    tagged.tags = Some("Wärmepumpe,Förderung".to_string());
    let mut noted = record("noted", fixed_now() - Duration::minutes(1), "BEG", None);
    noted.impact_notes = Some("WÄRMEPUMPE betroffen".to_string());
    let other_category = {
        let mut row = record("other", fixed_now(), "EEG", None);
        row.title = "Wärmepumpe im EEG".to_string();
        row
    };
    store
        .import_records(vec![tagged, noted, other_category, record("plain", fixed_now(), "BEG", None)])
        .expect("seed");

    let query = ItemQuery::all()
        .with_categories([Category::Beg])
        .with_text("wärmepumpe");
    assert_eq!(ids(&store.query(&query).expect("query")), vec!["tagged", "noted"]);

    let limited = query.with_limit(1);
    assert_eq!(ids(&store.query(&limited).expect("query")), vec!["tagged"]);
}

#[test]
fn query_without_matches_is_empty_not_error() {
    let (_temp, store) = open_store();
    let found = store
        .query(&ItemQuery::last_days(1).expect("query").with_text("nothing"))
        .expect("query");
    assert!(found.is_empty());
}

#[test]
fn legacy_column_names_are_migrated() {
    let temp = tempdir().expect("tempdir");
    let db_path = temp.path().join("legacy.db");
    {
        let conn = Connection::open(&db_path).expect("open raw");
        conn.execute_batch(
            r"
            CREATE TABLE reg_items (
                id TEXT PRIMARY KEY,
                recorded_at TEXT NOT NULL,
                effective_date TEXT,
                category TEXT NOT NULL,
                region TEXT,
                title TEXT NOT NULL,
                summary_md TEXT NOT NULL,
                source_url TEXT,
                source_org TEXT,
                change_type TEXT NOT NULL,
                impact_notes TEXT,
                tags_csv TEXT
            );
            INSERT INTO reg_items VALUES (
                'legacy-1', '2025-01-01T00:00:00Z', NULL, 'EEG', NULL, 'Alt', 'Altbestand',
                NULL, 'BMWK', 'Änderung', NULL, 'alt,bestand'
            );
            ",
        )
        .expect("seed legacy schema");
    }

    let store = ItemStore::open(&db_path).expect("migrate");
    let item = store.get("legacy-1").expect("get").expect("present");
    assert_eq!(item.summary, "Altbestand");
    assert_eq!(item.change_type, ChangeType::Amendment);
    assert_eq!(item.tags, vec!["alt".to_string(), "bestand".to_string()]);
}
