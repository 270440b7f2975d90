use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use crate::error::{RadarError, Result};
use crate::models::{ItemRecord, NewItem, RegulatoryItem};

mod migration;
mod query;

pub use query::ItemQuery;

pub(crate) const ITEM_COLUMNS: &str = "id, recorded_at, effective_date, category, region, title, summary, source_url, source_org, change_type, impact_notes, tags";

const UPSERT_ITEM_SQL: &str = r"
    INSERT OR REPLACE INTO reg_items (id, recorded_at, effective_date, category, region, title, summary,
                                      source_url, source_org, change_type, impact_notes, tags)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
";

const INSERT_ITEM_SQL: &str = r"
    INSERT INTO reg_items (id, recorded_at, effective_date, category, region, title, summary,
                           source_url, source_org, change_type, impact_notes, tags)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
";

/// File-backed table of regulatory items.
///
/// Every operation opens its own connection and drops it before returning, so
/// a store value holds no open handle between calls.
#[derive(Debug, Clone)]
pub struct ItemStore {
    path: PathBuf,
}

impl ItemStore {
    fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Connection::open(&self.path)?)
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.connect()?;
        f(&conn)
    }

    fn with_tx<T>(&self, f: impl FnOnce(&rusqlite::Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Opens the store at `path`, creating the directory and schema when absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.migrate()?;
        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts a manual entry, assigning id and `recorded_at`. Fails on a duplicate id.
    pub fn add(&self, new_item: NewItem) -> Result<RegulatoryItem> {
        let item = new_item.into_item(Utc::now())?;
        self.with_conn(|conn| {
            let record = ItemRecord::from(&item);
            conn.execute(INSERT_ITEM_SQL, &record_params(&record)[..])?;
            Ok(())
        })?;
        tracing::debug!(id = %item.id, category = %item.category, "item added");
        Ok(item)
    }

    /// Inserts or replaces every record by id inside one transaction.
    ///
    /// All records are validated before anything is written.
    pub fn import_records(&self, records: Vec<ItemRecord>) -> Result<usize> {
        let mut canonical = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let item = RegulatoryItem::try_from(record).map_err(|err| {
                RadarError::Validation(format!("import record #{index} rejected: {err}"))
            })?;
            canonical.push(ItemRecord::from(&item));
        }

        let count = canonical.len();
        self.with_tx(|tx| {
            let mut stmt = tx.prepare(UPSERT_ITEM_SQL)?;
            for record in &canonical {
                stmt.execute(&record_params(record)[..])?;
            }
            Ok(())
        })?;
        tracing::info!(count, path = %self.path.display(), "items imported");
        Ok(count)
    }

    pub fn import_json(&self, path: impl AsRef<Path>) -> Result<usize> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let records: Vec<ItemRecord> = serde_json::from_str(&raw)?;
        self.import_records(records)
    }

    /// Full table in row-schema form, most recent first.
    pub fn export_records(&self) -> Result<Vec<ItemRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ITEM_COLUMNS} FROM reg_items ORDER BY recorded_at DESC, id ASC"
            ))?;
            let rows = stmt.query_map([], read_record)?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }

    pub fn export_json(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let records = self.export_records()?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&records)?)?;
        tracing::info!(count = records.len(), path = %path.display(), "items exported");
        Ok(records.len())
    }

    pub fn get(&self, id: &str) -> Result<Option<RegulatoryItem>> {
        let record = self.with_conn(|conn| {
            let record = conn
                .query_row(
                    &format!("SELECT {ITEM_COLUMNS} FROM reg_items WHERE id = ?1"),
                    params![id],
                    read_record,
                )
                .optional()?;
            Ok(record)
        })?;
        record.map(RegulatoryItem::try_from).transpose()
    }

    pub fn count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM reg_items", [], |row| {
                row.get::<_, i64>(0)
            })?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
    }

    /// Runs a filtered read; see [`ItemQuery`] for the filter semantics.
    pub fn query(&self, query: &ItemQuery) -> Result<Vec<RegulatoryItem>> {
        let now = query.evaluation_time();
        let (sql, values) = query.to_sql(now);
        let needle = query.text_needle();

        let items = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), read_record)?;

            let mut out = Vec::new();
            for row in rows {
                if query.limit().is_some_and(|limit| out.len() >= limit) {
                    break;
                }
                let item = RegulatoryItem::try_from(row?)?;
                if needle.as_deref().is_some_and(|needle| !item.matches_text(needle)) {
                    continue;
                }
                out.push(item);
            }
            Ok(out)
        })?;
        tracing::debug!(count = items.len(), "item query executed");
        Ok(items)
    }
}

fn record_params(record: &ItemRecord) -> [&dyn rusqlite::ToSql; 12] {
    [
        &record.id,
        &record.recorded_at,
        &record.effective_date,
        &record.category,
        &record.region,
        &record.title,
        &record.summary,
        &record.source_url,
        &record.source_org,
        &record.change_type,
        &record.impact_notes,
        &record.tags,
    ]
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<ItemRecord> {
    Ok(ItemRecord {
        id: row.get(0)?,
        recorded_at: row.get(1)?,
        effective_date: row.get(2)?,
        category: row.get(3)?,
        region: row.get(4)?,
        title: row.get(5)?,
        summary: row.get(6)?,
        source_url: row.get(7)?,
        source_org: row.get(8)?,
        change_type: row.get(9)?,
        impact_notes: row.get(10)?,
        tags: row.get(11)?,
    })
}

#[cfg(test)]
mod tests;
