use rusqlite::{Connection, OptionalExtension, params};

use crate::error::Result;

use super::ItemStore;

const MIGRATION_SCHEMA_SQL: &str = r"
    PRAGMA journal_mode = WAL;
    CREATE TABLE IF NOT EXISTS reg_items (
        id TEXT PRIMARY KEY,
        recorded_at TEXT NOT NULL,
        effective_date TEXT,
        category TEXT NOT NULL,
        region TEXT,
        title TEXT NOT NULL,
        summary TEXT NOT NULL,
        source_url TEXT,
        source_org TEXT,
        change_type TEXT NOT NULL,
        impact_notes TEXT,
        tags TEXT
    );
";

const INDEX_SQL: &str = r"
    CREATE INDEX IF NOT EXISTS idx_recorded_at ON reg_items(recorded_at);
    CREATE INDEX IF NOT EXISTS idx_category ON reg_items(category);
    CREATE INDEX IF NOT EXISTS idx_region ON reg_items(region);
";

/// Column names used by databases created before the rename to the current schema.
const LEGACY_COLUMN_RENAMES: [(&str, &str); 2] = [("summary_md", "summary"), ("tags_csv", "tags")];

impl ItemStore {
    pub fn migrate(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(MIGRATION_SCHEMA_SQL)?;
            for (legacy, current) in LEGACY_COLUMN_RENAMES {
                if has_column(conn, "reg_items", legacy)? && !has_column(conn, "reg_items", current)?
                {
                    tracing::info!(legacy, current, "renaming legacy reg_items column");
                    conn.execute(
                        &format!("ALTER TABLE reg_items RENAME COLUMN {legacy} TO {current}"),
                        [],
                    )?;
                }
            }
            conn.execute_batch(INDEX_SQL)?;
            Ok(())
        })
    }

    pub fn schema_ready(&self) -> Result<bool> {
        self.with_conn(|conn| has_table(conn, "reg_items"))
    }
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for row in rows {
        if row? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn has_table(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1",
            params![table],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    Ok(exists)
}
