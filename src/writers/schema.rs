use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS locations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS daily_temperatures (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        location_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        max_temp_c REAL,
        min_temp_c REAL,
        UNIQUE(location_id, date),
        FOREIGN KEY(location_id) REFERENCES locations(id)
    );

    CREATE INDEX IF NOT EXISTS idx_daily_temperatures_loc_date
        ON daily_temperatures(location_id, date);
";

/// Create the tables and index if they are missing. Existing data is untouched.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Foreign keys are off by default in SQLite and must be enabled per connection
pub fn enable_foreign_keys(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    Ok(())
}

pub fn has_table(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
