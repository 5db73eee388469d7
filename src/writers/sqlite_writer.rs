use crate::error::Result;
use crate::models::LocationForecast;
use crate::utils::progress::ProgressReporter;
use crate::writers::schema::{enable_foreign_keys, ensure_schema};
use rusqlite::{params, Connection, Transaction};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

const UPSERT_LOCATION_SQL: &str = "
    INSERT INTO locations(name) VALUES (?1)
    ON CONFLICT(name) DO UPDATE SET name = excluded.name
    RETURNING id";

const UPSERT_DAILY_SQL: &str = "
    INSERT INTO daily_temperatures (location_id, date, max_temp_c, min_temp_c)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(location_id, date) DO UPDATE SET
        max_temp_c = excluded.max_temp_c,
        min_temp_c = excluded.min_temp_c";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Location entries processed, duplicates included
    pub locations: usize,
    pub distinct_locations: usize,
    pub rows: usize,
}

pub struct SqliteWriter;

impl SqliteWriter {
    pub fn new() -> Self {
        Self
    }

    /// Open (or create) the database with foreign keys on and the schema in place
    pub fn open(&self, path: &Path) -> Result<Connection> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        enable_foreign_keys(&conn)?;
        ensure_schema(&conn)?;
        debug!(path = %path.display(), "Opened database");
        Ok(conn)
    }

    /// Upsert every location and its aligned daily rows in one transaction.
    /// Nothing is committed unless every row is written.
    pub fn write_forecasts(
        &self,
        conn: &mut Connection,
        forecasts: &[LocationForecast],
        progress: Option<&ProgressReporter>,
    ) -> Result<LoadSummary> {
        let tx = conn.transaction()?;
        let mut summary = LoadSummary::default();
        let mut seen = HashSet::new();

        if let Some(p) = progress {
            p.set_length(forecasts.len() as u64);
        }

        for forecast in forecasts {
            let location_id = Self::upsert_location(&tx, &forecast.name)?;
            seen.insert(location_id);

            let mut stmt = tx.prepare_cached(UPSERT_DAILY_SQL)?;
            for row in forecast.daily_rows() {
                stmt.execute(params![
                    location_id,
                    row.date,
                    row.max_temp_c,
                    row.min_temp_c
                ])?;
                summary.rows += 1;
            }

            summary.locations += 1;
            if let Some(p) = progress {
                p.set_message(&forecast.name);
                p.increment(1);
            }
        }

        tx.commit()?;
        summary.distinct_locations = seen.len();

        info!(
            locations = summary.locations,
            distinct = summary.distinct_locations,
            rows = summary.rows,
            "Committed ingestion run"
        );
        Ok(summary)
    }

    /// Insert the name if absent and return its id in a single statement
    pub fn upsert_location(tx: &Transaction<'_>, name: &str) -> Result<i64> {
        let mut stmt = tx.prepare_cached(UPSERT_LOCATION_SQL)?;
        let id = stmt.query_row([name], |row| row.get(0))?;
        Ok(id)
    }
}

impl Default for SqliteWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyReading;
    use pretty_assertions::assert_eq;

    fn memory_db() -> Result<Connection> {
        let conn = Connection::open_in_memory()?;
        enable_foreign_keys(&conn)?;
        ensure_schema(&conn)?;
        Ok(conn)
    }

    fn forecast(name: &str, days: &[(&str, Option<f64>, Option<f64>)]) -> LocationForecast {
        LocationForecast::new(
            name.to_string(),
            days.iter().map(|(d, max, _)| DailyReading::new(*d, *max)).collect(),
            days.iter().map(|(d, _, min)| DailyReading::new(*d, *min)).collect(),
        )
    }

    fn rows(conn: &Connection) -> Result<Vec<(String, String, Option<f64>, Option<f64>)>> {
        let mut stmt = conn.prepare(
            "SELECT l.name, d.date, d.max_temp_c, d.min_temp_c
             FROM daily_temperatures d JOIN locations l ON l.id = d.location_id
             ORDER BY d.date, d.location_id",
        )?;
        let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    #[test]
    fn test_empty_min_becomes_null() -> Result<()> {
        let mut conn = memory_db()?;
        let writer = SqliteWriter::new();

        writer.write_forecasts(
            &mut conn,
            &[forecast("臺北市", &[("2024-01-01", Some(18.5), None)])],
            None,
        )?;

        assert_eq!(
            rows(&conn)?,
            vec![("臺北市".to_string(), "2024-01-01".to_string(), Some(18.5), None)]
        );
        Ok(())
    }

    #[test]
    fn test_upsert_location_returns_stable_id() -> Result<()> {
        let mut conn = memory_db()?;
        let tx = conn.transaction()?;

        let first = SqliteWriter::upsert_location(&tx, "臺中市")?;
        let other = SqliteWriter::upsert_location(&tx, "嘉義市")?;
        let again = SqliteWriter::upsert_location(&tx, "臺中市")?;

        assert_eq!(first, again);
        assert_ne!(first, other);
        Ok(())
    }

    #[test]
    fn test_duplicate_names_merge_into_one_location() -> Result<()> {
        let mut conn = memory_db()?;
        let summary = SqliteWriter::new().write_forecasts(
            &mut conn,
            &[
                forecast("澎湖縣", &[("2024-01-01", Some(20.0), Some(16.0))]),
                forecast("澎湖縣", &[("2024-01-02", Some(21.0), Some(17.0))]),
            ],
            None,
        )?;

        assert_eq!(
            summary,
            LoadSummary {
                locations: 2,
                distinct_locations: 1,
                rows: 2
            }
        );
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM locations", [], |r| r.get(0))?;
        assert_eq!(count, 1);
        assert_eq!(rows(&conn)?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_second_run_overwrites_and_keeps_row_ids() -> Result<()> {
        let mut conn = memory_db()?;
        let writer = SqliteWriter::new();

        writer.write_forecasts(
            &mut conn,
            &[forecast("金門縣", &[("2024-01-01", Some(15.0), Some(10.0))])],
            None,
        )?;
        let id_before: i64 =
            conn.query_row("SELECT id FROM daily_temperatures", [], |r| r.get(0))?;

        writer.write_forecasts(
            &mut conn,
            &[forecast("金門縣", &[("2024-01-01", Some(16.5), None)])],
            None,
        )?;
        let id_after: i64 =
            conn.query_row("SELECT id FROM daily_temperatures", [], |r| r.get(0))?;

        assert_eq!(id_before, id_after);
        assert_eq!(
            rows(&conn)?,
            vec![("金門縣".to_string(), "2024-01-01".to_string(), Some(16.5), None)]
        );
        Ok(())
    }

    #[test]
    fn test_failed_run_commits_nothing() -> Result<()> {
        let mut conn = memory_db()?;
        conn.execute_batch(
            "CREATE TRIGGER reject_second BEFORE INSERT ON daily_temperatures
             WHEN NEW.date = '2024-01-02'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )?;

        let result = SqliteWriter::new().write_forecasts(
            &mut conn,
            &[
                forecast("連江縣", &[("2024-01-01", Some(12.0), Some(9.0))]),
                forecast("連江縣", &[("2024-01-02", Some(13.0), Some(9.5))]),
            ],
            None,
        );

        assert!(result.is_err());
        let locations: i64 = conn.query_row("SELECT COUNT(*) FROM locations", [], |r| r.get(0))?;
        assert_eq!(locations, 0);
        assert!(rows(&conn)?.is_empty());
        Ok(())
    }
}
