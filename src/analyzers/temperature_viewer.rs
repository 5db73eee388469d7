use crate::error::{IngestError, Result};
use crate::models::{LocationSummary, StoredTemperature};
use crate::utils::constants::DATE_FORMAT;
use crate::writers::schema::has_table;
use chrono::NaiveDate;
use clap::ValueEnum;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OpenFlags, OptionalExtension};
use std::fmt::Write as _;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// Filters for the browse table. Empty `locations` means every location.
#[derive(Debug, Clone, Default)]
pub struct TemperatureQuery {
    pub locations: Vec<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Debug)]
pub struct StoreStatistics {
    pub locations: usize,
    pub rows: usize,
    pub date_range: Option<(String, String)>,
    pub missing_max: usize,
    pub missing_min: usize,
    pub hottest: Option<(String, String, f64)>,
    pub coldest: Option<(String, String, f64)>,
}

impl StoreStatistics {
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Locations: {}", self.locations);
        let _ = writeln!(out, "Daily rows: {}", self.rows);
        if let Some((first, last)) = &self.date_range {
            let _ = writeln!(out, "Date range: {} to {}", first, last);
        }
        let _ = writeln!(
            out,
            "Missing values: {} max, {} min",
            self.missing_max, self.missing_min
        );
        if let Some((location, date, temp)) = &self.hottest {
            let _ = writeln!(out, "Highest max: {:.1}°C at {} on {}", temp, location, date);
        }
        if let Some((location, date, temp)) = &self.coldest {
            let _ = writeln!(out, "Lowest min: {:.1}°C at {} on {}", temp, location, date);
        }
        out.trim_end().to_string()
    }
}

/// Read-only access to an ingested database
pub struct TemperatureViewer;

impl TemperatureViewer {
    pub fn new() -> Self {
        Self
    }

    /// Open an existing database without creating it
    pub fn open(&self, path: &Path) -> Result<Connection> {
        if !path.is_file() {
            return Err(IngestError::FileNotFound {
                tried: vec![path.to_path_buf()],
            });
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        if !has_table(&conn, "daily_temperatures")? {
            return Err(IngestError::EmptyStore(path.to_path_buf()));
        }
        Ok(conn)
    }

    /// Rows ordered by date, then location id
    pub fn fetch(&self, conn: &Connection, query: &TemperatureQuery) -> Result<Vec<StoredTemperature>> {
        let mut sql = String::from(
            "SELECT d.location_id, l.name, d.date, d.max_temp_c, d.min_temp_c
             FROM daily_temperatures d
             JOIN locations l ON l.id = d.location_id
             WHERE 1 = 1",
        );
        let mut args: Vec<SqlValue> = Vec::new();

        if !query.locations.is_empty() {
            let placeholders = vec!["?"; query.locations.len()].join(", ");
            let _ = write!(sql, " AND l.name IN ({})", placeholders);
            args.extend(query.locations.iter().cloned().map(SqlValue::Text));
        }
        if let Some(from) = query.from {
            sql.push_str(" AND d.date >= ?");
            args.push(SqlValue::Text(from.format(DATE_FORMAT).to_string()));
        }
        if let Some(to) = query.to {
            sql.push_str(" AND d.date <= ?");
            args.push(SqlValue::Text(to.format(DATE_FORMAT).to_string()));
        }
        sql.push_str(" ORDER BY d.date, d.location_id");
        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            args.push(SqlValue::Integer(limit as i64));
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(args), |row| {
                Ok(StoredTemperature {
                    location_id: row.get(0)?,
                    location: row.get(1)?,
                    date: row.get(2)?,
                    max_temp_c: row.get(3)?,
                    min_temp_c: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn locations(&self, conn: &Connection) -> Result<Vec<LocationSummary>> {
        let mut stmt = conn.prepare(
            "SELECT l.id, l.name, COUNT(d.id), MIN(d.date), MAX(d.date)
             FROM locations l
             LEFT JOIN daily_temperatures d ON d.location_id = l.id
             GROUP BY l.id, l.name
             ORDER BY l.id",
        )?;
        let summaries = stmt
            .query_map([], |row| {
                Ok(LocationSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    days: row.get::<_, i64>(2)? as usize,
                    first_date: row.get(3)?,
                    last_date: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    pub fn statistics(&self, conn: &Connection) -> Result<StoreStatistics> {
        let (locations, rows, first, last, missing_max, missing_min): (
            i64,
            i64,
            Option<String>,
            Option<String>,
            i64,
            i64,
        ) = conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM locations),
                COUNT(*),
                MIN(date),
                MAX(date),
                COALESCE(SUM(max_temp_c IS NULL), 0),
                COALESCE(SUM(min_temp_c IS NULL), 0)
             FROM daily_temperatures",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?)),
        )?;

        let hottest = Self::extreme(conn, "max_temp_c", "DESC")?;
        let coldest = Self::extreme(conn, "min_temp_c", "ASC")?;

        Ok(StoreStatistics {
            locations: locations as usize,
            rows: rows as usize,
            date_range: first.zip(last),
            missing_max: missing_max as usize,
            missing_min: missing_min as usize,
            hottest,
            coldest,
        })
    }

    fn extreme(
        conn: &Connection,
        column: &str,
        direction: &str,
    ) -> Result<Option<(String, String, f64)>> {
        let sql = format!(
            "SELECT l.name, d.date, d.{column}
             FROM daily_temperatures d JOIN locations l ON l.id = d.location_id
             WHERE d.{column} IS NOT NULL
             ORDER BY d.{column} {direction}, d.date, d.location_id
             LIMIT 1"
        );
        let found = conn
            .query_row(&sql, [], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
            .optional()?;
        Ok(found)
    }

    pub fn render(&self, rows: &[StoredTemperature], format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(render_table(rows)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                for row in rows {
                    writer.serialize(row)?;
                }
                let bytes = writer
                    .into_inner()
                    .map_err(|e| IngestError::Io(e.into_error()))?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}

impl Default for TemperatureViewer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pads by terminal display width; CJK location names take two columns per character
fn render_table(rows: &[StoredTemperature]) -> String {
    let name_width = rows
        .iter()
        .map(|r| r.location.width())
        .max()
        .unwrap_or(0)
        .max("Location".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}  {}  {:>8}  {:>8}",
        "Date",
        pad_to_width("Location", name_width),
        "Max(°C)",
        "Min(°C)"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<10}  {}  {:>8}  {:>8}",
            row.date,
            pad_to_width(&row.location, name_width),
            StoredTemperature::format_temp(row.max_temp_c),
            StoredTemperature::format_temp(row.min_temp_c)
        );
    }
    out.trim_end().to_string()
}

fn pad_to_width(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(pad))
}
