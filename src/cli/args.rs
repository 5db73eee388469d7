use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::analyzers::OutputFormat;

#[derive(Parser)]
#[command(name = "cwa-temps")]
#[command(about = "Store CWA F-A0010-001 daily temperatures in SQLite and browse them")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Configuration file [default: cwa-temps.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse the forecast JSON and upsert temperatures into SQLite
    Import {
        #[arg(long, help = "Path to F-A0010-001.json [default: F-A0010-001.json]")]
        json: Option<PathBuf>,

        #[arg(long, help = "Output SQLite path [default: data.db]")]
        db: Option<PathBuf>,

        #[arg(long, help = "Fail when MaxT and MinT series differ in length")]
        strict_series: bool,
    },

    /// Show stored daily temperatures ordered by date and location
    Show {
        #[arg(long, help = "SQLite path [default: data.db]")]
        db: Option<PathBuf>,

        #[arg(short, long = "location", help = "Only these locations (repeatable)")]
        locations: Vec<String>,

        #[arg(long, help = "First date to include (YYYY-MM-DD)")]
        from: Option<NaiveDate>,

        #[arg(long, help = "Last date to include (YYYY-MM-DD)")]
        to: Option<NaiveDate>,

        #[arg(short = 'n', long)]
        limit: Option<usize>,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        #[arg(long, help = "Re-import the JSON before showing")]
        reimport: bool,

        #[arg(long, requires = "reimport", help = "JSON path used with --reimport")]
        json: Option<PathBuf>,
    },

    /// List stored locations with their row counts and date ranges
    Locations {
        #[arg(long, help = "SQLite path [default: data.db]")]
        db: Option<PathBuf>,
    },

    /// Display summary statistics for a database
    Info {
        #[arg(long, help = "SQLite path [default: data.db]")]
        db: Option<PathBuf>,
    },
}
