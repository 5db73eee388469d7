use crate::analyzers::{TemperatureQuery, TemperatureViewer};
use crate::cli::args::{Cli, Commands};
use crate::cli::logging::init_logging;
use crate::error::Result;
use crate::ingest::{ingest, IngestSummary};
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use std::io::IsTerminal;
use tracing::info;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    let settings = Settings::load(cli.config.as_deref())?;
    info!(?settings, "Loaded configuration");

    match cli.command {
        Commands::Import {
            json,
            db,
            strict_series,
        } => {
            let settings = settings
                .with_json_path(json)
                .with_db_path(db)
                .with_strict_series(strict_series);

            let summary = run_import(&settings)?;
            println!("{}", summary.summary());
        }

        Commands::Show {
            db,
            locations,
            from,
            to,
            limit,
            format,
            reimport,
            json,
        } => {
            let settings = settings.with_json_path(json).with_db_path(db);

            if reimport {
                let summary = run_import(&settings)?;
                eprintln!("{}", summary.summary());
            }

            let viewer = TemperatureViewer::new();
            let conn = viewer.open(&settings.db_path)?;
            let query = TemperatureQuery {
                locations,
                from,
                to,
                limit,
            };
            let rows = viewer.fetch(&conn, &query)?;

            if rows.is_empty() {
                eprintln!("No records match the given filters");
                return Ok(());
            }
            println!("{}", viewer.render(&rows, format)?);
        }

        Commands::Locations { db } => {
            let settings = settings.with_db_path(db);
            let viewer = TemperatureViewer::new();
            let conn = viewer.open(&settings.db_path)?;

            for (i, location) in viewer.locations(&conn)?.iter().enumerate() {
                println!(
                    "{}. {} ({} days, {} to {})",
                    i + 1,
                    location.name,
                    location.days,
                    location.first_date.as_deref().unwrap_or("-"),
                    location.last_date.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Info { db } => {
            let settings = settings.with_db_path(db);
            println!("Analyzing database: {}", settings.db_path.display());

            let viewer = TemperatureViewer::new();
            let conn = viewer.open(&settings.db_path)?;
            let stats = viewer.statistics(&conn)?;
            println!("\n{}", stats.summary());
        }
    }

    Ok(())
}

fn run_import(settings: &Settings) -> Result<IngestSummary> {
    let silent = !std::io::stderr().is_terminal();
    let progress = ProgressReporter::new_spinner("Importing forecast...", silent);

    let summary = ingest(&settings.ingest_options(), Some(&progress))?;
    progress.finish_and_clear();

    info!(
        source = %summary.source.display(),
        rows = summary.load.rows,
        "Import complete"
    );
    Ok(summary)
}
