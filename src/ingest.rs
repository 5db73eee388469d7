use crate::error::Result;
use crate::readers::{ForecastReader, SourceResolver};
use crate::utils::progress::ProgressReporter;
use crate::writers::{LoadSummary, SqliteWriter};
use std::path::PathBuf;
use tracing::info;

/// Everything one ingestion run needs. Defaults are supplied by the caller.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub json_path: PathBuf,
    pub db_path: PathBuf,
    /// Directory searched last for the input file; the executable's directory when `None`
    pub program_dir: Option<PathBuf>,
    pub strict_series: bool,
}

impl IngestOptions {
    pub fn new(json_path: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            json_path: json_path.into(),
            db_path: db_path.into(),
            program_dir: None,
            strict_series: false,
        }
    }

    pub fn with_program_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.program_dir = Some(dir.into());
        self
    }

    pub fn with_strict_series(mut self, strict: bool) -> Self {
        self.strict_series = strict;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub source: PathBuf,
    pub db_path: PathBuf,
    pub load: LoadSummary,
}

impl IngestSummary {
    pub fn summary(&self) -> String {
        format!(
            "Wrote {} locations to {}",
            self.load.locations,
            self.db_path.display()
        )
    }
}

/// Resolve, extract and load one document. The whole document is extracted
/// before the database is touched, so malformed input never writes anything.
pub fn ingest(options: &IngestOptions, progress: Option<&ProgressReporter>) -> Result<IngestSummary> {
    let resolver = match &options.program_dir {
        Some(dir) => SourceResolver::with_program_dir(dir),
        None => SourceResolver::new(),
    };
    let source = resolver.resolve(&options.json_path)?;
    info!(source = %source.display(), "Reading forecast document");

    let forecasts = ForecastReader::with_strict_series(options.strict_series).read(&source)?;

    let writer = SqliteWriter::new();
    let mut conn = writer.open(&options.db_path)?;
    let load = writer.write_forecasts(&mut conn, &forecasts, progress)?;

    Ok(IngestSummary {
        source,
        db_path: options.db_path.clone(),
        load,
    })
}
