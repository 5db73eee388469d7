use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("JSON file not found. Tried: {}", join_paths(.tried))]
    FileNotFound { tried: Vec<PathBuf> },

    #[error("Unexpected JSON structure: missing '{key}' at {path}")]
    MalformedInput { key: String, path: String },

    #[error("Could not convert temperature '{value}' to a number")]
    Conversion { value: String },

    #[error("Series length mismatch for {location}: MaxT has {max} entries, MinT has {min}")]
    SeriesLengthMismatch {
        location: String,
        max: usize,
        min: usize,
    },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database {} holds no temperature data; run `import` first", .0.display())]
    EmptyStore(PathBuf),
}

impl IngestError {
    pub fn malformed(key: &str, path: &str) -> Self {
        IngestError::MalformedInput {
            key: key.to_string(),
            path: path.to_string(),
        }
    }
}

impl From<config::ConfigError> for IngestError {
    fn from(err: config::ConfigError) -> Self {
        IngestError::Config(err.to_string())
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
