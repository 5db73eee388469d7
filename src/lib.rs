pub mod analyzers;
pub mod cli;
pub mod error;
pub mod ingest;
pub mod models;
pub mod readers;
pub mod settings;
pub mod utils;
pub mod writers;

pub use error::{IngestError, Result};
pub use ingest::{ingest, IngestOptions, IngestSummary};
