use crate::error::{IngestError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Locates the input JSON when the binary may be started from any working directory
pub struct SourceResolver {
    program_dir: Option<PathBuf>,
}

impl SourceResolver {
    pub fn new() -> Self {
        let program_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self { program_dir }
    }

    pub fn with_program_dir(program_dir: impl Into<PathBuf>) -> Self {
        Self {
            program_dir: Some(program_dir.into()),
        }
    }

    /// Candidate locations in the order they are tried:
    /// the path as given, relative to the working directory, then the
    /// file name next to the program itself.
    pub fn candidates(&self, path: &Path) -> Vec<PathBuf> {
        let mut candidates = vec![path.to_path_buf()];

        if let Ok(cwd) = std::env::current_dir() {
            candidates.push(cwd.join(path));
        }

        if let (Some(dir), Some(name)) = (&self.program_dir, path.file_name()) {
            candidates.push(dir.join(name));
        }

        candidates
    }

    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let candidates = self.candidates(path);

        for candidate in &candidates {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "Resolved input file");
                return Ok(candidate.clone());
            }
        }

        Err(IngestError::FileNotFound { tried: candidates })
    }
}

impl Default for SourceResolver {
    fn default() -> Self {
        Self::new()
    }
}
