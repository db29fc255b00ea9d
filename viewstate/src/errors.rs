use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted while loading a fixture or writing the report.
#[derive(Debug, Error)]
pub(crate) enum DemoError {
    #[error("failed to read fixture {path}: {source}")]
    ReadFixture { path: PathBuf, source: io::Error },

    #[error("failed to parse fixture {path}: {source}")]
    ParseFixture {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("report I/O failed: {0}")]
    Io(#[from] io::Error),
}
