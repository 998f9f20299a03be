//! Fatal error taxonomy for a submission run.
//!
//! Parse errors are deliberately absent: they are recovered per file (the
//! file's contribution falls back to its original text) and never abort the
//! run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepresenterError {
    /// `.meta/config.json` is not valid JSON.
    #[error(".meta/config.json: invalid JSON: {0}")]
    ConfigSyntax(#[from] serde_json::Error),

    /// `files.solution` is missing or has the wrong shape.
    #[error(".meta/config.json: missing or invalid `files.solution` key")]
    InvalidSolutionList,

    #[error("unable to read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
