//! Shared error type for track loading and binning.

use std::io;
use thiserror::Error;

/// Errors surfaced by loaders, selectors, and binners.
#[derive(Error, Debug)]
pub enum TrackError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid region '{0}': expected 'contig' or 'contig:start-end'")]
    InvalidRegion(String),

    #[error("Unknown {kind} selector: '{value}'")]
    InvalidSelector { kind: &'static str, value: String },

    #[error("Missing required column: '{0}'")]
    MissingColumn(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, TrackError>;
