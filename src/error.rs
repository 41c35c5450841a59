//! Error types for the ltmd library.
//!
//! The taxonomy is deliberately small. Most of what could go wrong during a
//! run is *not* an error by design:
//!
//! * A token collision is resolved internally by re-drawing — callers never
//!   see it.
//! * A category with zero matches yields an empty map, not a failure.
//! * Malformed LaTeX (an opening marker with no closing marker) simply fails
//!   to match and passes through the converter untouched. Partial extraction
//!   is the designed degradation, not a fault.
//!
//! What remains is integration errors (a [`crate::ParsedData`] bundle that
//! does not match its extraction run) and converter/IO failures at the
//! process boundary.

use crate::pipeline::spans::Category;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the ltmd library.
#[derive(Debug, Error)]
pub enum LtmdError {
    // ── Pairing errors ────────────────────────────────────────────────────
    /// The ParsedData bundle handed to restoration lacks one of the five
    /// category maps. Extraction always produces all five (empty or not), so
    /// this means the bundle was not the one the extraction run returned.
    #[error("ParsedData is missing the {category} map\nPass the bundle returned by the matching extraction run, unmodified.")]
    MissingCategory { category: Category },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read the input LaTeX file.
    #[error("Failed to read input file '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not stage the token-substituted text in a temporary file for
    /// the converter.
    #[error("Failed to write intermediate file for the converter: {0}")]
    IntermediateWriteFailed(#[source] std::io::Error),

    // ── Converter errors ──────────────────────────────────────────────────
    /// The converter binary could not be spawned at all.
    #[error("Failed to launch converter '{program}': {source}\nCheck that it is installed and on PATH (or set --pandoc).")]
    ConverterLaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter ran but exited non-zero.
    #[error("Converter '{program}' failed (exit code {code:?}):\n{stderr}")]
    ConverterFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The converter produced bytes that are not valid UTF-8.
    #[error("Converter '{program}' produced non-UTF-8 output")]
    ConverterOutputNotUtf8 { program: String },
}
