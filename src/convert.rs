//! Conversion entry points: extract → external converter → restore.
//!
//! [`convert`] is the batteries-included path (pandoc as the converter).
//! [`convert_with`] takes any `text → text` converter instead, which is how
//! tests run the pipeline with the identity function and how callers plug in
//! a converter this crate has never heard of. Either way, the [`ParsedData`]
//! bundle produced by extraction is threaded unchanged into restoration — it
//! is the sole channel between the two passes.

use crate::config::ConversionConfig;
use crate::error::LtmdError;
use crate::pipeline::extract::Extractor;
use crate::pipeline::restore::restore;
use crate::pipeline::spans::Category;
use crate::pipeline::{pandoc, spans::ParsedData};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// The result of a full conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// Final text: converted document with every token restored.
    pub markdown: String,
    /// Per-category span counts and phase timings.
    pub stats: ConversionStats,
}

/// Statistics for one conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionStats {
    pub references: usize,
    pub citations: usize,
    pub math_blocks: usize,
    pub wrapped_figures: usize,
    pub figures: usize,
    pub total_spans: usize,
    pub extract_duration_ms: u64,
    pub convert_duration_ms: u64,
    pub restore_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Convert LaTeX source to Markdown, protecting spans through pandoc.
///
/// # Arguments
/// * `input`  — the full LaTeX document source
/// * `config` — run configuration (image prefix, pandoc binary, format)
///
/// # Errors
/// Converter launch/exit failures and non-UTF-8 converter output. Extraction
/// itself never fails: malformed LaTeX passes through unprotected.
pub fn convert(input: &str, config: &ConversionConfig) -> Result<ConversionOutput, LtmdError> {
    convert_with(input, config, |intermediate| {
        pandoc::run_converter(intermediate, config)
    })
}

/// Convert LaTeX source using a caller-supplied converter.
///
/// The converter sees only token-substituted text and must return converted
/// text. It is assumed to preserve 10-digit tokens verbatim and to introduce
/// none of its own; a converter that destroys a token simply leaves that span
/// unrestored (a silent no-op, per the restoration contract).
pub fn convert_with<F>(
    input: &str,
    config: &ConversionConfig,
    converter: F,
) -> Result<ConversionOutput, LtmdError>
where
    F: FnOnce(&str) -> Result<String, LtmdError>,
{
    let total_start = Instant::now();
    info!(bytes = input.len(), "starting conversion");

    // ── Step 1: Extract protected spans ──────────────────────────────────
    let extract_start = Instant::now();
    let (intermediate, data) = Extractor::new(config).extract(input);
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    debug!(
        spans = data.total_spans(),
        ms = extract_duration_ms,
        "extraction done"
    );

    // ── Step 2: External converter ───────────────────────────────────────
    let convert_start = Instant::now();
    let converted = converter(&intermediate)?;
    let convert_duration_ms = convert_start.elapsed().as_millis() as u64;
    debug!(ms = convert_duration_ms, "external conversion done");

    // ── Step 3: Restore rendered spans ───────────────────────────────────
    let restore_start = Instant::now();
    let markdown = restore(&converted, &data)?;
    let restore_duration_ms = restore_start.elapsed().as_millis() as u64;

    let stats = build_stats(
        &data,
        extract_duration_ms,
        convert_duration_ms,
        restore_duration_ms,
        total_start.elapsed().as_millis() as u64,
    );
    info!(
        spans = stats.total_spans,
        ms = stats.total_duration_ms,
        "conversion complete"
    );

    Ok(ConversionOutput { markdown, stats })
}

/// Convert a LaTeX file and write the Markdown output to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, LtmdError> {
    let input_path = input_path.as_ref();
    let input =
        std::fs::read_to_string(input_path).map_err(|source| LtmdError::InputReadFailed {
            path: input_path.to_path_buf(),
            source,
        })?;

    let output = convert(&input, config)?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| LtmdError::OutputWriteFailed {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    let tmp_path = path.with_extension("md.tmp");
    std::fs::write(&tmp_path, &output.markdown).map_err(|source| {
        LtmdError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    std::fs::rename(&tmp_path, path).map_err(|source| LtmdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(output.stats)
}

fn build_stats(
    data: &ParsedData,
    extract_duration_ms: u64,
    convert_duration_ms: u64,
    restore_duration_ms: u64,
    total_duration_ms: u64,
) -> ConversionStats {
    ConversionStats {
        references: data.count(Category::Reference),
        citations: data.count(Category::Citation),
        math_blocks: data.count(Category::MathBlock),
        wrapped_figures: data.count(Category::WrappedFigure),
        figures: data.count(Category::Figure),
        total_spans: data.total_spans(),
        extract_duration_ms,
        convert_duration_ms,
        restore_duration_ms,
        total_duration_ms,
    }
}
