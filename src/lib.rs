//! # ltmd
//!
//! Convert LaTeX documents to Markdown without letting a generic converter
//! mangle the constructs it is bad at.
//!
//! ## Why this crate?
//!
//! Generic converters like pandoc do a fine job on prose but routinely chew
//! up cross-references, citations, display equations, and figure
//! environments — exactly the parts of a paper you care about. Instead of
//! teaching the converter about them, this crate lifts those spans out of the
//! text before conversion, replaces each with an opaque 10-digit token the
//! converter cannot damage, and substitutes the rendered form back in
//! afterwards.
//!
//! ## Pipeline Overview
//!
//! ```text
//! LaTeX
//!  │
//!  ├─ 1. Extract  five find-and-substitute stages (ref, cite, equation,
//!  │              wrapfigure, figure) — spans become unique tokens
//!  ├─ 2. Convert  the token-safe intermediate runs through pandoc
//!  │              (or any caller-supplied text → text function)
//!  └─ 3. Restore  every token becomes its rendered content
//! ```
//!
//! References, citations, and equations are restored verbatim (protected, not
//! translated). Figure and wrapfigure blocks are reduced to
//! `![Caption](prefix + filename)`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ltmd::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tex = std::fs::read_to_string("paper.tex")?;
//!     let config = ConversionConfig::builder()
//!         .image_prefix("imgs/")
//!         .build()?;
//!     let output = convert(&tex, &config)?;
//!     println!("{}", output.markdown);
//!     eprintln!("protected {} spans", output.stats.total_spans);
//!     Ok(())
//! }
//! ```
//!
//! No pandoc on the machine? Supply your own converter:
//!
//! ```rust
//! use ltmd::{convert_with, ConversionConfig};
//!
//! let config = ConversionConfig::default();
//! let output = convert_with(r"see \ref{sec:intro}", &config, |text| {
//!     Ok(text.to_string()) // identity "converter"
//! }).unwrap();
//! assert_eq!(output.markdown, r"see \ref{sec:intro}");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ltmd` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! ltmd = { version = "0.5", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_to_file, convert_with, ConversionOutput, ConversionStats};
pub use error::LtmdError;
pub use pipeline::extract::Extractor;
pub use pipeline::restore::restore;
pub use pipeline::spans::{Category, CategoryMap, ExtractedSpan, ParsedData};
pub use pipeline::token::TokenAllocator;
