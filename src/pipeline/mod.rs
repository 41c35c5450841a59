//! Pipeline stages for protected LaTeX-to-Markdown conversion.
//!
//! Each submodule implements exactly one step. Keeping stages separate makes
//! each independently testable and lets us swap the converter (pandoc vs. an
//! identity function in tests) without touching extraction or restoration.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ pandoc ──▶ restore
//! (spans→tokens)  (external)  (tokens→rendered)
//! ```
//!
//! 1. [`extract`] — five find-and-substitute stages over the raw text; emits
//!    the token-substituted intermediate plus the [`spans::ParsedData`] bundle
//! 2. [`pandoc`]  — stage the intermediate in a temp file and run the external
//!    converter; the only stage with process I/O
//! 3. [`restore`] — replace every token with its record's rendered content
//!
//! [`token`] supplies the per-run unique-token allocator, [`spans`] the data
//! model threaded between the passes, and [`render`] the per-category
//! `original → rendered` rules.

pub mod extract;
pub mod pandoc;
pub mod render;
pub mod restore;
pub mod spans;
pub mod token;
