//! Restoration: the post-pass that swaps tokens back for rendered spans.
//!
//! Categories are processed in the reverse of the extraction order. Token
//! sets are category-disjoint and substitution is exact-match, so any order
//! would produce the same text — reverse order is kept as the contract to
//! stay symmetric with extraction and easy to audit.
//!
//! A token that no longer occurs in the converted text is silently a no-op:
//! the external converter may have destroyed it, and that is outside this
//! crate's control. The inverse is the integration error worth failing on —
//! a [`ParsedData`] bundle missing a whole category map.

use crate::error::LtmdError;
use crate::pipeline::spans::{Category, ParsedData};
use tracing::debug;

/// Replace every token in `converted` with its record's rendered content.
///
/// Idempotent: running it again over its own output changes nothing, because
/// no token remains to replace.
pub fn restore(converted: &str, data: &ParsedData) -> Result<String, LtmdError> {
    let mut text = converted.to_string();

    for category in Category::EXTRACTION_ORDER.into_iter().rev() {
        let map = data.category(category)?;
        for (token, span) in map {
            text = text.replace(token.as_str(), &span.rendered);
        }
        debug!(%category, spans = map.len(), "restoration stage complete");
    }

    Ok(text)
}
