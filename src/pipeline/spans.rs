//! The data model handed from extraction to restoration.
//!
//! Five span categories exist, modelled as a closed enum so that "process all
//! five categories" is exhaustiveness-checked at compile time rather than
//! being a dictionary-key convention. [`ParsedData`] bundles one token→span
//! map per category and is the *only* channel between the two passes: it is
//! built once during extraction, treated as an immutable snapshot, and
//! discarded after the matching restoration.

use crate::error::LtmdError;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// The five protected span categories.
///
/// `WrappedFigure` sits before `Figure` in the extraction order on purpose:
/// a `wrapfigure` block is replaced by its token before the plain-figure
/// stage ever scans the text, so the `figure` pattern can never capture it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Reference,
    Citation,
    MathBlock,
    WrappedFigure,
    Figure,
}

impl Category {
    /// Fixed stage order of the extraction pass. Restoration walks this in
    /// reverse.
    pub const EXTRACTION_ORDER: [Category; 5] = [
        Category::Reference,
        Category::Citation,
        Category::MathBlock,
        Category::WrappedFigure,
        Category::Figure,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Reference => "reference",
            Category::Citation => "citation",
            Category::MathBlock => "math block",
            Category::WrappedFigure => "wrapped figure",
            Category::Figure => "figure",
        };
        f.write_str(name)
    }
}

/// One protected span.
///
/// `original` is byte-identical to the substring matched in the working text
/// at extraction time — it doubles as the search key for the extraction-time
/// substitution. `rendered` is the category-specific final form computed once
/// at construction; restoration substitutes it for the token verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedSpan {
    pub original: String,
    pub rendered: String,
}

/// Token → span map for a single category. Keys are unique by construction
/// (the allocator never reissues a token); insertion order is irrelevant.
pub type CategoryMap = HashMap<String, ExtractedSpan>;

/// The complete, order-independent state handed from extraction to
/// restoration: one [`CategoryMap`] per [`Category`].
///
/// An extraction run always populates all five maps, empty or not. A bundle
/// missing a category therefore did not come from a matching extraction run,
/// and looking it up fails with [`LtmdError::MissingCategory`] instead of
/// silently restoring a partial document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedData {
    maps: HashMap<Category, CategoryMap>,
}

impl ParsedData {
    /// Install the map for one category, replacing any previous one.
    pub fn insert_map(&mut self, category: Category, map: CategoryMap) {
        self.maps.insert(category, map);
    }

    /// Look up one category's map; fails if the bundle never contained it.
    pub fn category(&self, category: Category) -> Result<&CategoryMap, LtmdError> {
        self.maps
            .get(&category)
            .ok_or(LtmdError::MissingCategory { category })
    }

    /// Number of spans recorded for one category (0 if the map is absent).
    pub fn count(&self, category: Category) -> usize {
        self.maps.get(&category).map_or(0, HashMap::len)
    }

    /// Total spans across all categories.
    pub fn total_spans(&self) -> usize {
        self.maps.values().map(HashMap::len).sum()
    }

    /// Iterate over every token assigned in this run, across categories.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.maps.values().flat_map(|m| m.keys()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(original: &str) -> ExtractedSpan {
        ExtractedSpan {
            original: original.to_string(),
            rendered: original.to_string(),
        }
    }

    #[test]
    fn extraction_order_is_wrapfigure_before_figure() {
        let order = Category::EXTRACTION_ORDER;
        let wrap = order
            .iter()
            .position(|c| *c == Category::WrappedFigure)
            .unwrap();
        let fig = order.iter().position(|c| *c == Category::Figure).unwrap();
        assert!(wrap < fig);
    }

    #[test]
    fn missing_category_is_a_defined_error() {
        let data = ParsedData::default();
        let err = data.category(Category::Citation).unwrap_err();
        assert!(matches!(
            err,
            LtmdError::MissingCategory {
                category: Category::Citation
            }
        ));
    }

    #[test]
    fn counts_and_totals() {
        let mut data = ParsedData::default();
        let mut refs = CategoryMap::new();
        refs.insert("0000000001".into(), span(r"\ref{a}"));
        refs.insert("0000000002".into(), span(r"\ref{b}"));
        data.insert_map(Category::Reference, refs);
        data.insert_map(Category::Citation, CategoryMap::new());

        assert_eq!(data.count(Category::Reference), 2);
        assert_eq!(data.count(Category::Citation), 0);
        assert_eq!(data.count(Category::Figure), 0); // absent map
        assert_eq!(data.total_spans(), 2);
        assert_eq!(data.tokens().count(), 2);
    }

    #[test]
    fn serialises_with_snake_case_category_keys() {
        let mut data = ParsedData::default();
        data.insert_map(Category::MathBlock, CategoryMap::new());
        let json = serde_json::to_string(&data).expect("ParsedData must serialise");
        assert!(json.contains("math_block"), "got: {json}");
    }
}
