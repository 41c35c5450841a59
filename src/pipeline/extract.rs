//! Extraction: the pre-pass that swaps protected spans for tokens.
//!
//! Five stages run in the fixed order of [`Category::EXTRACTION_ORDER`], and
//! each stage's substitution happens *before* the next stage scans the text.
//! The ordering is a deliberate disambiguation, not a convenience: because
//! `wrapfigure` blocks are tokenised before the plain `figure` stage runs,
//! the `figure` pattern can never capture one.
//!
//! Substitution is exact-substring replacement, not pattern replacement. The
//! replaced text is byte-identical to what the pattern matched, and when the
//! same literal span occurs more than once every occurrence gets the same
//! token — identical LaTeX constructs map to identical rendered output.

use crate::config::ConversionConfig;
use crate::pipeline::render::render_span;
use crate::pipeline::spans::{Category, CategoryMap, ExtractedSpan, ParsedData};
use crate::pipeline::token::TokenAllocator;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

// Span patterns: greedy from the opening marker to the *first* matching
// closing marker, spanning newlines. Nested same-named environments are
// unsupported; an unterminated environment simply fails to match and passes
// through the converter unmodified.
static RE_REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\\ref\{.*?\}").unwrap());
static RE_CITATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\\cite\{.*?\}").unwrap());
static RE_MATH_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\begin\{equation\}.*?\\end\{equation\}").unwrap());
static RE_WRAPPED_FIGURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\begin\{wrapfigure\}.*?\\end\{wrapfigure\}").unwrap());
static RE_FIGURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\begin\{figure\}.*?\\end\{figure\}").unwrap());

fn pattern_for(category: Category) -> &'static Regex {
    match category {
        Category::Reference => &RE_REFERENCE,
        Category::Citation => &RE_CITATION,
        Category::MathBlock => &RE_MATH_BLOCK,
        Category::WrappedFigure => &RE_WRAPPED_FIGURE,
        Category::Figure => &RE_FIGURE,
    }
}

/// The extraction pass. One instance per document run; it owns the token
/// allocator, so uniqueness is scoped to exactly one run.
#[derive(Debug)]
pub struct Extractor {
    image_prefix: String,
    allocator: TokenAllocator,
}

impl Extractor {
    /// Build an extractor from the run configuration.
    pub fn new(config: &ConversionConfig) -> Self {
        let allocator = match config.token_seed {
            Some(seed) => TokenAllocator::with_seed(seed),
            None => TokenAllocator::new(),
        };
        Self {
            image_prefix: config.image_prefix.clone(),
            allocator,
        }
    }

    /// Run all five stages over `input`.
    ///
    /// Returns the token-substituted text (safe to hand to a generic
    /// converter) and the [`ParsedData`] bundle restoration needs. All five
    /// category maps are present in the bundle even when empty; zero matches
    /// is not an error.
    pub fn extract(mut self, input: &str) -> (String, ParsedData) {
        let mut text = input.to_string();
        let mut data = ParsedData::default();

        for category in Category::EXTRACTION_ORDER {
            let map = self.extract_stage(category, &mut text);
            debug!(%category, spans = map.len(), "extraction stage complete");
            data.insert_map(category, map);
        }

        debug!(
            total_spans = data.total_spans(),
            "extraction complete, text is converter-safe"
        );
        (text, data)
    }

    /// One category's find-and-substitute pass over the working text.
    fn extract_stage(&mut self, category: Category, text: &mut String) -> CategoryMap {
        // Collect matches first (dropping repeated literals), then mutate:
        // replacing inside the find loop would invalidate match offsets.
        let mut seen = HashSet::new();
        let originals: Vec<String> = pattern_for(category)
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .filter(|s| seen.insert(s.clone()))
            .collect();

        let mut map = CategoryMap::new();
        for original in originals {
            let token = self.allocator.next_token();
            let rendered = render_span(category, &original, &self.image_prefix);
            // Replaces every literal occurrence: repeats of the same exact
            // span all collapse onto this one token.
            *text = text.replace(&original, &token);
            map.insert(token, ExtractedSpan { original, rendered });
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        let config = ConversionConfig::builder()
            .image_prefix("imgs/")
            .token_seed(1)
            .build()
            .unwrap();
        Extractor::new(&config)
    }

    #[test]
    fn reference_is_tokenised_and_recorded() {
        let input = r"see Section~\ref{sec:intro} for details";
        let (text, data) = extractor().extract(input);

        let refs = data.category(Category::Reference).unwrap();
        assert_eq!(refs.len(), 1);
        let (token, span) = refs.iter().next().unwrap();
        assert_eq!(span.original, r"\ref{sec:intro}");
        assert_eq!(span.rendered, r"\ref{sec:intro}");
        assert!(text.contains(token));
        assert!(!text.contains(r"\ref"));
    }

    #[test]
    fn all_five_maps_exist_even_for_empty_input() {
        let (text, data) = extractor().extract("plain prose, nothing to protect");
        assert_eq!(text, "plain prose, nothing to protect");
        for category in Category::EXTRACTION_ORDER {
            assert_eq!(data.category(category).unwrap().len(), 0);
        }
    }

    #[test]
    fn equation_environment_spans_newlines() {
        let input = "before\n\\begin{equation}\nE = mc^2\n\\end{equation}\nafter";
        let (text, data) = extractor().extract(input);
        let math = data.category(Category::MathBlock).unwrap();
        assert_eq!(math.len(), 1);
        let span = math.values().next().unwrap();
        assert_eq!(span.original, "\\begin{equation}\nE = mc^2\n\\end{equation}");
        assert!(text.starts_with("before\n"));
        assert!(text.ends_with("\nafter"));
        assert!(!text.contains("equation"));
    }

    #[test]
    fn lazy_match_stops_at_first_end_marker() {
        // Two equations back to back must become two spans, not one.
        let input = "\\begin{equation}a\\end{equation}\\begin{equation}b\\end{equation}";
        let (_, data) = extractor().extract(input);
        assert_eq!(data.count(Category::MathBlock), 2);
    }

    #[test]
    fn unterminated_environment_passes_through() {
        let input = "\\begin{equation} x = y, never closed";
        let (text, data) = extractor().extract(input);
        assert_eq!(text, input);
        assert_eq!(data.total_spans(), 0);
    }

    #[test]
    fn wrapfigure_never_reaches_the_figure_stage() {
        let input = "\\begin{wrapfigure}{r}{0.5\\textwidth}\n\\includegraphics{w.png}\n\\caption{Wrapped}\n\\end{wrapfigure}";
        let (_, data) = extractor().extract(input);
        assert_eq!(data.count(Category::WrappedFigure), 1);
        assert_eq!(data.count(Category::Figure), 0);
    }

    #[test]
    fn identical_literals_collapse_onto_one_token() {
        let input = r"first \cite{foo} and second \cite{foo}";
        let (text, data) = extractor().extract(input);

        let cites = data.category(Category::Citation).unwrap();
        assert_eq!(cites.len(), 1, "identical literals must share one entry");
        let token = cites.keys().next().unwrap();
        assert_eq!(text.matches(token.as_str()).count(), 2);
        assert!(!text.contains(r"\cite"));
    }

    #[test]
    fn distinct_literals_get_distinct_tokens() {
        let input = r"\cite{foo} \cite{bar} \ref{a} \ref{b}";
        let (_, data) = extractor().extract(input);
        assert_eq!(data.count(Category::Citation), 2);
        assert_eq!(data.count(Category::Reference), 2);

        let tokens: HashSet<&str> = data.tokens().collect();
        assert_eq!(tokens.len(), 4, "tokens must be unique across categories");
    }

    #[test]
    fn original_content_is_byte_identical() {
        let input = "x \\begin{figure}%\n  \\includegraphics{p.png}\t\\caption{ spaced }\n\\end{figure} y";
        let (_, data) = extractor().extract(input);
        let span = data
            .category(Category::Figure)
            .unwrap()
            .values()
            .next()
            .unwrap();
        assert_eq!(
            span.original,
            "\\begin{figure}%\n  \\includegraphics{p.png}\t\\caption{ spaced }\n\\end{figure}"
        );
    }

    #[test]
    fn figure_rendering_uses_the_configured_prefix() {
        let input = "\\begin{figure}\\includegraphics{plot.png}\\caption{A plot}\\end{figure}";
        let (_, data) = extractor().extract(input);
        let span = data
            .category(Category::Figure)
            .unwrap()
            .values()
            .next()
            .unwrap();
        assert_eq!(span.rendered, "![A plot](imgs/plot.png)");
    }
}
