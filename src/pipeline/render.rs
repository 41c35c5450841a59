//! Category rendering rules: the `original → rendered` transformation.
//!
//! Three categories are passthrough — a reference, citation, or equation
//! block is *protected* from the converter, not translated, so its original
//! LaTeX reappears verbatim in the final output. Figures are the exception:
//! the block is reduced to a Markdown image-with-caption expression built
//! from the `\includegraphics` filename and the `\caption` text.

use crate::pipeline::spans::Category;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static RE_INCLUDEGRAPHICS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\includegraphics(?:\[[^\]]*\])?\{([^}]*)\}").unwrap());

// Lazy up to the first closing brace — nested braces inside captions are
// unsupported, matching the non-nested semantics of the span patterns.
static RE_CAPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\\caption\{(.*?)\}").unwrap());

/// Render one extracted span into its final-form text.
pub(crate) fn render_span(category: Category, original: &str, image_prefix: &str) -> String {
    match category {
        Category::Reference | Category::Citation | Category::MathBlock => original.to_string(),
        Category::Figure | Category::WrappedFigure => {
            render_figure(category, original, image_prefix)
        }
    }
}

/// Reduce a figure/wrapfigure block to `![Caption](prefix + filename)`.
///
/// A block without a caption renders an empty alt text; a block without an
/// image directive renders an empty filename (only the prefix appears in the
/// URL). Both anomalies are logged so the run stays total without hiding the
/// problem.
fn render_figure(category: Category, block: &str, image_prefix: &str) -> String {
    let filename = match RE_INCLUDEGRAPHICS.captures(block) {
        Some(caps) => caps[1].trim().to_string(),
        None => {
            warn!(%category, "no \\includegraphics in block, rendering empty filename");
            String::new()
        }
    };

    let caption = match RE_CAPTION.captures(block) {
        Some(caps) => caps[1].trim().to_string(),
        None => {
            warn!(%category, "no \\caption in block, rendering empty caption");
            String::new()
        }
    };

    format!("![{caption}]({image_prefix}{filename})")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIGURE: &str = "\\begin{figure}\n\\centering\n\\includegraphics{plot.png}\n\\caption{A plot}\n\\label{fig:plot}\n\\end{figure}";

    #[test]
    fn passthrough_categories_are_identity() {
        for cat in [Category::Reference, Category::Citation, Category::MathBlock] {
            let original = r"\begin{equation} x^2 \end{equation}";
            assert_eq!(render_span(cat, original, "imgs/"), original);
        }
    }

    #[test]
    fn figure_renders_markdown_image_with_caption() {
        assert_eq!(
            render_span(Category::Figure, FIGURE, "imgs/"),
            "![A plot](imgs/plot.png)"
        );
    }

    #[test]
    fn prefix_is_concatenated_verbatim() {
        // No separator normalisation: a missing slash is the caller's bug.
        assert_eq!(
            render_span(Category::Figure, FIGURE, "imgs"),
            "![A plot](imgsplot.png)"
        );
        assert_eq!(
            render_span(Category::Figure, FIGURE, ""),
            "![A plot](plot.png)"
        );
    }

    #[test]
    fn includegraphics_optional_argument_is_tolerated() {
        let block = "\\begin{wrapfigure}{r}{0.4\\textwidth}\n\\includegraphics[width=0.38\\textwidth]{orbit.pdf}\n\\caption{Orbital decay}\n\\end{wrapfigure}";
        assert_eq!(
            render_span(Category::WrappedFigure, block, "media/"),
            "![Orbital decay](media/orbit.pdf)"
        );
    }

    #[test]
    fn missing_caption_falls_back_to_empty_alt() {
        let block = "\\begin{figure}\\includegraphics{only.png}\\end{figure}";
        assert_eq!(render_span(Category::Figure, block, ""), "![](only.png)");
    }

    #[test]
    fn missing_image_falls_back_to_empty_filename() {
        let block = "\\begin{figure}\\caption{Orphan caption}\\end{figure}";
        assert_eq!(
            render_span(Category::Figure, block, "imgs/"),
            "![Orphan caption](imgs/)"
        );
    }

    #[test]
    fn caption_stops_at_first_closing_brace() {
        let block = "\\begin{figure}\\includegraphics{a.png}\\caption{short}rest\\end{figure}";
        assert_eq!(render_span(Category::Figure, block, ""), "![short](a.png)");
    }

    #[test]
    fn multiline_caption_is_captured() {
        let block =
            "\\begin{figure}\\includegraphics{a.png}\\caption{two\nlines}\\end{figure}";
        assert_eq!(
            render_span(Category::Figure, block, ""),
            "![two\nlines](a.png)"
        );
    }
}
