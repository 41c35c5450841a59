//! Configuration types for LaTeX-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across runs, log them, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! Callers usually care about one or two fields (the image prefix, maybe the
//! pandoc path). The builder lets them set only those and rely on documented
//! defaults for the rest.

use crate::error::LtmdError;

/// Configuration for a LaTeX-to-Markdown conversion run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use ltmd::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .image_prefix("imgs/")
///     .pandoc_program("pandoc")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// String concatenated directly before every image filename extracted
    /// from a figure or wrapfigure block. Default: empty.
    ///
    /// Concatenation is verbatim — no separator is inserted or removed, so a
    /// prefix of `"imgs"` yields `imgsplot.png` while `"imgs/"` yields
    /// `imgs/plot.png`. Trailing-slash correctness is the caller's job.
    pub image_prefix: String,

    /// Converter binary to invoke. Default: `"pandoc"`.
    ///
    /// Resolved through PATH like any other command; an absolute path works
    /// too. The binary must read LaTeX from a file argument and write the
    /// target format to stdout, which pandoc does out of the box.
    pub pandoc_program: String,

    /// Target format passed to the converter as `--to`. Default: `"markdown"`.
    ///
    /// Any pandoc writer name is accepted (`gfm`, `markdown_strict`, `rst`).
    /// The restored spans are Markdown expressions either way, so writers far
    /// from Markdown will carry Markdown image syntax verbatim.
    pub output_format: String,

    /// Extra arguments appended to the converter invocation, after
    /// `--from latex --to <output_format>`. Default: empty.
    pub pandoc_args: Vec<String>,

    /// Seed for the token allocator. Default: None (entropy-seeded).
    ///
    /// Tokens only need to be unique within a run, so the seed never affects
    /// output correctness. Setting it makes the intermediate text and the
    /// token values reproducible, which matters for golden tests and for
    /// diffing two runs.
    pub token_seed: Option<u64>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            image_prefix: String::new(),
            pandoc_program: "pandoc".to_string(),
            output_format: "markdown".to_string(),
            pandoc_args: Vec::new(),
            token_seed: None,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.image_prefix = prefix.into();
        self
    }

    pub fn pandoc_program(mut self, program: impl Into<String>) -> Self {
        self.config.pandoc_program = program.into();
        self
    }

    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.config.output_format = format.into();
        self
    }

    /// Append one extra converter argument. May be called repeatedly.
    pub fn pandoc_arg(mut self, arg: impl Into<String>) -> Self {
        self.config.pandoc_args.push(arg.into());
        self
    }

    /// Replace the full extra-argument list.
    pub fn pandoc_args(mut self, args: Vec<String>) -> Self {
        self.config.pandoc_args = args;
        self
    }

    pub fn token_seed(mut self, seed: u64) -> Self {
        self.config.token_seed = Some(seed);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, LtmdError> {
        let c = &self.config;
        if c.pandoc_program.trim().is_empty() {
            return Err(LtmdError::InvalidConfig(
                "Converter program must not be empty".into(),
            ));
        }
        if c.output_format.trim().is_empty() {
            return Err(LtmdError::InvalidConfig(
                "Output format must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
