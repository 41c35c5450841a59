//! CLI binary for ltmd.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use ltmd::{convert, convert_to_file, ConversionConfig};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (stdout)
  ltmd paper.tex

  # Convert to file
  ltmd paper.tex -o paper.md

  # Figures live next to the output under imgs/
  ltmd --image-prefix imgs/ paper.tex -o paper.md

  # GitHub-flavoured Markdown, custom pandoc binary
  ltmd --to gfm --pandoc /opt/pandoc/bin/pandoc paper.tex

  # Extra pandoc arguments (repeatable)
  ltmd --pandoc-arg --wrap=none --pandoc-arg --columns=100 paper.tex

  # Read from stdin, JSON output with stats
  cat paper.tex | ltmd - --json > paper.json

WHAT GETS PROTECTED:
  \ref{...}                       restored verbatim
  \cite{...}                      restored verbatim
  \begin{equation}...\end{equation}   restored verbatim
  \begin{figure}...\end{figure}       becomes ![Caption](prefix+file)
  \begin{wrapfigure}...\end{wrapfigure}  becomes ![Caption](prefix+file)

SETUP:
  1. Install pandoc:  https://pandoc.org/installing.html
  2. Convert:         ltmd paper.tex -o paper.md
"#;

/// Convert LaTeX to Markdown, protecting refs, cites, equations, and figures
/// through pandoc.
#[derive(Parser, Debug)]
#[command(
    name = "ltmd",
    version,
    about = "Convert LaTeX to Markdown without pandoc mangling refs, cites, equations, and figures",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// LaTeX input file, or '-' for stdin.
    input: String,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "LTMD_OUTPUT")]
    output: Option<PathBuf>,

    /// String prepended verbatim to every extracted figure filename.
    #[arg(
        long,
        env = "LTMD_IMAGE_PREFIX",
        default_value = "",
        long_help = "Prepended verbatim to every figure filename — no slash is inserted,\n\
          so pass 'imgs/' (with the slash) to point images into an imgs/ directory."
    )]
    image_prefix: String,

    /// Converter binary to invoke.
    #[arg(long, env = "LTMD_PANDOC", default_value = "pandoc")]
    pandoc: String,

    /// Target pandoc writer: markdown, gfm, markdown_strict, rst, ...
    #[arg(long, env = "LTMD_TO", default_value = "markdown")]
    to: String,

    /// Extra argument forwarded to the converter (repeatable).
    #[arg(long = "pandoc-arg", value_name = "ARG", allow_hyphen_values = true)]
    pandoc_args: Vec<String>,

    /// Seed the token allocator for reproducible intermediate text.
    #[arg(long, env = "LTMD_TOKEN_SEED")]
    token_seed: Option<u64>,

    /// Output structured JSON (markdown + stats) instead of plain Markdown.
    #[arg(long, env = "LTMD_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LTMD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "LTMD_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ConversionConfig::builder()
        .image_prefix(cli.image_prefix.clone())
        .pandoc_program(cli.pandoc.clone())
        .output_format(cli.to.clone())
        .pandoc_args(cli.pandoc_args.clone());
    if let Some(seed) = cli.token_seed {
        builder = builder.token_seed(seed);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run conversion ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        anyhow::ensure!(
            cli.input != "-",
            "reading from stdin requires writing to stdout; drop -o"
        );
        anyhow::ensure!(!cli.json, "--json writes to stdout; drop -o");

        let stats = convert_to_file(&cli.input, output_path, &config)
            .with_context(|| format!("Conversion of '{}' failed", cli.input))?;

        if !cli.quiet {
            eprintln!(
                "{}  {} spans protected  {}ms  →  {}",
                green("✔"),
                stats.total_spans,
                stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
            eprintln!(
                "   {} ref  {} cite  {} eq  {} fig  {} wrapfig",
                dim(&stats.references.to_string()),
                dim(&stats.citations.to_string()),
                dim(&stats.math_blocks.to_string()),
                dim(&stats.figures.to_string()),
                dim(&stats.wrapped_figures.to_string()),
            );
        }
    } else {
        let input = read_input(&cli.input)?;
        let output = convert(&input, &config)
            .with_context(|| format!("Conversion of '{}' failed", cli.input))?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output.markdown.as_bytes())
                .context("Failed to write to stdout")?;
            // Ensure a trailing newline on stdout.
            if !output.markdown.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }

        if !cli.quiet && !cli.json {
            eprintln!(
                "   {} spans protected  —  {}ms total",
                dim(&output.stats.total_spans.to_string()),
                output.stats.total_duration_ms,
            );
        }
    }

    Ok(())
}

/// Read the LaTeX source from a file path or stdin (`-`).
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read LaTeX from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read input file '{input}'"))
    }
}
