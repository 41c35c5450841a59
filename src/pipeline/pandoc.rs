//! External converter invocation: pandoc over a temporary file.
//!
//! The token-substituted text is staged in a [`tempfile::NamedTempFile`] and
//! handed to the converter as a file argument; stdout is the converted text.
//! The converter is trusted to preserve any 10-digit token verbatim and to
//! introduce none of its own — a bare number is inert under every pandoc
//! writer.
//!
//! Nothing in the core depends on pandoc specifically: this module just
//! supplies the out-of-the-box converter for [`crate::convert`]. Callers with
//! their own converter use [`crate::convert_with`] and never touch this code.

use crate::config::ConversionConfig;
use crate::error::LtmdError;
use std::io::Write;
use std::process::Command;
use tracing::debug;

/// Run the configured converter over `intermediate`, returning its stdout.
pub fn run_converter(intermediate: &str, config: &ConversionConfig) -> Result<String, LtmdError> {
    let program = &config.pandoc_program;

    let mut staged = tempfile::Builder::new()
        .prefix("ltmd-")
        .suffix(".tex")
        .tempfile()
        .map_err(LtmdError::IntermediateWriteFailed)?;
    staged
        .write_all(intermediate.as_bytes())
        .map_err(LtmdError::IntermediateWriteFailed)?;
    staged
        .flush()
        .map_err(LtmdError::IntermediateWriteFailed)?;

    debug!(
        %program,
        to = %config.output_format,
        staged = %staged.path().display(),
        "invoking external converter"
    );

    // `staged` stays alive until the end of scope, so the file outlives the
    // child process.
    let output = Command::new(program)
        .arg(staged.path())
        .args(["--from", "latex", "--to", config.output_format.as_str()])
        .args(&config.pandoc_args)
        .output()
        .map_err(|source| LtmdError::ConverterLaunchFailed {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(LtmdError::ConverterFailed {
            program: program.clone(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    String::from_utf8(output.stdout).map_err(|_| LtmdError::ConverterOutputNotUtf8 {
        program: program.clone(),
    })
}
