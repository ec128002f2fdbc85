//! Rendering of [`ResourceResult`]s for the command line.

use std::fmt::Write as _;

use crate::service::ResourceResult;

/// Format a result for stdout.
///
/// Verbose output is the full record as indented JSON. Otherwise a single
/// glyph-prefixed line, plus the error kind on its own line for failures.
///
/// # Errors
/// Returns an error if the result cannot be serialized.
pub fn format_result(result: &ResourceResult, verbose: bool) -> color_eyre::Result<String> {
    if verbose {
        return Ok(serde_json::to_string_pretty(result)?);
    }

    let mut out = String::new();
    if result.is_success() {
        write!(out, "✅ {}", result.message())?;
    } else {
        write!(out, "❌ {}", result.message())?;
        if let Some(kind) = result.error() {
            write!(out, "\n   Error: {kind}")?;
        }
    }
    Ok(out)
}
