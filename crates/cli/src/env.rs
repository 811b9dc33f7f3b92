//! Environment fallbacks for options omitted on the command line.

use std::env;

use deflate::{CompressionLevel, ContainerFormat};

use crate::error::CliError;

/// Default compression level when `--level` is absent.
pub const LEVEL_VARIABLE: &str = "OC_DEFLATE_LEVEL";
/// Default container format when `--format` is absent.
pub const FORMAT_VARIABLE: &str = "OC_DEFLATE_FORMAT";
/// Decompression output limit in bytes when `--max-output` is absent.
pub const MAX_OUTPUT_VARIABLE: &str = "OC_DEFLATE_MAX_OUTPUT";

/// Returns the trimmed value of `variable`, or `None` when it is unset.
fn read_variable(variable: &str) -> Result<Option<String>, CliError> {
    let Some(value) = env::var_os(variable) else {
        return Ok(None);
    };

    let text = value.to_str().ok_or_else(|| CliError::NonUtf8Env {
        variable: variable.to_owned(),
    })?;

    Ok(Some(text.trim().to_owned()))
}

fn invalid(variable: &str, value: String, reason: &str) -> CliError {
    CliError::InvalidEnv {
        variable: variable.to_owned(),
        value,
        reason: reason.to_owned(),
    }
}

/// Reads a compression level from `variable`.
pub fn level_from_env(variable: &str) -> Result<Option<CompressionLevel>, CliError> {
    let Some(text) = read_variable(variable)? else {
        return Ok(None);
    };
    match text.parse::<CompressionLevel>() {
        Ok(level) => Ok(Some(level)),
        Err(_) => Err(invalid(variable, text, "expected an integer from 1 to 12")),
    }
}

/// Reads a container format name from `variable`.
pub fn format_from_env(variable: &str) -> Result<Option<ContainerFormat>, CliError> {
    let Some(text) = read_variable(variable)? else {
        return Ok(None);
    };
    match text.parse::<ContainerFormat>() {
        Ok(format) => Ok(Some(format)),
        Err(_) => Err(invalid(variable, text, "expected deflate, zlib, or gzip")),
    }
}

/// Reads a positive byte count from `variable`.
pub fn max_output_from_env(variable: &str) -> Result<Option<usize>, CliError> {
    let Some(text) = read_variable(variable)? else {
        return Ok(None);
    };
    match text.parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(Some(limit)),
        _ => Err(invalid(variable, text, "expected a positive byte count")),
    }
}
