//! Shared argument parsing helpers.

use std::path::Path;

use crate::error::GridtileError;
use crate::modules::input::KeyInput;

/// Reads key tokens from a script file.
///
/// Tokens are separated by whitespace; `#` starts a comment that runs to the
/// end of the line.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_script(path: &Path) -> Result<Vec<String>, GridtileError> {
    let contents = std::fs::read_to_string(path).map_err(|err| {
        GridtileError::InvalidArguments(format!("Failed to read script {}: {err}", path.display()))
    })?;
    Ok(script_tokens(&contents))
}

/// Splits script contents into tokens.
#[must_use]
pub fn script_tokens(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.split_once('#').map_or(line, |(code, _)| code))
        .flat_map(str::split_whitespace)
        .map(ToString::to_string)
        .collect()
}

/// Parses every token, reporting the first invalid one.
///
/// # Errors
///
/// Returns [`GridtileError::InvalidArguments`] naming the invalid token.
pub fn parse_keys(tokens: &[String]) -> Result<Vec<KeyInput>, GridtileError> {
    tokens
        .iter()
        .map(|token| token.parse::<KeyInput>().map_err(GridtileError::InvalidArguments))
        .collect()
}
