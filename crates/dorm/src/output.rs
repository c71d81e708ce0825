//! Text or JSON rendering of command results

use std::fmt::Display;

use serde::Serialize;

use crate::{Error, Result};

/// Render `value` as pretty JSON or as its `Display` text.
///
/// # Errors
///
/// Returns error if JSON encoding fails.
pub fn render<T: Serialize + Display>(value: &T, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(value)
            .map_err(|e| Error::Parse(format!("Failed to encode output: {e}")))
    } else {
        Ok(value.to_string())
    }
}

/// Print a rendered value to stdout.
///
/// # Errors
///
/// See [`render`].
pub fn emit<T: Serialize + Display>(value: &T, json: bool) -> Result<()> {
    let rendered = render(value, json)?;
    println!("{rendered}");
    Ok(())
}
