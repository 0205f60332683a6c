//! Cleanup of raw model output: delete every match of a mode's `clear` pattern.

use regex::Regex;
use std::borrow::Cow;

/// Compiles a `clear` pattern. An empty pattern means "no cleanup" and yields `None`,
/// never a pattern that matches at every position.
pub fn compile_clear(pattern: &str) -> Result<Option<Regex>, regex::Error> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(pattern).map(Some)
}

/// Removes all non-overlapping matches of `clear` from `text`.
pub fn strip<'a>(text: &'a str, clear: Option<&Regex>) -> Cow<'a, str> {
    match clear {
        Some(re) => re.replace_all(text, ""),
        None => Cow::Borrowed(text),
    }
}
