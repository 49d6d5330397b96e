//! Category extraction from raw log lines.
//!
//! A logcat line in the default `threadtime` format looks like
//! `01-28 09:00:00.123  1234  1250 I ActivityManager: ...`. The sixth
//! whitespace-separated field names the component that emitted the line, and
//! two lines with the same field are treated as the same kind of activity.

use std::borrow::Borrow;
use std::fmt;

use thiserror::Error;

/// Zero-based position of the category token in a logcat line.
pub const DEFAULT_CATEGORY_FIELD: usize = 5;

/// Text that follows the dashes of a log buffer boundary marker.
const BOUNDARY_MARKER_TEXT: &str = "beginning of ";

/// Opaque identifier for a kind of log activity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryKey(String);

impl CategoryKey {
    /// Creates a key from a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CategoryKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Why a line produced no category.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The line marks the start of a log buffer (`--------- beginning of main`).
    #[error("log buffer boundary marker")]
    BoundaryMarker,

    /// The line is too short to contain the category field.
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
}

impl ParseFailure {
    /// Whether the failure deserves a diagnostic on the side channel.
    pub const fn is_reportable(&self) -> bool {
        matches!(self, Self::TooFewFields { .. })
    }
}

/// Extracts the category key at `field_index` from a line.
///
/// Only lines that fail extraction are checked for the boundary marker, so a
/// marker-looking line with enough fields still yields a category.
pub fn classify(line: &str, field_index: usize) -> Result<CategoryKey, ParseFailure> {
    let mut fields = line.split_whitespace();
    if let Some(token) = fields.nth(field_index) {
        return Ok(CategoryKey::new(token));
    }

    if is_boundary_marker(line) {
        return Err(ParseFailure::BoundaryMarker);
    }

    Err(ParseFailure::TooFewFields {
        expected: field_index.saturating_add(1),
        found: line.split_whitespace().count(),
    })
}

/// Returns true for `-- beginning of <buffer>` lines, any number of dashes.
pub fn is_boundary_marker(line: &str) -> bool {
    let trimmed = line.trim_start();
    let rest = trimmed.trim_start_matches('-');
    rest.len() < trimmed.len() && rest.trim_start().starts_with(BOUNDARY_MARKER_TEXT)
}
