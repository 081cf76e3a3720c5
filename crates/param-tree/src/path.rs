//! Slash-delimited parameter path utilities
//!
//! Parameter keys are built by joining map keys and sequence indices with
//! `/`, e.g. `some_sub_config/an_array/0`. Only the characters in
//! [`ALLOWED_CHARACTERS`] may appear in a key.
//!
//! # Examples
//!
//! ```
//! use param_tree::path::{PathSegment, split_path, validate_path};
//!
//! let segments: Vec<_> = split_path("servers/0/host").map(PathSegment::parse).collect();
//! assert_eq!(segments, vec![
//!     PathSegment::Key("servers".to_string()),
//!     PathSegment::Index(0),
//!     PathSegment::Key("host".to_string()),
//! ]);
//!
//! assert!(validate_path("a_b-1.2/x").is_ok());
//! assert!(validate_path("a!b").is_err());
//! assert!(validate_path("a//b").is_err());
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Human-readable form of the characters a parameter key may contain
pub const ALLOWED_CHARACTERS: &str = "A-Za-z0-9.-_/";

/// Characters allowed in a single header segment (no `/`)
pub const SEGMENT_CHARACTERS: &str = "A-Za-z0-9.-_";

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._\-]+(/[A-Za-z0-9._\-]+)*$").unwrap());

static SEGMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._\-]+$").unwrap());

/// A segment of a path - either a map key or a sequence index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    /// Classify a raw segment.
    ///
    /// Only canonical decimal indices (`0`, or digits without a leading zero)
    /// are treated as indices, so keys such as `007` or `-1` survive a round
    /// trip as map keys.
    pub fn parse(segment: &str) -> Self {
        if is_canonical_index(segment)
            && let Ok(index) = segment.parse::<usize>()
        {
            return Self::Index(index);
        }
        Self::Key(segment.to_string())
    }
}

fn is_canonical_index(segment: &str) -> bool {
    match segment.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    }
}

/// Check a key against the allowed character set.
///
/// Every `/`-separated segment must be non-empty, so `a//b`, `/a` and `a/`
/// are rejected.
pub fn validate_path(path: &str) -> Result<()> {
    if KEY_PATTERN.is_match(path) {
        Ok(())
    } else {
        Err(Error::InvalidPathSegment {
            path: path.to_string(),
            allowed: ALLOWED_CHARACTERS,
        })
    }
}

/// Check a single segment such as an environment or file name.
///
/// Unlike [`validate_path`] a `/` is not allowed.
pub fn validate_segment(segment: &str) -> Result<()> {
    if SEGMENT_PATTERN.is_match(segment) {
        Ok(())
    } else {
        Err(Error::InvalidPathSegment {
            path: segment.to_string(),
            allowed: SEGMENT_CHARACTERS,
        })
    }
}

/// Append a segment to a base path.
///
/// An empty base yields the segment alone.
pub fn join_path(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{}/{}", base, segment)
    }
}

/// Split a path into its non-empty segments
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}
