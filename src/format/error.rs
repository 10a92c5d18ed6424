use std::{
    convert::Infallible,
    fmt::{self, Write as _},
};

use serde_json::Value;
use thiserror::Error;

use crate::fault::{CapabilityMismatch, Kind};

/// A handy [`std::result::Result`] alias with the [`enum@Error`] type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error that may occur when (de-)serializing fault records.
///
/// Decoding errors carry a bounded `snippet` of the offending input.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed input `{snippet}`: {source}")]
    Parse {
        source: serde_json::Error,
        snippet: String,
    },

    #[error("expected a record, got {found} `{snippet}`")]
    NotARecord { found: &'static str, snippet: String },

    #[error("expected a sequence of records, got {found} `{snippet}`")]
    NotASequence { found: &'static str, snippet: String },

    #[error("no `Kind` discriminator in record `{snippet}`")]
    MissingKind { snippet: String },

    #[error("expected a string `Kind` discriminator, got {found} in record `{snippet}`")]
    InvalidKind { found: &'static str, snippet: String },

    #[error("unknown variant `{kind}` in record `{snippet}`")]
    UnknownVariant { kind: String, snippet: String },

    #[error("expected {expected} for field `{field}` of `{kind}`, got {found} in record `{snippet}`")]
    FieldDecode {
        kind: Kind,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
        snippet: String,
    },

    #[error("cause of `{kind}` nests deeper than {max_depth} links")]
    ChainTooDeep { kind: Kind, max_depth: usize },

    #[error(transparent)]
    CapabilityMismatch(#[from] CapabilityMismatch),

    #[error("unable to serialize record: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl From<Infallible> for Error {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

/// Keeps the first `left` characters written to it, then refuses the rest.
struct Bounded {
    buf: String,
    left: usize,
    truncated: bool,
}

impl Bounded {
    fn new(max: usize) -> Self {
        Self {
            buf: String::new(),
            left: max,
            truncated: false,
        }
    }

    fn finish(mut self, cut: bool) -> String {
        if self.truncated || cut {
            self.buf.push('…');
        }

        self.buf
    }
}

impl fmt::Write for Bounded {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match s.char_indices().nth(self.left) {
            None => {
                self.left -= s.chars().count();
                self.buf.push_str(s);

                Ok(())
            }
            Some((end, _)) => {
                self.buf.push_str(&s[..end]);
                self.left = 0;
                self.truncated = true;

                Err(fmt::Error)
            }
        }
    }
}

/// Render the first `max` characters of `value`, marking any truncation.
///
/// Rendering stops at the bound, however large `value` is.
pub(crate) fn snippet(value: &impl fmt::Display, max: usize) -> String {
    let mut bounded = Bounded::new(max);

    // Only fails once the bound is reached
    let _ = write!(bounded, "{value}");

    bounded.finish(false)
}

/// Quote the first `max` characters of the raw input `raw`, marking any truncation.
pub(crate) fn snippet_bytes(raw: &[u8], max: usize) -> String {
    // No character is wider than 4 bytes in UTF-8
    let end = raw.len().min(max.saturating_mul(4));
    let mut bounded = Bounded::new(max);

    let _ = bounded.write_str(&String::from_utf8_lossy(&raw[..end]));

    bounded.finish(end < raw.len())
}

/// Name the JSON type of `value`, for diagnostics.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
