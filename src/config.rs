//! Per-deployment codec settings.
//!
//! These are meant to be fixed once at startup, typically loaded from the
//! host application's own configuration, and never changed per call.

use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// What decoding does with a `Kind` that has no registered variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownVariantPolicy {
    /// Fail the whole decode with [`Error::UnknownVariant`](crate::Error::UnknownVariant).
    #[default]
    Reject,

    /// Decode the record as a base [`Fault`](crate::Fault), keeping the
    /// fields it shares with the unknown variant.
    FallbackToBase,
}

/// An error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown policy `{0}`, expected `reject` or `fallback-to-base`")]
pub struct ParsePolicyError(String);

impl FromStr for UnknownVariantPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(Self::Reject),
            "fallback-to-base" => Ok(Self::FallbackToBase),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// Deepest cause chain any codec accepts, in links below the outermost record.
///
/// The parser refuses input nested deeper than 127 levels, and a sequence
/// wraps its records in one more level, so this is where both stop fitting.
pub const MAX_DEPTH: usize = 125;

/// Settings of a [`Codec`](crate::Codec).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Policy applied to unregistered discriminators, at every depth.
    pub unknown_variant: UnknownVariantPolicy,

    /// Maximum characters of raw input quoted in decoding errors.
    pub snippet_len: usize,

    /// Maximum cause links below the outermost record, on both encode and
    /// decode; values above [`MAX_DEPTH`] are capped to it.
    pub max_depth: usize,
}

impl Config {
    /// The cause chain bound actually enforced.
    pub fn depth_limit(&self) -> usize {
        self.max_depth.min(MAX_DEPTH)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unknown_variant: UnknownVariantPolicy::Reject,
            snippet_len: 64,
            max_depth: 100,
        }
    }
}
