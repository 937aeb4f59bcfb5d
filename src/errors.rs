//! errors.rs - Custom error types for the textsub library.
//!
//! This module defines a structured error enum for the library. There is
//! exactly one domain error (`InvalidBypassConfiguration`); failures from the
//! underlying pattern engines are carried through untranslated.
//!
//! License: MIT OR Apache-2.0

use thiserror::Error;

/// This enum represents all possible error types in the `textsub` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TextsubError {
    /// The `bypass` option must be exactly one character; raised eagerly at
    /// option resolution time, for the global options and for every
    /// per-substitution override.
    #[error("bypass option needs to be a one-character string (got {0:?})")]
    InvalidBypassConfiguration(String),

    /// Compile- or match-time failure of a guarded search pattern.
    #[error(transparent)]
    Pattern(#[from] fancy_regex::Error),

    /// Compile-time failure from the basic regex engine (bypass stripping).
    #[error(transparent)]
    StripPattern(#[from] regex::Error),

    /// Aggregate findings from `Config::validate`. Never raised by `replace`.
    #[error("configuration validation failed:\n{0}")]
    Validation(String),
}
