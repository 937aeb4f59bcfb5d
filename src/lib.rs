// textsub/src/lib.rs
//! # textsub
//!
//! `textsub` performs ordered, configurable textual substitution over an
//! in-memory string: a list of search/replace rules, each independently
//! tunable for case sensitivity, word-boundary isolation, and case-preserving
//! replacement, plus single-character-delimited "bypass" regions that are
//! exempt from substitution and have their delimiters stripped at the end.
//!
//! The library is pure and stateless: it operates on a single in-memory
//! string and a single configuration object, synchronously, start to finish.
//! There is no file I/O, no configuration-file loading, and no cross-call
//! state.
//!
//! ## Modules
//!
//! * `config`: Defines the substitution rules, option overrides, layered
//!   option resolution, and pre-flight validation.
//! * `engine`: The `replace` entry point and the bypass stripper.
//! * `errors`: The crate error type.
//!
//! ## Usage Example
//!
//! ```rust
//! use textsub::{replace, Config, Substitution};
//!
//! let config = Config {
//!     subs: vec![
//!         Substitution::new("cat", "dog"),
//!         Substitution::new("(foo)-(bar)", "$2-$1"),
//!     ],
//!     ..Config::default()
//! };
//!
//! let output = replace("Cat CAT cat, and foo-bar. Keep |cat| as-is.", &config)?;
//! assert_eq!(output, "Dog DOG dog, and bar-foo. Keep cat as-is.");
//! # Ok::<(), textsub::TextsubError>(())
//! ```
//!
//! ## Semantics
//!
//! Substitutions are applied strictly in list order because each operates on
//! the cumulative output of all prior substitutions: rule N's search pattern
//! may match text introduced by rule N-1's replacement. After all rules have
//! run, one stripping pass removes the bypass delimiters, leaving the
//! protected content intact.
//!
//! A rule's `search` is either a plain/partial-pattern fragment, which goes
//! through the full option pipeline (bypass guards, word isolation, derived
//! flags), or a pre-compiled [`fancy_regex::Regex`], which is applied
//! verbatim with its own inline flags as an escape hatch for callers needing
//! raw pattern control.
//!
//! ## Error Handling
//!
//! The only domain error is an invalid `bypass` option (not exactly one
//! character), raised eagerly at option resolution. Pattern compilation and
//! match-time failures propagate untranslated from the underlying engines.
//! Callers should treat any error as a fatal configuration defect: no
//! partial result is ever returned.
//!
//! ---
//! License: MIT OR Apache-2.0

mod compiler;
pub mod config;
pub mod engine;
pub mod errors;
mod replacer;

/// Re-exports the public configuration types and option resolution.
pub use config::{
    resolve,
    Config,
    OptionOverrides,
    RegexFlags,
    ResolvedOptions,
    SearchTerm,
    Substitution,
    DEFAULT_BYPASS,
    MAX_PATTERN_LENGTH,
};

/// Re-exports the crate error type.
pub use errors::TextsubError;

/// Re-exports the substitution entry point and the bypass stripper.
pub use engine::{replace, strip_bypass};
