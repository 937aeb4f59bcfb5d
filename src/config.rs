//! Configuration management for `textsub`.
//!
//! This module defines the core data structures for substitution rules and
//! engine options, handles serialization/deserialization of configurations,
//! and implements the layered option resolution used by the engine: built-in
//! defaults, overridden by the global options, overridden by per-substitution
//! options.
//!
//! License: MIT OR Apache-2.0

use fancy_regex::Regex;
use log::debug;
use once_cell::sync::Lazy;
use serde::de::{Deserializer, Error as DeError};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::errors::TextsubError;

/// Maximum allowed length for a search fragment, enforced by [`Config::validate`].
pub const MAX_PATTERN_LENGTH: usize = 500;

/// The built-in bypass delimiter character.
pub const DEFAULT_BYPASS: char = '|';

/// Partial option set as it appears in a configuration: every field is
/// optional and unset fields inherit from the layer below (global options for
/// a per-substitution override, built-in defaults for the global options).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionOverrides {
    /// If false, patterns match case-insensitively. Default: false.
    pub case_sensitive: Option<bool>,
    /// If true, replacements mirror the capitalization of the matched text
    /// (all-caps, capitalized, lowercase). Default: true.
    pub match_case: Option<bool>,
    /// If true, matches must fall on word-boundary edges. Default: true.
    pub isolated_word: Option<bool>,
    /// Delimiter marking bypass regions. Must be exactly one character.
    /// Default: `"|"`.
    pub bypass: Option<String>,
}

/// Regex flag set derived from resolved options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegexFlags {
    /// Always set: every pattern application replaces all matches.
    pub global: bool,
    /// Set unless `case_sensitive` is true.
    pub case_insensitive: bool,
}

impl RegexFlags {
    fn derived(case_sensitive: bool) -> Self {
        Self {
            global: true,
            case_insensitive: !case_sensitive,
        }
    }
}

/// Fully-resolved options for one substitution step (or for the config as a
/// whole), plus the derived [`RegexFlags`].
///
/// The bypass delimiter is a `char` by construction: the one-character
/// invariant is checked once, at resolution time, and cannot be violated
/// downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub case_sensitive: bool,
    pub match_case: bool,
    pub isolated_word: bool,
    pub bypass: char,
    pub flags: RegexFlags,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            match_case: true,
            isolated_word: true,
            bypass: DEFAULT_BYPASS,
            flags: RegexFlags::derived(false),
        }
    }
}

/// Merges an override layer onto a base option set and derives the regex
/// flags for the result.
///
/// With `base = None` the merge starts from a fresh copy of the built-in
/// defaults (the global pass). For per-substitution resolution, `base` is the
/// already-resolved global options, so per-substitution overrides win over
/// global overrides, which win over defaults. The merge is shallow and
/// key-wise; the base is never mutated.
///
/// A present `bypass` override that is not exactly one character fails with
/// [`TextsubError::InvalidBypassConfiguration`]. The check runs on every
/// resolution, so an invalid per-substitution override surfaces at that
/// substitution even when the global bypass was valid, and vice versa.
pub fn resolve(
    overrides: &OptionOverrides,
    base: Option<&ResolvedOptions>,
) -> Result<ResolvedOptions, TextsubError> {
    let mut resolved = base.cloned().unwrap_or_default();

    if let Some(case_sensitive) = overrides.case_sensitive {
        resolved.case_sensitive = case_sensitive;
    }
    if let Some(match_case) = overrides.match_case {
        resolved.match_case = match_case;
    }
    if let Some(isolated_word) = overrides.isolated_word {
        resolved.isolated_word = isolated_word;
    }
    if let Some(bypass) = &overrides.bypass {
        resolved.bypass = single_char(bypass)?;
    }

    resolved.flags = RegexFlags::derived(resolved.case_sensitive);
    debug!("Resolved options: {:?}", resolved);
    Ok(resolved)
}

fn single_char(bypass: &str) -> Result<char, TextsubError> {
    let mut chars = bypass.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(TextsubError::InvalidBypassConfiguration(bypass.to_owned())),
    }
}

/// The search side of a substitution rule.
///
/// The two variants are deliberately explicit: a [`SearchTerm::Literal`] goes
/// through the full option/guard pipeline, while a [`SearchTerm::Raw`]
/// pattern is applied verbatim and skips it entirely.
#[derive(Debug, Clone)]
pub enum SearchTerm {
    /// Plain text or a partial pattern fragment. Compiled with bypass guards,
    /// optional word isolation, and the resolved flags.
    Literal(String),
    /// A pre-compiled pattern applied with its own embedded inline flags.
    /// `isolatedWord`, `bypass` and `matchCase` are not honored for this
    /// entry; replacement uses the engine's native capture expansion.
    Raw(Regex),
}

impl SearchTerm {
    /// The pattern source text, regardless of variant.
    pub fn as_str(&self) -> &str {
        match self {
            SearchTerm::Literal(fragment) => fragment,
            SearchTerm::Raw(regex) => regex.as_str(),
        }
    }
}

impl PartialEq for SearchTerm {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SearchTerm::Literal(a), SearchTerm::Literal(b)) => a == b,
            (SearchTerm::Raw(a), SearchTerm::Raw(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl From<&str> for SearchTerm {
    fn from(fragment: &str) -> Self {
        SearchTerm::Literal(fragment.to_owned())
    }
}

impl From<String> for SearchTerm {
    fn from(fragment: String) -> Self {
        SearchTerm::Literal(fragment)
    }
}

impl From<Regex> for SearchTerm {
    fn from(regex: Regex) -> Self {
        SearchTerm::Raw(regex)
    }
}

impl Serialize for SearchTerm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SearchTerm::Literal(fragment) => serializer.serialize_str(fragment),
            SearchTerm::Raw(regex) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("regex", regex.as_str())?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for SearchTerm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Fragment(String),
            Raw { regex: String },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Fragment(fragment) => Ok(SearchTerm::Literal(fragment)),
            Repr::Raw { regex } => Regex::new(&regex)
                .map(SearchTerm::Raw)
                .map_err(DeError::custom),
        }
    }
}

/// A single ordered search/replace rule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Substitution {
    /// What to look for.
    pub search: SearchTerm,
    /// Replacement text; may contain `$1`, `$2`, ... backreference markers
    /// when the search fragment defines capture groups.
    pub replace: String,
    /// Per-rule option overrides, applied on top of the global options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionOverrides>,
}

impl Substitution {
    /// A literal (fragment) substitution with no per-rule overrides.
    pub fn new(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            search: SearchTerm::Literal(search.into()),
            replace: replace.into(),
            options: None,
        }
    }

    /// A raw-pattern substitution, bypassing the option/guard pipeline.
    pub fn raw(pattern: Regex, replace: impl Into<String>) -> Self {
        Self {
            search: SearchTerm::Raw(pattern),
            replace: replace.into(),
            options: None,
        }
    }

    /// Attaches per-rule option overrides.
    pub fn with_options(mut self, options: OptionOverrides) -> Self {
        self.options = Some(options);
        self
    }
}

/// Top-level configuration: global option overrides plus the ordered
/// substitution list. Order is semantically significant; later rules see the
/// output of earlier rules.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Global option overrides, merged over the built-in defaults.
    #[serde(default)]
    pub options: OptionOverrides,
    /// Ordered substitution rules.
    pub subs: Vec<Substitution>,
}

static BACKREF_MARKER: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"\$(\d+)").unwrap());

impl Config {
    /// Pre-flight validation of the substitution list.
    ///
    /// Collects, across all literal substitutions: empty fragments, fragments
    /// exceeding [`MAX_PATTERN_LENGTH`], fragments that fail to compile in
    /// isolation, and `$N` replacement markers that reference capture groups
    /// the fragment does not define. Raw-pattern substitutions are skipped.
    ///
    /// This is an optional helper for callers who want early diagnostics;
    /// [`replace`](crate::replace) does not call it.
    pub fn validate(&self) -> Result<(), TextsubError> {
        let mut errors = Vec::new();

        for (index, sub) in self.subs.iter().enumerate() {
            let SearchTerm::Literal(fragment) = &sub.search else {
                continue;
            };

            if fragment.is_empty() {
                errors.push(format!("substitution {}: empty search fragment", index));
                continue;
            }

            if fragment.len() > MAX_PATTERN_LENGTH {
                errors.push(format!(
                    "substitution {}: fragment length ({}) exceeds maximum allowed ({})",
                    index,
                    fragment.len(),
                    MAX_PATTERN_LENGTH
                ));
                continue;
            }

            if let Err(e) = Regex::new(fragment) {
                errors.push(format!("substitution {}: invalid search fragment: {}", index, e));
                continue;
            }

            let group_count = count_capture_groups(fragment);
            for cap in BACKREF_MARKER.captures_iter(&sub.replace) {
                let Some(marker) = cap.get(1) else { continue };
                let Ok(group) = marker.as_str().parse::<usize>() else {
                    continue;
                };
                if group == 0 || group > group_count {
                    errors.push(format!(
                        "substitution {}: replacement references non-existent capture group '${}'",
                        index, group
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(TextsubError::Validation(errors.join("\n")))
        }
    }
}

/// Counts the capturing groups a fragment defines, skipping escaped parens
/// and `(?...)` non-capturing constructs.
fn count_capture_groups(fragment: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    let mut chars = fragment.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped = !escaped,
            '(' if !escaped => {
                if chars.peek() != Some(&'?') {
                    count += 1;
                }
            }
            _ => escaped = false,
        }
    }
    count
}
