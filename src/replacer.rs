//! replacer.rs - Match decomposition and the two replacement strategies.
//!
//! Every match of a guarded pattern is decomposed into an explicit
//! [`MatchParts`] value before a strategy runs, instead of inferring the
//! guard/backreference situation from a raw capture list. The strategy is
//! chosen once per substitution: backreference expansion when the replacement
//! carries `$` markers or case matching is disabled, original-case
//! preservation otherwise.

use fancy_regex::Captures;
use log::debug;

use crate::config::ResolvedOptions;

/// Decomposed view of one pattern match, following the fixed group layout
/// produced by `compiler::compile`: left guard, primary, fragment-internal
/// groups, right guard.
#[derive(Debug)]
pub(crate) struct MatchParts<'t> {
    /// The entire matched text (group 0).
    pub full_match: &'t str,
    /// The search fragment's own capture (group 2).
    pub primary: Option<&'t str>,
    /// Left bypass-guard capture (group 1).
    pub guard_left: Option<&'t str>,
    /// Right bypass-guard capture (last group).
    pub guard_right: Option<&'t str>,
    /// Capture groups defined inside the search fragment, in order.
    pub extra_groups: Vec<Option<&'t str>>,
}

impl<'t> MatchParts<'t> {
    pub(crate) fn from_captures(caps: &Captures<'t>) -> Self {
        // group layout: 0 whole, 1 left guard, 2 primary, .., len-1 right guard
        debug_assert!(caps.len() >= 4);
        let as_str = |i: usize| caps.get(i).map(|m| m.as_str());
        let last = caps.len() - 1;

        Self {
            full_match: as_str(0).unwrap_or(""),
            primary: as_str(2),
            guard_left: as_str(1),
            guard_right: as_str(last),
            extra_groups: (3..last).map(as_str).collect(),
        }
    }

    /// True when a bypass guard captured actual text, signalling that this
    /// occurrence is itself a bypass delimiter and must be left unmodified.
    fn guard_fired(&self) -> bool {
        let captured = |g: Option<&str>| g.map_or(false, |text| !text.is_empty());
        captured(self.guard_left) || captured(self.guard_right)
    }
}

/// Per-substitution replacement strategy.
#[derive(Debug)]
pub(crate) enum Replacer<'a> {
    /// Textual `$N` backreference expansion; also used whenever case matching
    /// is disabled, in which case the replacement is emitted literally.
    BackRef(&'a str),
    /// Replacement re-cased to mirror the matched text.
    MatchCase(&'a str),
}

impl<'a> Replacer<'a> {
    /// Chooses the strategy for one substitution: backreference substitution
    /// when the replacement contains a `$` character or `matchCase` is off,
    /// case preservation otherwise.
    pub(crate) fn select(replace: &'a str, options: &ResolvedOptions) -> Self {
        if replace.contains('$') || !options.match_case {
            debug!("Using backreference replacement for {:?}", replace);
            Replacer::BackRef(replace)
        } else {
            debug!("Using case-preserving replacement for {:?}", replace);
            Replacer::MatchCase(replace)
        }
    }

    /// Produces the replacement text for one match.
    pub(crate) fn apply(&self, parts: &MatchParts) -> String {
        match self {
            Replacer::BackRef(replace) => {
                if !parts.extra_groups.is_empty() {
                    return expand_backrefs(replace, &parts.extra_groups);
                }
                if parts.guard_fired() {
                    return parts.full_match.to_owned();
                }
                (*replace).to_owned()
            }
            Replacer::MatchCase(replace) => {
                let primary = match parts.primary {
                    Some(p) if !p.is_empty() => p,
                    // guard fired, no real match
                    _ => return parts.full_match.to_owned(),
                };

                if primary.to_uppercase() == primary {
                    replace.to_uppercase()
                } else if starts_uppercase(primary) {
                    capitalize_first(replace)
                } else {
                    replace.to_lowercase()
                }
            }
        }
    }
}

/// Textually substitutes each `$N` marker with the N-th fragment-internal
/// capture, in ascending index order. A non-participating group expands to
/// the empty string.
fn expand_backrefs(replace: &str, groups: &[Option<&str>]) -> String {
    let mut expanded = replace.to_owned();
    for (index, group) in groups.iter().enumerate() {
        let marker = format!("${}", index + 1);
        expanded = expanded.replace(&marker, group.unwrap_or(""));
    }
    expanded
}

fn starts_uppercase(text: &str) -> bool {
    text.chars().next().map_or(false, |c| !c.is_lowercase())
}

/// Uppercases only the first character, leaving the rest unchanged.
fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
