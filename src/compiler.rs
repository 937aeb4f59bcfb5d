//! compiler.rs - Builds guarded search patterns for literal substitutions.
//!
//! A search fragment is wrapped in a capturing group, anchored between word
//! boundaries when `isolatedWord` is set, and framed by negative-lookahead
//! guards on the bypass delimiter so that text enclosed in bypass regions is
//! not eligible for substitution. The guards require lookahead support, so
//! compilation goes through `fancy-regex`; the cheaper basic engine is
//! reserved for patterns that permit it (see `engine::strip_bypass`).
//!
//! License: MIT OR Apache-2.0

use fancy_regex::{Regex, RegexBuilder};
use log::debug;

use crate::config::ResolvedOptions;
use crate::errors::TextsubError;

/// Compiles a search fragment into a guarded pattern.
///
/// The guard lookaheads are wrapped in capturing groups alongside the search
/// group, so the absolute group layout of every compiled pattern is fixed:
/// group 1 is the left guard, group 2 the whole fragment, groups 3..n-1 the
/// fragment's own capture groups in order, and group n the right guard.
/// `replacer::MatchParts` relies on this layout.
///
/// Guards always use the *global* bypass delimiter; a per-substitution
/// `bypass` override participates in validation only.
pub fn compile(
    fragment: &str,
    options: &ResolvedOptions,
    global_bypass: char,
) -> Result<Regex, TextsubError> {
    let source = pattern_source(fragment, global_bypass, options.isolated_word);
    debug!(
        "Compiling search pattern {:?} (case_insensitive: {})",
        source, options.flags.case_insensitive
    );

    let regex = RegexBuilder::new(&source)
        .case_insensitive(options.flags.case_insensitive)
        .build()?;
    Ok(regex)
}

/// Assembles the pattern text. The fragment is interpolated as a pattern
/// fragment, not escaped; only the bypass delimiter is escaped.
fn pattern_source(fragment: &str, bypass: char, isolated_word: bool) -> String {
    let guard = format!("((?!{}))", regex::escape(&bypass.to_string()));
    if isolated_word {
        format!(r"\b{}({}){}\b", guard, fragment, guard)
    } else {
        format!("{}({}){}", guard, fragment, guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(isolated_word: bool, case_sensitive: bool) -> ResolvedOptions {
        let mut options = ResolvedOptions::default();
        options.isolated_word = isolated_word;
        options.case_sensitive = case_sensitive;
        options.flags.case_insensitive = !case_sensitive;
        options
    }

    #[test]
    fn test_pattern_source_shapes() {
        assert_eq!(
            pattern_source("cat", '|', true),
            r"\b((?!\|))(cat)((?!\|))\b"
        );
        assert_eq!(pattern_source("cat", '|', false), r"((?!\|))(cat)((?!\|))");
    }

    #[test]
    fn test_isolated_word_rejects_partial_word_matches() {
        let regex = compile("cat", &opts(true, false), '|').unwrap();
        assert!(!regex.is_match("concatenate").unwrap());
        assert!(regex.is_match("a cat sat").unwrap());
    }

    #[test]
    fn test_non_isolated_matches_inside_words() {
        let regex = compile("cat", &opts(false, false), '|').unwrap();
        assert!(regex.is_match("concatenate").unwrap());
    }

    #[test]
    fn test_case_insensitive_by_default_sensitive_on_request() {
        let insensitive = compile("Hello", &opts(true, false), '|').unwrap();
        assert!(insensitive.is_match("hello").unwrap());

        let sensitive = compile("Hello", &opts(true, true), '|').unwrap();
        assert!(!sensitive.is_match("hello").unwrap());
        assert!(sensitive.is_match("Hello").unwrap());
    }

    #[test]
    fn test_guard_refuses_match_followed_by_bypass_delimiter() {
        let regex = compile("this", &opts(true, false), '|').unwrap();
        assert!(!regex.is_match("keep |this| safe").unwrap());
        assert!(regex.is_match("keep this safe").unwrap());
    }

    #[test]
    fn test_group_layout_is_guard_primary_extras_guard() {
        let regex = compile("(foo)-(bar)", &opts(true, false), '|').unwrap();
        let caps = regex.captures("foo-bar").unwrap().unwrap();
        assert_eq!(caps.len(), 6);
        assert_eq!(caps.get(1).map(|m| m.as_str()), Some(""));
        assert_eq!(caps.get(2).map(|m| m.as_str()), Some("foo-bar"));
        assert_eq!(caps.get(3).map(|m| m.as_str()), Some("foo"));
        assert_eq!(caps.get(4).map(|m| m.as_str()), Some("bar"));
        assert_eq!(caps.get(5).map(|m| m.as_str()), Some(""));
    }

    #[test]
    fn test_bypass_delimiter_is_escaped_in_guards() {
        // '.' would otherwise be a wildcard inside the lookahead
        let regex = compile("cat", &opts(true, false), '.').unwrap();
        assert!(!regex.is_match("a cat. sat").unwrap());
        assert!(regex.is_match("a cat sat").unwrap());
    }
}
