//! engine.rs - Orchestration of the substitution pipeline.
//!
//! The engine folds the ordered substitution list over the working text:
//! each rule resolves its options, compiles a guarded pattern (unless it
//! carries a raw pattern), and splices its replacements into the output of
//! all earlier rules. A single bypass-stripping pass then removes the
//! delimiters of bypass regions from the final text.
//!
//! Every call is independent and reentrant; no state survives a call.
//!
//! License: MIT OR Apache-2.0

use log::debug;

use crate::compiler;
use crate::config::{resolve, Config, OptionOverrides, ResolvedOptions, SearchTerm, Substitution};
use crate::errors::TextsubError;
use crate::replacer::{MatchParts, Replacer};

/// Applies every substitution in `config` to `text`, in order, then strips
/// bypass delimiters.
///
/// Later rules see the output of earlier rules; this sequential composition
/// is part of the contract, not an implementation accident. A failure at any
/// step (invalid bypass override, pattern compilation, match-time engine
/// error) aborts the whole call with no partial result.
///
/// # Errors
///
/// [`TextsubError::InvalidBypassConfiguration`] when the global options or
/// any per-substitution override carry a `bypass` value that is not exactly
/// one character; pattern-engine failures are propagated untranslated.
pub fn replace(text: &str, config: &Config) -> Result<String, TextsubError> {
    let globals = resolve(&config.options, None)?;
    debug!("Applying {} substitution(s)", config.subs.len());

    let mut current = text.to_owned();
    for (index, sub) in config.subs.iter().enumerate() {
        current = apply_substitution(&current, sub, &globals, index)?;
    }

    strip_bypass(&current, globals.bypass)
}

fn apply_substitution(
    text: &str,
    sub: &Substitution,
    globals: &ResolvedOptions,
    index: usize,
) -> Result<String, TextsubError> {
    match &sub.search {
        SearchTerm::Raw(regex) => {
            debug!("Substitution {}: raw pattern {:?}", index, regex.as_str());
            apply_raw(regex, text, &sub.replace)
        }
        SearchTerm::Literal(fragment) => {
            debug!("Substitution {}: fragment {:?}", index, fragment);
            let default_overrides = OptionOverrides::default();
            let overrides = sub.options.as_ref().unwrap_or(&default_overrides);
            let options = resolve(overrides, Some(globals))?;

            let regex = compiler::compile(fragment, &options, globals.bypass)?;
            let replacer = Replacer::select(&sub.replace, &options);
            apply_literal(&regex, text, &replacer)
        }
    }
}

/// Splices the strategy's replacement over every match of a guarded pattern.
fn apply_literal(
    regex: &fancy_regex::Regex,
    text: &str,
    replacer: &Replacer,
) -> Result<String, TextsubError> {
    let mut output = String::with_capacity(text.len());
    let mut last_end = 0;

    for caps in regex.captures_iter(text) {
        let caps = caps?;
        let Some(whole) = caps.get(0) else { continue };
        let parts = MatchParts::from_captures(&caps);
        output.push_str(&text[last_end..whole.start()]);
        output.push_str(&replacer.apply(&parts));
        last_end = whole.end();
    }

    output.push_str(&text[last_end..]);
    Ok(output)
}

/// Applies a raw pattern with the engine's native capture expansion. The
/// option/guard pipeline is deliberately not involved.
fn apply_raw(
    regex: &fancy_regex::Regex,
    text: &str,
    replace: &str,
) -> Result<String, TextsubError> {
    let mut output = String::with_capacity(text.len());
    let mut last_end = 0;

    for caps in regex.captures_iter(text) {
        let caps = caps?;
        let Some(whole) = caps.get(0) else { continue };
        output.push_str(&text[last_end..whole.start()]);
        caps.expand(replace, &mut output);
        last_end = whole.end();
    }

    output.push_str(&text[last_end..]);
    Ok(output)
}

/// Removes bypass delimiters, leaving the delimited content intact.
///
/// Matches the shortest span between two delimiter occurrences,
/// case-insensitively and globally. Runs once, after all substitutions, with
/// the *global* bypass character.
pub fn strip_bypass(text: &str, bypass: char) -> Result<String, TextsubError> {
    let delimiter = regex::escape(&bypass.to_string());
    let pattern = format!("(?i){}(.+?){}", delimiter, delimiter);
    let regex = regex::Regex::new(&pattern)?;
    Ok(regex.replace_all(text, "$1").into_owned())
}
