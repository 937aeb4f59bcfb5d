// textsub/tests/substitution_integration_tests.rs
//! End-to-end tests for the substitution engine's public API.

use anyhow::Result;
use test_log::test;

use textsub::{replace, Config, OptionOverrides, Substitution, TextsubError};

fn config_with(subs: Vec<Substitution>) -> Config {
    Config {
        options: OptionOverrides::default(),
        subs,
    }
}

#[test]
fn test_bypass_round_trip() -> Result<()> {
    let config = config_with(vec![Substitution::new("this", "that")]);
    let output = replace("say this, keep |this| safe", &config)?;
    assert_eq!(output, "say that, keep this safe");
    Ok(())
}

#[test]
fn test_bypass_region_with_custom_delimiter() -> Result<()> {
    let config = Config {
        options: OptionOverrides {
            bypass: Some("~".to_string()),
            ..Default::default()
        },
        subs: vec![Substitution::new("this", "that")],
    };
    let output = replace("keep ~this~ safe", &config)?;
    assert_eq!(output, "keep this safe");
    Ok(())
}

#[test]
fn test_case_preserving_replacement() -> Result<()> {
    let config = config_with(vec![Substitution::new("cat", "dog")]);
    assert_eq!(replace("Cat CAT cat", &config)?, "Dog DOG dog");
    Ok(())
}

#[test]
fn test_case_preservation_handles_unicode() -> Result<()> {
    let config = config_with(vec![Substitution::new("über", "mega")]);
    assert_eq!(replace("Über über", &config)?, "Mega mega");
    Ok(())
}

#[test]
fn test_backreference_substitution() -> Result<()> {
    let config = config_with(vec![Substitution::new("(foo)-(bar)", "$2-$1")]);
    assert_eq!(replace("foo-bar", &config)?, "bar-foo");
    Ok(())
}

#[test]
fn test_word_isolation_on_and_off() -> Result<()> {
    let isolated = config_with(vec![Substitution::new("cat", "dog")]);
    assert_eq!(replace("concatenate", &isolated)?, "concatenate");

    let partial = config_with(vec![Substitution::new("cat", "dog").with_options(
        OptionOverrides {
            isolated_word: Some(false),
            ..Default::default()
        },
    )]);
    assert_eq!(replace("concatenate", &partial)?, "condogenate");
    Ok(())
}

#[test]
fn test_rules_compose_sequentially() -> Result<()> {
    let config = config_with(vec![
        Substitution::new("a", "b"),
        Substitution::new("b", "c"),
    ]);
    // the second rule sees the first rule's output
    assert_eq!(replace("a", &config)?, "c");
    Ok(())
}

#[test]
fn test_case_insensitive_by_default() -> Result<()> {
    let config = config_with(vec![Substitution::new("Hello", "Hi")]);
    assert_eq!(replace("hello", &config)?, "hi");
    Ok(())
}

#[test]
fn test_case_sensitive_when_requested() -> Result<()> {
    let config = Config {
        options: OptionOverrides {
            case_sensitive: Some(true),
            ..Default::default()
        },
        subs: vec![Substitution::new("Hello", "Hi")],
    };
    assert_eq!(replace("hello", &config)?, "hello");
    assert_eq!(replace("Hello", &config)?, "Hi");
    Ok(())
}

#[test]
fn test_per_sub_options_override_globals() -> Result<()> {
    let config = Config {
        options: OptionOverrides {
            case_sensitive: Some(true),
            ..Default::default()
        },
        subs: vec![Substitution::new("hello", "hi").with_options(OptionOverrides {
            case_sensitive: Some(false),
            ..Default::default()
        })],
    };
    assert_eq!(replace("HELLO", &config)?, "HI");
    Ok(())
}

#[test]
fn test_match_case_disabled_emits_literal_replacement() -> Result<()> {
    let config = config_with(vec![Substitution::new("cat", "Dog").with_options(
        OptionOverrides {
            match_case: Some(false),
            ..Default::default()
        },
    )]);
    assert_eq!(replace("CAT", &config)?, "Dog");
    Ok(())
}

#[test]
fn test_raw_pattern_skips_guards_and_case_matching() -> Result<()> {
    let pattern = fancy_regex::Regex::new(r"(?i)\bcat\b")?;
    let config = config_with(vec![Substitution::raw(pattern, "dog")]);
    // no bypass guard, no case preservation: both occurrences become "dog"
    assert_eq!(replace("Cat |cat|", &config)?, "dog dog");
    Ok(())
}

#[test]
fn test_raw_pattern_uses_native_capture_expansion() -> Result<()> {
    let pattern = fancy_regex::Regex::new(r"(\w+)@(\w+)")?;
    let config = config_with(vec![Substitution::raw(pattern, "$2.$1")]);
    assert_eq!(replace("user@host", &config)?, "host.user");
    Ok(())
}

#[test]
fn test_per_sub_bypass_override_does_not_leak() -> Result<()> {
    // the override is validated but guards and stripping keep the global delimiter
    let config = config_with(vec![Substitution::new("x", "y").with_options(
        OptionOverrides {
            bypass: Some("#".to_string()),
            ..Default::default()
        },
    )]);
    assert_eq!(replace("x |keep|", &config)?, "y keep");
    Ok(())
}

#[test]
fn test_invalid_global_bypass_aborts() {
    let config = Config {
        options: OptionOverrides {
            bypass: Some("||".to_string()),
            ..Default::default()
        },
        subs: vec![Substitution::new("a", "b")],
    };
    assert!(matches!(
        replace("a", &config),
        Err(TextsubError::InvalidBypassConfiguration(_))
    ));
}

#[test]
fn test_invalid_per_sub_bypass_aborts() {
    let config = config_with(vec![Substitution::new("a", "b").with_options(
        OptionOverrides {
            bypass: Some("ab".to_string()),
            ..Default::default()
        },
    )]);
    assert!(matches!(
        replace("a", &config),
        Err(TextsubError::InvalidBypassConfiguration(_))
    ));
}

#[test]
fn test_valid_configs_never_fail() -> Result<()> {
    let configs = vec![
        config_with(vec![]),
        config_with(vec![Substitution::new("x", "")]),
        config_with(vec![Substitution::new(r"\d+", "N")]),
        Config {
            options: OptionOverrides {
                bypass: Some("#".to_string()),
                case_sensitive: Some(true),
                match_case: Some(false),
                isolated_word: Some(false),
            },
            subs: vec![Substitution::new("x", "y"), Substitution::new("y", "z")],
        },
    ];
    for config in &configs {
        assert!(replace("some #input# text 123", config).is_ok());
    }
    Ok(())
}

#[test]
fn test_calls_are_independent() -> Result<()> {
    let first = Config {
        options: OptionOverrides {
            bypass: Some("#".to_string()),
            ..Default::default()
        },
        subs: vec![Substitution::new("cat", "dog")],
    };
    let second = config_with(vec![Substitution::new("cat", "dog")]);

    assert_eq!(replace("#cat# cat", &first)?, "cat dog");
    // the previous call's bypass delimiter must not survive into this one
    assert_eq!(replace("#cat# cat", &second)?, "#dog# dog");
    Ok(())
}
