use super::*;
use pretty_assertions::assert_eq;

const MANIFEST: &str = "\
title=Hello World\r
# comment=ignored
major_version = 1

no_equals_sign
empty_value=
=no_key
splash_screen_hd=pkg:/images/splash=hd.png
";

#[test]
fn parses_key_value_lines() {
    let manifest = Manifest::parse(MANIFEST);
    assert_eq!(manifest.get("title"), Some("Hello World"));
    assert_eq!(manifest.get("major_version"), Some("1"));
    assert_eq!(manifest.len(), 3);
}

#[test]
fn value_keeps_later_equals_signs() {
    let manifest = Manifest::parse(MANIFEST);
    assert_eq!(manifest.get("splash_screen_hd"), Some("pkg:/images/splash=hd.png"));
}

#[test]
fn skips_comments_and_malformed_lines() {
    let manifest = Manifest::parse(MANIFEST);
    assert_eq!(manifest.get("# comment"), None);
    assert_eq!(manifest.get("no_equals_sign"), None);
    assert_eq!(manifest.get("empty_value"), None);
    assert_eq!(manifest.get(""), None);
}

#[test]
fn lookups_ignore_case_and_keep_spelling() {
    let manifest = Manifest::parse("Bs_Const=debug=true\n");
    assert_eq!(manifest.get("BS_CONST"), Some("debug=true"));
    let keys: Vec<&str> = manifest.entries().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["Bs_Const"]);
}

#[test]
fn repeated_key_keeps_last_value() {
    let manifest = Manifest::parse("a=1\nA=2\n");
    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest.get("a"), Some("2"));
}

#[test]
fn single_key_events_defaults_on() {
    assert!(Manifest::new().single_key_events());
    assert!(Manifest::parse("multi_key_events=0").single_key_events());
    assert!(!Manifest::parse("multi_key_events = 1").single_key_events());
}
