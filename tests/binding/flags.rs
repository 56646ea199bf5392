//! Integration tests for the special-flag resolver

use ddf_binding::{FlagDef, FlagResult, apply_flag, resolve_flag};
use ddf_foundation::{Diagnostics, ErrorKind, LoadConfig};

const SOLID: u32 = 1;
const NOGRAVITY: u32 = 2;
const FLOAT: u32 = 4;

const TABLE: &[FlagDef] = &[
    FlagDef::new("SOLID", SOLID),
    FlagDef::new("NOGRAVITY", NOGRAVITY),
    FlagDef::negative("GRAVITY", NOGRAVITY),
    FlagDef::new("FLOAT", FLOAT),
];

#[test]
fn exact_names() {
    assert_eq!(resolve_flag("solid", TABLE, true, false), FlagResult::Positive(SOLID));
    assert_eq!(resolve_flag("No Gravity", TABLE, true, false), FlagResult::Positive(NOGRAVITY));
    assert_eq!(resolve_flag("GRAVITY", TABLE, true, false), FlagResult::Negative(NOGRAVITY));
}

#[test]
fn prefixes() {
    assert_eq!(resolve_flag("ENABLE_FLOAT", TABLE, true, false), FlagResult::Positive(FLOAT));
    assert_eq!(resolve_flag("NOT_SOLID", TABLE, true, false), FlagResult::Negative(SOLID));
    assert_eq!(resolve_flag("DISABLE_FLOAT", TABLE, true, false), FlagResult::Negative(FLOAT));
    assert_eq!(resolve_flag("NOT_SOLID", TABLE, false, false), FlagResult::Unknown);
}

#[test]
fn prefix_negation_cancels_a_negative_flag() {
    assert_eq!(
        resolve_flag("DISABLE_GRAVITY", TABLE, true, false),
        FlagResult::Positive(NOGRAVITY)
    );
    assert_eq!(
        resolve_flag("ENABLE_GRAVITY", TABLE, true, false),
        FlagResult::Negative(NOGRAVITY)
    );
}

#[test]
fn user_prefix_only_when_allowed() {
    assert_eq!(resolve_flag("USER_FLOAT", TABLE, true, true), FlagResult::User(FLOAT));
    assert_eq!(resolve_flag("USER_FLOAT", TABLE, true, false), FlagResult::Unknown);
}

#[test]
fn apply_accumulates() {
    let mut diag = Diagnostics::new(LoadConfig::strict());
    let mut bits = 0;
    for name in ["SOLID", "FLOAT", "NOGRAVITY", "GRAVITY"] {
        apply_flag(name, TABLE, &mut bits, &mut diag).unwrap();
    }
    assert_eq!(bits, SOLID | FLOAT);
}

#[test]
fn unknown_flags_follow_the_policy() {
    let mut bits = SOLID;
    let mut strict = Diagnostics::new(LoadConfig::strict());
    let err = apply_flag("SHINY", TABLE, &mut bits, &mut strict).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownFlag("SHINY".into()));

    let mut lax = Diagnostics::new(LoadConfig::lax().with_log_warnings(false));
    apply_flag("SHINY", TABLE, &mut bits, &mut lax).unwrap();
    assert_eq!(bits, SOLID);
    assert_eq!(lax.warning_count(), 1);
}
