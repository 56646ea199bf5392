//! Integration tests for the name comparator and interner
//!
//! The comparator must ignore case, spaces, and underscores everywhere.

use ddf_foundation::{Interner, compare_names, names_match, normalize_name};
use proptest::prelude::*;
use std::cmp::Ordering;

// =============================================================================
// Comparator
// =============================================================================

#[test]
fn same_identifier_three_spellings() {
    assert!(names_match("FIRE_BALL", "Fireball"));
    assert!(names_match("Fireball", "fire ball"));
    assert!(names_match("fire ball", "FIRE_BALL"));
}

#[test]
fn different_identifiers() {
    assert!(!names_match("IMP", "IMPS"));
    assert_eq!(compare_names("IMP", "IMPS"), Ordering::Less);
}

/// Scatters spaces and underscores through a name and randomizes case.
fn respell(name: &str, seed: &[u8]) -> String {
    let mut out = String::new();
    for (i, c) in name.chars().enumerate() {
        let bits = seed.get(i % seed.len().max(1)).copied().unwrap_or(0);
        match bits % 3 {
            0 => out.push(' '),
            1 => out.push('_'),
            _ => {}
        }
        if bits & 4 == 0 {
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c.to_ascii_uppercase());
        }
    }
    out
}

proptest! {
    #[test]
    fn respelling_never_changes_identity(name in "[A-Z0-9]{1,12}", seed in prop::collection::vec(any::<u8>(), 1..12)) {
        let spelled = respell(&name, &seed);
        prop_assert!(names_match(&name, &spelled));
        prop_assert_eq!(normalize_name(&spelled), name);
    }

    #[test]
    fn comparator_is_antisymmetric(a in "[A-Za-z _]{0,8}", b in "[A-Za-z _]{0,8}") {
        prop_assert_eq!(compare_names(&a, &b), compare_names(&b, &a).reverse());
    }
}

// =============================================================================
// Interner
// =============================================================================

#[test]
fn interner_folds_spellings() {
    let mut interner = Interner::new();
    let a = interner.intern("POSS");
    let b = interner.intern("p o s s");
    let c = interner.intern("SARG");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 2);
    assert_eq!(interner.resolve(c), Some("SARG"));
    assert_eq!(interner.get("sarg"), Some(c));
    assert_eq!(interner.get("TROO"), None);
}
