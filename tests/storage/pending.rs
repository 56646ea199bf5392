//! Integration tests for PendingRefs
//!
//! Tests the record-then-resolve cycle for forward references.

use ddf_foundation::{ErrorContext, ErrorKind};
use ddf_storage::PendingRefs;

#[test]
fn resolves_in_recording_order() {
    let mut refs = PendingRefs::new();
    refs.record("BLOOD", "blood", "imp", ErrorContext::new());
    refs.record("PUFF", "puff", "shotgun", ErrorContext::new());

    let names = ["PUFF", "BLOOD"];
    let resolved = refs
        .resolve_all(|name, _| names.iter().position(|n| *n == name))
        .unwrap();
    assert_eq!(resolved, vec![("imp", 1), ("shotgun", 0)]);
}

#[test]
fn first_failure_carries_its_context() {
    let mut refs = PendingRefs::new();
    refs.record(
        "MISSING",
        "spawned object",
        0u8,
        ErrorContext::new().with_file("attacks.ddf").with_line(12),
    );
    let err = refs.resolve_all(|_, _| None).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnresolvedReference {
            name: "MISSING".into(),
            purpose: "spawned object".into(),
        }
    );
    assert_eq!(err.context.and_then(|c| c.line), Some(12));
}

#[test]
fn discard_by_key() {
    let mut refs = PendingRefs::new();
    refs.record("A", "thing", (0, 'x'), ErrorContext::new());
    refs.record("B", "thing", (1, 'x'), ErrorContext::new());
    refs.record("C", "thing", (0, 'y'), ErrorContext::new());
    refs.discard(|(index, _)| *index == 0);
    assert_eq!(refs.len(), 1);
    assert!(!refs.is_empty());
}
