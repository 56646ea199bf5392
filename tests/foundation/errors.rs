//! Integration tests for Error types
//!
//! Tests error construction, display, context, and the recoverable split.

use ddf_foundation::{Error, ErrorContext, ErrorKind, Unterminated};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_not_numeric() {
    let err = Error::not_numeric("FAST");
    assert!(matches!(err.kind, ErrorKind::NotNumeric(_)));
    assert!(format!("{err}").contains("FAST"));
}

#[test]
fn error_out_of_range() {
    let err = Error::out_of_range("percentage", "150%");
    assert!(matches!(err.kind, ErrorKind::OutOfRange { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("percentage"));
    assert!(msg.contains("150%"));
}

#[test]
fn error_unresolved_reference() {
    let err = Error::unresolved("ROCKET", "spawned object");
    let msg = format!("{err}");
    assert!(msg.contains("ROCKET"));
    assert!(msg.contains("spawned object"));
}

#[test]
fn error_unterminated() {
    let err = Error::unterminated(Unterminated::Comment);
    assert_eq!(err.kind, ErrorKind::Unterminated(Unterminated::Comment));
    assert!(format!("{err}").contains("comment"));
}

#[test]
fn error_from_kind() {
    let err: Error = ErrorKind::ClearAllMidFile.into();
    assert!(err.context.is_none());
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn display_includes_location_and_line_text() {
    let err = Error::unknown_flag("FLOATY").with_context(
        ErrorContext::new()
            .with_file("things.ddf")
            .with_line(42)
            .with_entry("CACODEMON")
            .with_line_text("SPECIAL = FLOATY;   "),
    );
    let msg = format!("{err}");
    assert!(msg.contains("FLOATY"));
    assert!(msg.contains("at things.ddf:42"));
    assert!(msg.contains("[CACODEMON]"));
    assert!(msg.ends_with("| SPECIAL = FLOATY;"));
}

#[test]
fn display_without_file() {
    let err = Error::syntax("stray ']'").with_context(ErrorContext::new().with_line(7));
    assert!(format!("{err}").contains("at line 7"));
}

#[test]
fn display_without_context() {
    let err = Error::bad_state("empty item");
    assert_eq!(format!("{err}"), "bad state: empty item");
}

// =============================================================================
// Recoverable Kinds
// =============================================================================

#[test]
fn warn_or_fatal_family() {
    assert!(Error::unknown_field("X").is_recoverable());
    assert!(Error::unknown_flag("X").is_recoverable());
    assert!(Error::out_of_range("percentage", "X").is_recoverable());
    assert!(Error::new(ErrorKind::UnknownAction("X".into())).is_recoverable());
}

#[test]
fn always_fatal_family() {
    assert!(!Error::syntax("X").is_recoverable());
    assert!(!Error::unknown_label("X").is_recoverable());
    assert!(!Error::unresolved("X", "thing").is_recoverable());
    assert!(!Error::unterminated(Unterminated::String).is_recoverable());
    assert!(!Error::new(ErrorKind::ClearAllMidFile).is_recoverable());
}
