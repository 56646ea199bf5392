//! Integration tests for Layer 0: Foundation
//!
//! Tests for errors, the name comparator, diagnostics, and interning.

mod errors;
mod names;
