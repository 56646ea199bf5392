//! Integration tests for Layer 1: Storage
//!
//! Tests for definition containers, the numeric lookup cache, and deferred
//! cross-domain references.

mod pending;
