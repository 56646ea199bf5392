//! Integration tests for Layer 4: States
//!
//! Tests state groups built from DDF text through the file driver.

mod pipeline;
