//! Sample content domains and the load orchestrator for DDF.
//!
//! This crate provides:
//! - [`things`] - `<THINGS>` with special flags, damage and state groups
//! - [`attacks`] - `<ATTACKS>` with names resolved against things after load
//! - [`lines`] - Numeric-keyed `<LINES>`
//! - [`TextSource`] - Where file text comes from ([`MemorySource`], [`DirectorySource`])
//! - [`Loader`] - Loads every domain in dependency order and resolves references

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod attacks;
pub mod damage;
pub mod lines;
pub mod loader;
pub mod source;
pub mod things;

pub use attacks::{AttackDefinition, AttackReader, AttackSlot, AttackStyle, attack_fields};
pub use damage::{DamageInfo, damage_fields};
pub use lines::{LineReader, LineType, PlaneMover, line_fields};
pub use loader::{Domain, LoadReport, Loader};
pub use source::{DirectorySource, MemorySource, TextSource};
pub use things::{THING_ACTIONS, THING_FLAGS, ThingDefinition, ThingReader, thing_fields};
