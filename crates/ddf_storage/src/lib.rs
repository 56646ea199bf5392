//! Definition containers and deferred cross-domain references for DDF.
//!
//! This crate provides:
//! - [`DefinitionContainer`] - Name-addressed definitions for one domain
//! - [`NumericContainer`] - Number-addressed definitions with a lookup cache
//! - [`PendingRefs`] - Two-phase name references resolved after loading

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod container;
pub mod numeric;
pub mod pending;

pub use container::{DefinitionContainer, Named};
pub use numeric::{CACHE_SIZE, NumericContainer, Numbered};
pub use pending::{Pending, PendingRefs};
