//! Animation states and redirector resolution for DDF.
//!
//! This crate provides:
//! - [`StateArena`] - The single growing array of states, indexed by [`StateIndex`]
//! - [`StateGroup`] / [`StateRange`] - The labelled runs of states a record owns
//! - [`StateEngine`] - Reads `STATES(LABEL)` items and resolves `#LABEL` redirectors
//! - [`ActionTable`] - Per-domain action names and their argument kinds

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod arena;
pub mod engine;
pub mod state;

pub use action::{ActionCode, ActionTable, ArgKind};
pub use arena::{StateArena, StateGroup, StateRange};
pub use engine::{BRIGHT_FULL, BRIGHT_NORMAL, Redirector, StateEngine, lookup_label};
pub use state::{ActionArg, ActionCall, Frame, SpriteId, State, StateIndex, TICS_FOREVER};
