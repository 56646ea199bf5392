//! The global state arena and per-record state groups.

use ddf_foundation::{Interner, names_match};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::state::{Frame, SpriteId, State, StateIndex};

/// A labelled run of consecutive states.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateRange {
    /// The label from `STATES(LABEL)`.
    pub label: String,
    /// First state of the run.
    pub first: StateIndex,
    /// Number of states in the run; 0 for an alias (`STATES(X) = #Y;`),
    /// whose `first` is the null state until the group resolves it to the
    /// target.
    pub count: usize,
}

impl StateRange {
    /// Returns the last state of the run, if it has any.
    #[must_use]
    pub fn last(&self) -> Option<StateIndex> {
        (self.count > 0).then(|| StateIndex::new(self.first.get() + self.count - 1))
    }

    /// Returns true if `index` lies inside the run.
    #[must_use]
    pub fn contains(&self, index: StateIndex) -> bool {
        (self.first.get()..self.first.get() + self.count).contains(&index.get())
    }
}

/// The labelled ranges owned by one record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateGroup {
    ranges: Vec<StateRange>,
}

impl StateGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ranges in definition order.
    #[must_use]
    pub fn ranges(&self) -> &[StateRange] {
        &self.ranges
    }

    pub(crate) fn ranges_mut(&mut self) -> &mut Vec<StateRange> {
        &mut self.ranges
    }

    /// Returns true if the group has no ranges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Finds a range by label, most recently defined first.
    #[must_use]
    pub fn find_range(&self, label: &str) -> Option<&StateRange> {
        self.ranges.iter().rev().find(|r| names_match(&r.label, label))
    }

    /// Returns the first state of the labelled range.
    #[must_use]
    pub fn find_label(&self, label: &str) -> Option<StateIndex> {
        self.find_range(label).map(|r| r.first)
    }
}

/// Owner of every state built during a load.
///
/// Slot 0 always holds the null state, so a zero [`StateIndex`] never
/// refers to a real frame.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateArena {
    states: Vec<State>,
    sprites: Interner,
}

impl Default for StateArena {
    fn default() -> Self {
        Self::new()
    }
}

impl StateArena {
    /// Creates an arena holding only the null state.
    #[must_use]
    pub fn new() -> Self {
        let mut sprites = Interner::new();
        let null_sprite = sprites.intern("NULL");
        let null = State::new(null_sprite, Frame::Sprite(0), -1, 0);
        Self {
            states: vec![null],
            sprites,
        }
    }

    /// Appends a state.
    pub fn push(&mut self, state: State) -> StateIndex {
        let index = StateIndex::new(self.states.len());
        self.states.push(state);
        index
    }

    /// Returns the index the next pushed state will get.
    #[must_use]
    pub fn next_index(&self) -> StateIndex {
        StateIndex::new(self.states.len())
    }

    /// Returns a state.
    #[must_use]
    pub fn get(&self, index: StateIndex) -> Option<&State> {
        self.states.get(index.get())
    }

    /// Returns a state mutably.
    pub fn get_mut(&mut self, index: StateIndex) -> Option<&mut State> {
        self.states.get_mut(index.get())
    }

    /// Returns the number of slots, including the null state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if only the null state exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.len() <= 1
    }

    /// Interns a sprite name.
    pub fn intern_sprite(&mut self, name: &str) -> SpriteId {
        self.sprites.intern(name)
    }

    /// Returns the canonical name of a sprite.
    #[must_use]
    pub fn sprite_name(&self, id: SpriteId) -> Option<&str> {
        self.sprites.resolve(id)
    }

    /// Returns the sprite interner.
    #[must_use]
    pub fn sprites(&self) -> &Interner {
        &self.sprites
    }

    /// Finds a label within a group.
    #[must_use]
    pub fn find_label(&self, group: &StateGroup, label: &str) -> Option<StateIndex> {
        group
            .find_label(label)
            .filter(|index| index.get() < self.states.len())
    }

    /// Follows `next` links from `start`, returning at most `limit` states.
    ///
    /// Useful for checking how a sequence plays out.
    #[must_use]
    pub fn walk(&self, start: StateIndex, limit: usize) -> Vec<StateIndex> {
        let mut out = Vec::new();
        let mut current = start;
        while !current.is_null() && out.len() < limit {
            let Some(state) = self.get(current) else {
                break;
            };
            out.push(current);
            current = state.next_state();
        }
        out
    }
}
