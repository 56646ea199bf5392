//! State records.

use std::fmt;

use ddf_foundation::NameId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interned sprite name.
pub type SpriteId = NameId;

/// Typed index into the [`StateArena`](crate::StateArena).
///
/// Index 0 is the null state: "no state" / "remove the object".
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateIndex(u32);

impl StateIndex {
    /// The null state.
    pub const NULL: Self = Self(0);

    /// Wraps a raw arena slot.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit in 32 bits.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("state index overflow"))
    }

    /// Returns the arena slot.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// Returns true for the null state.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for StateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "S_NULL")
        } else {
            write!(f, "S{}", self.0)
        }
    }
}

/// Which picture a state shows.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Frame {
    /// Sprite frame letter, 0 for `A`.
    Sprite(u8),
    /// `@N`: model frame by number.
    ModelNumber(i32),
    /// `@name`: model frame by name.
    ModelName(String),
}

/// Argument attached to a state's action.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActionArg {
    /// No argument.
    #[default]
    None,
    /// An integer.
    Numeric(i32),
    /// A float.
    Float(f32),
    /// A percentage, already divided by 100.
    Percent(f32),
    /// Free text (usually a name resolved by the simulation).
    String(String),
    /// A jump: the target is stored in the state's `jump` field.
    Jump {
        /// Probability of taking the jump, `0..=1`.
        chance: f32,
    },
}

/// An action invoked when a state is entered.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionCall {
    /// Canonical action name from the action table.
    pub name: String,
    /// Parsed argument.
    pub arg: ActionArg,
}

/// Special tics value: stay in this state forever.
pub const TICS_FOREVER: i32 = -1;

/// One animation/logic frame.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct State {
    /// Sprite name.
    pub sprite: SpriteId,
    /// Frame within the sprite (or model).
    pub frame: Frame,
    /// Duration in tics, [`TICS_FOREVER`] for no timeout.
    pub tics: i32,
    /// Light level, 0 (normal) to 255 (fully bright).
    pub bright: u8,
    /// Action run on entering the state.
    pub action: Option<ActionCall>,
    /// Raw next link (see [`StateEngine`](crate::StateEngine) for encoding).
    pub(crate) next: i32,
    /// Raw jump link.
    pub(crate) jump: i32,
}

impl State {
    /// Creates a state that falls through to the next slot.
    #[must_use]
    pub fn new(sprite: SpriteId, frame: Frame, tics: i32, bright: u8) -> Self {
        Self {
            sprite,
            frame,
            tics,
            bright,
            action: None,
            next: 0,
            jump: 0,
        }
    }

    /// The state that follows this one once resolved.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn next_state(&self) -> StateIndex {
        StateIndex(self.next.max(0) as u32)
    }

    /// The jump target once resolved (`NULL` if there is none).
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn jump_state(&self) -> StateIndex {
        StateIndex(self.jump.max(0) as u32)
    }

    /// Returns true if the state never times out.
    #[must_use]
    pub const fn is_forever(&self) -> bool {
        self.tics == TICS_FOREVER
    }
}
