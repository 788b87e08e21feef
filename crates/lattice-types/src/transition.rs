//! Rule-table rows pairing a neighborhood with its successor state.

use serde::{Deserialize, Serialize};

use crate::combination::Combination;
use crate::state::State;

/// An immutable pairing of a [`Combination`] with the resulting next
/// state. One transition is one row of the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The neighborhood this transition fires on.
    combination: Combination,
    /// The state the reference cell assumes on the next row.
    next_state: State,
}

impl Transition {
    /// Create a transition from a combination and its successor state.
    pub const fn new(combination: Combination, next_state: State) -> Self {
        Self {
            combination,
            next_state,
        }
    }

    /// Return the neighborhood this transition fires on.
    pub const fn combination(&self) -> &Combination {
        &self.combination
    }

    /// Return the successor state.
    pub const fn next_state(&self) -> &State {
        &self.next_state
    }
}
