//! Grid cells holding a state and the transition that produced it.

use serde::{Deserialize, Serialize};

use crate::state::State;
use crate::transition::Transition;

/// One slot of the grid.
///
/// A cell built from a [`Transition`] derives its state from the
/// transition's successor; a cell built directly from a [`State`] (used
/// only for the initial condition) carries no transition. Immutable after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The state this cell holds.
    state: State,
    /// The transition that produced this cell, absent for initial cells.
    transition: Option<Transition>,
}

impl Cell {
    /// Create a cell directly from a state, with no producing transition.
    pub const fn from_state(state: State) -> Self {
        Self {
            state,
            transition: None,
        }
    }

    /// Create a cell from the transition that produced it; the cell's
    /// state is the transition's successor state.
    pub fn from_transition(transition: Transition) -> Self {
        Self {
            state: transition.next_state().clone(),
            transition: Some(transition),
        }
    }

    /// Return the state this cell holds.
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Return the transition that produced this cell, if any.
    pub const fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }
}
