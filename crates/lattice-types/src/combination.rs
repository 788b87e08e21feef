//! Ordered neighborhoods around a reference state.

use serde::{Deserialize, Serialize};

use crate::state::State;

/// An ordered neighborhood: one reference state plus its neighbor states.
///
/// A combination serves two roles: as the key side of a rule-table row,
/// and as a runtime query extracted from the grid. The neighborhood has a
/// fixed arity equal to the automaton's neighbor count (2 for classic 1-D
/// elementary automata: left then right). Neighborhoods compare
/// element-wise and order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    /// The state at the center of the neighborhood.
    reference: State,
    /// Neighbor states in spatial order.
    neighborhood: Vec<State>,
}

impl Combination {
    /// Create a combination from a reference state and its ordered
    /// neighbors.
    pub const fn new(reference: State, neighborhood: Vec<State>) -> Self {
        Self {
            reference,
            neighborhood,
        }
    }

    /// Return the reference state at the center of the neighborhood.
    pub const fn reference(&self) -> &State {
        &self.reference
    }

    /// Return the neighbor states in spatial order.
    pub fn neighborhood(&self) -> &[State] {
        &self.neighborhood
    }

    /// Return the number of neighbors (excluding the reference).
    pub fn arity(&self) -> usize {
        self.neighborhood.len()
    }

    /// Return the neighbor at the given position, if it exists.
    pub fn neighbor(&self, position: usize) -> Option<&State> {
        self.neighborhood.get(position)
    }
}
