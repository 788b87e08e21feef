//! The shipped concrete instance: 1-D elementary automata.
//!
//! An elementary automaton has a binary alphabet and 3-cell neighborhoods
//! (left, self, right), giving 256 possible rules. A Wolfram rule number
//! encodes the whole table: bit `left << 2 | self << 1 | right` of the
//! code is the successor for that neighborhood.

use lattice_types::{Cell, Combination, State, Transition};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::rule::Rule;

/// Number of distinct 3-cell binary neighborhoods.
const NEIGHBORHOOD_COUNT: u8 = 8;

/// The canonical "white" (off) state, value 0.
pub fn white() -> State {
    State::new("white", 0)
}

/// The canonical "black" (on) state, value 1.
pub fn black() -> State {
    State::new("black", 1)
}

/// Map a bit to its canonical state: `false` is white, `true` is black.
pub fn state_for_bit(bit: bool) -> State {
    if bit { black() } else { white() }
}

/// Decode a Wolfram rule number into its full 8-row rule table.
///
/// The neighborhood order inside each combination is left neighbor, then
/// right neighbor, with the center cell as the reference.
pub fn rule(code: u8) -> Rule {
    let mut transitions = Vec::with_capacity(usize::from(NEIGHBORHOOD_COUNT));
    for index in 0..NEIGHBORHOOD_COUNT {
        let left = index & 0b100 != 0;
        let center = index & 0b010 != 0;
        let right = index & 0b001 != 0;
        let next = (code >> index) & 1 == 1;
        transitions.push(Transition::new(
            Combination::new(
                state_for_bit(center),
                vec![state_for_bit(left), state_for_bit(right)],
            ),
            state_for_bit(next),
        ));
    }
    // The 8 neighborhood indices are distinct by construction.
    Rule::from_distinct_transitions(transitions)
}

/// A row of `width` cells, all in the given state.
pub fn uniform_row(state: &State, width: usize) -> Vec<Cell> {
    (0..width)
        .map(|_| Cell::from_state(state.clone()))
        .collect()
}

/// An all-white row with a single black cell at the center.
pub fn single_black_row(width: usize) -> Vec<Cell> {
    let mut row = uniform_row(&white(), width);
    let center = width.checked_div(2).unwrap_or(0);
    if let Some(cell) = row.get_mut(center) {
        *cell = Cell::from_state(black());
    }
    row
}

/// A reproducible random binary row from a seed.
pub fn random_row(width: usize, seed: u64) -> Vec<Cell> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..width)
        .map(|_| Cell::from_state(state_for_bit(rng.random_bool(0.5))))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rule_table_has_eight_rows() {
        let rule_30 = rule(30);
        assert_eq!(rule_30.transition_count(), 8);
        assert_eq!(rule_30.reference_states().count(), 2);
    }

    #[test]
    fn rule_30_known_rows() {
        // 30 = 0b0001_1110: neighborhoods 1..=4 go black, the rest white.
        let rule_30 = rule(30);
        let all_black = Combination::new(black(), vec![black(), black()]);
        assert_eq!(
            rule_30.transition_for(&all_black).unwrap().next_state(),
            &white()
        );
        let lone_right = Combination::new(white(), vec![white(), black()]);
        assert_eq!(
            rule_30.transition_for(&lone_right).unwrap().next_state(),
            &black()
        );
        let all_white = Combination::new(white(), vec![white(), white()]);
        assert_eq!(
            rule_30.transition_for(&all_white).unwrap().next_state(),
            &white()
        );
    }

    #[test]
    fn rule_extremes() {
        let rule_0 = rule(0);
        let rule_255 = rule(255);
        let all_white = Combination::new(white(), vec![white(), white()]);
        assert_eq!(
            rule_0.transition_for(&all_white).unwrap().next_state(),
            &white()
        );
        assert_eq!(
            rule_255.transition_for(&all_white).unwrap().next_state(),
            &black()
        );
    }

    #[test]
    fn single_black_row_is_centered() {
        let row = single_black_row(5);
        let blacks: Vec<usize> = row
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.state() == &black())
            .map(|(index, _)| index)
            .collect();
        assert_eq!(blacks, vec![2]);
    }

    #[test]
    fn random_row_is_reproducible() {
        let a = random_row(32, 42);
        let b = random_row(32, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn uniform_row_has_one_state() {
        let row = uniform_row(&black(), 4);
        assert_eq!(row.len(), 4);
        assert!(row.iter().all(|cell| cell.state() == &black()));
    }
}
