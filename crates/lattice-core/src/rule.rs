//! Rule table: neighborhood-to-state transition lookup.
//!
//! A [`Rule`] indexes its transitions by reference state, so resolving a
//! queried [`Combination`] is a map lookup followed by an element-wise
//! scan of the neighborhoods filed under that reference. Lookup is pure:
//! after construction the table never changes.

use std::collections::BTreeMap;

use lattice_types::{Combination, State, Transition};

/// Errors that can occur during rule construction or resolution.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// No transitions are indexed under the queried reference state.
    #[error("no transitions indexed under reference state {reference}")]
    UnknownReferenceState {
        /// The reference state that has no transition list.
        reference: State,
    },

    /// Transitions exist for the reference state, but none matches the
    /// queried neighborhood.
    #[error("no transition matches the queried neighborhood for reference state {reference}")]
    NoMatchingCombination {
        /// The reference state whose list was scanned.
        reference: State,
    },

    /// The same combination appears more than once in the input
    /// transition list.
    #[error("duplicate combination in transition list for reference state {reference}")]
    DuplicateCombination {
        /// The reference state under which the duplicate was found.
        reference: State,
    },
}

/// An index from reference state to the transitions whose combination has
/// that reference.
///
/// A well-formed elementary rule holds exactly one transition per
/// distinct combination (8 for a binary 1-D rule with left and right
/// neighbors). An empty rule is permitted; every lookup against it fails.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rule {
    /// Transition lists keyed by the combination's reference state.
    table: BTreeMap<State, Vec<Transition>>,
}

impl Rule {
    /// Build a rule from a list of transitions.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::DuplicateCombination`] if the same
    /// combination appears twice in the input.
    pub fn new(transitions: Vec<Transition>) -> Result<Self, RuleError> {
        let mut table: BTreeMap<State, Vec<Transition>> = BTreeMap::new();
        for transition in transitions {
            let reference = transition.combination().reference().clone();
            let list = table.entry(reference).or_default();
            if list
                .iter()
                .any(|known| known.combination() == transition.combination())
            {
                return Err(RuleError::DuplicateCombination {
                    reference: transition.combination().reference().clone(),
                });
            }
            list.push(transition);
        }
        Ok(Self { table })
    }

    /// Build a rule from transitions already known to be distinct.
    ///
    /// Used by generated rule tables (e.g. the elementary rule decoder)
    /// where distinctness holds by construction.
    pub(crate) fn from_distinct_transitions(transitions: Vec<Transition>) -> Self {
        let mut table: BTreeMap<State, Vec<Transition>> = BTreeMap::new();
        for transition in transitions {
            let reference = transition.combination().reference().clone();
            table.entry(reference).or_default().push(transition);
        }
        Self { table }
    }

    /// Resolve a queried combination to its transition.
    ///
    /// Matching is exact, order-sensitive, and early-exits on the first
    /// mismatching neighbor.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownReferenceState`] if no list is indexed
    /// under the query's reference, or [`RuleError::NoMatchingCombination`]
    /// if a list exists but no entry's neighborhood matches.
    pub fn transition_for(&self, combination: &Combination) -> Result<&Transition, RuleError> {
        let list = self.table.get(combination.reference()).ok_or_else(|| {
            RuleError::UnknownReferenceState {
                reference: combination.reference().clone(),
            }
        })?;
        list.iter()
            .find(|known| known.combination().neighborhood() == combination.neighborhood())
            .ok_or_else(|| RuleError::NoMatchingCombination {
                reference: combination.reference().clone(),
            })
    }

    /// Return the total number of transitions in the table.
    pub fn transition_count(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    /// Return `true` if the table holds no transitions.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterate over the distinct reference states in the table.
    pub fn reference_states(&self) -> impl Iterator<Item = &State> {
        self.table.keys()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn white() -> State {
        State::new("white", 0)
    }

    fn black() -> State {
        State::new("black", 1)
    }

    fn transition(reference: State, left: State, right: State, next: State) -> Transition {
        Transition::new(Combination::new(reference, vec![left, right]), next)
    }

    fn two_row_rule() -> Rule {
        Rule::new(vec![
            transition(white(), white(), white(), black()),
            transition(white(), black(), white(), white()),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_matching_combination() {
        let rule = two_row_rule();
        let query = Combination::new(white(), vec![white(), white()]);
        let found = rule.transition_for(&query).unwrap();
        assert_eq!(found.next_state(), &black());
    }

    #[test]
    fn lookup_is_deterministic() {
        let rule = two_row_rule();
        let query = Combination::new(white(), vec![black(), white()]);
        let first = rule.transition_for(&query).unwrap().clone();
        let second = rule.transition_for(&query).unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_reference_state() {
        let rule = two_row_rule();
        let query = Combination::new(black(), vec![white(), white()]);
        let err = rule.transition_for(&query).unwrap_err();
        assert!(matches!(err, RuleError::UnknownReferenceState { .. }));
    }

    #[test]
    fn no_matching_combination() {
        let rule = two_row_rule();
        // Reference is known, but this neighborhood is not in the table.
        let query = Combination::new(white(), vec![black(), black()]);
        let err = rule.transition_for(&query).unwrap_err();
        assert!(matches!(err, RuleError::NoMatchingCombination { .. }));
    }

    #[test]
    fn matching_is_order_sensitive() {
        let rule = Rule::new(vec![transition(white(), black(), white(), black())]).unwrap();
        let mirrored = Combination::new(white(), vec![white(), black()]);
        assert!(rule.transition_for(&mirrored).is_err());
    }

    #[test]
    fn empty_rule_is_permitted() {
        let rule = Rule::new(Vec::new()).unwrap();
        assert!(rule.is_empty());
        assert_eq!(rule.transition_count(), 0);
        let query = Combination::new(white(), vec![white(), white()]);
        assert!(rule.transition_for(&query).is_err());
    }

    #[test]
    fn duplicate_combination_is_rejected() {
        let result = Rule::new(vec![
            transition(white(), white(), white(), black()),
            transition(white(), white(), white(), white()),
        ]);
        assert!(matches!(
            result.unwrap_err(),
            RuleError::DuplicateCombination { .. }
        ));
    }

    #[test]
    fn counts_transitions_across_references() {
        let rule = Rule::new(vec![
            transition(white(), white(), white(), black()),
            transition(black(), white(), white(), white()),
        ])
        .unwrap();
        assert_eq!(rule.transition_count(), 2);
        assert_eq!(rule.reference_states().count(), 2);
    }
}
