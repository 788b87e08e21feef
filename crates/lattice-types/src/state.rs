//! Cell state symbols forming the automaton's alphabet.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An immutable symbol in the automaton's alphabet.
///
/// A state pairs a human-readable name with an integer value (for the
/// classic binary alphabet: `"white"`/0 and `"black"`/1). Two states are
/// equal iff both name and value match. Rule and combination matching
/// rely on this value equality, so a driver should create each distinct
/// symbol exactly once and clone it wherever that symbol appears.
///
/// States are [`Ord`] so they can key the rule table's `BTreeMap`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct State {
    /// Human-readable symbol name.
    name: String,
    /// Integer value backing the symbol.
    value: i64,
}

impl State {
    /// Create a new state symbol.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Return the symbol name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the integer value backing the symbol.
    pub const fn value(&self) -> i64 {
        self.value
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.value)
    }
}
