//! Staged construction of a ready-to-run simulation.
//!
//! The builder executes the factory stages in their fixed dependency
//! order -- rule, automaton, time, initial row, space, universe,
//! simulation -- and wraps a failure at any stage into one [`BuildError`]
//! carrying the original cause, so a driver can tell bad configuration
//! apart from an internal defect.

use lattice_types::{Cell, State, Transition};
use tracing::debug;

use crate::automaton::CellularAutomaton;
use crate::rule::{Rule, RuleError};
use crate::simulation::Simulation;
use crate::space::{LineSpace, SpaceError, Topology};
use crate::time::{Time, TimeError};
use crate::universe::{Universe, UniverseError};

/// Errors that can occur while building a simulation.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Neither a rule nor a transition list was provided.
    #[error("no rule or transition list was provided")]
    MissingRule,

    /// No initial row was provided.
    #[error("no initial row was provided")]
    MissingInitialRow,

    /// No iteration count was provided.
    #[error("no iteration count was provided")]
    MissingIterations,

    /// Rule construction failed.
    #[error("rule construction failed: {source}")]
    Rule {
        /// The underlying rule error.
        #[from]
        source: RuleError,
    },

    /// Time construction failed.
    #[error("time construction failed: {source}")]
    Time {
        /// The underlying time error.
        #[from]
        source: TimeError,
    },

    /// Space construction failed.
    #[error("space construction failed: {source}")]
    Space {
        /// The underlying space error.
        #[from]
        source: SpaceError,
    },

    /// Universe construction failed.
    #[error("universe construction failed: {source}")]
    Universe {
        /// The underlying universe error.
        #[from]
        source: UniverseError,
    },
}

/// Collects the ingredients of a simulation and assembles them in
/// dependency order.
#[derive(Debug, Default)]
pub struct SimulationBuilder {
    /// A prebuilt rule table, if one was provided.
    rule: Option<Rule>,
    /// Raw transitions to build a rule from, if no prebuilt rule is set.
    transitions: Option<Vec<Transition>>,
    /// The absolute time limit.
    iterations: Option<u64>,
    /// The initial row.
    initial: Option<Vec<Cell>>,
    /// Whether completed rows are kept in history.
    keep_history: bool,
}

impl SimulationBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a prebuilt rule table.
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Build the rule from raw transitions at build time.
    #[must_use]
    pub fn transitions(mut self, transitions: Vec<Transition>) -> Self {
        self.transitions = Some(transitions);
        self
    }

    /// Use the elementary rule table for a Wolfram rule number.
    #[must_use]
    pub fn elementary_rule(self, code: u8) -> Self {
        self.rule(crate::elementary::rule(code))
    }

    /// Set the absolute time limit (number of outer iterations).
    #[must_use]
    pub const fn iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Set the initial row of cells.
    #[must_use]
    pub fn initial_row(mut self, initial: Vec<Cell>) -> Self {
        self.initial = Some(initial);
        self
    }

    /// Set the initial row from bare states.
    #[must_use]
    pub fn initial_states(self, states: Vec<State>) -> Self {
        self.initial_row(states.into_iter().map(Cell::from_state).collect())
    }

    /// Choose whether completed rows are appended to history.
    #[must_use]
    pub const fn keep_history(mut self, keep: bool) -> Self {
        self.keep_history = keep;
        self
    }

    /// Assemble the simulation in dependency order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] wrapping the first stage that fails, or a
    /// `Missing*` variant if a required ingredient was never provided.
    pub fn build(self) -> Result<Simulation<LineSpace>, BuildError> {
        let rule = match (self.rule, self.transitions) {
            (Some(rule), _) => rule,
            (None, Some(transitions)) => Rule::new(transitions)?,
            (None, None) => return Err(BuildError::MissingRule),
        };
        let automaton = CellularAutomaton::new(rule);

        let iterations = self.iterations.ok_or(BuildError::MissingIterations)?;
        let initial = self.initial.ok_or(BuildError::MissingInitialRow)?;

        let space = LineSpace::new(initial, self.keep_history)?;
        let width = u64::try_from(space.width()).unwrap_or(u64::MAX);
        let time = Time::new(iterations, &[width])?;
        let universe = Universe::new(space, time)?;

        debug!(
            iterations,
            width,
            keep_history = self.keep_history,
            "simulation assembled"
        );
        Ok(Simulation::new(universe, automaton))
    }
}
