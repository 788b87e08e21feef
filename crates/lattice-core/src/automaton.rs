//! One rule step: read a neighborhood, resolve it, write it back,
//! advance time.

use serde::{Deserialize, Serialize};

use crate::rule::{Rule, RuleError};
use crate::space::{SpaceError, Topology};
use crate::time::{Time, TimeError};

/// Errors that can fail a rule step.
///
/// Time exhaustion is deliberately not here: reaching the absolute limit
/// is an expected end of the computation, reported through
/// [`StepOutcome::LimitReached`] so callers pattern-match instead of
/// catching an error they mean to ignore.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// Rule resolution failed: the table is incomplete or the queried
    /// alphabet does not match it.
    #[error("rule resolution failed: {source}")]
    Rule {
        /// The underlying rule error.
        #[from]
        source: RuleError,
    },

    /// A space buffer access failed.
    #[error("space access failed: {source}")]
    Space {
        /// The underlying space error.
        #[from]
        source: SpaceError,
    },

    /// A time operation failed for a reason other than reaching the
    /// limit.
    #[error("time advancement failed: {source}")]
    Time {
        /// The underlying time error.
        source: TimeError,
    },
}

/// What a successful rule step amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// The step completed and time advanced.
    Advanced {
        /// The absolute counter value after the step.
        absolute: u64,
    },

    /// The step's write completed but the time budget is exhausted; the
    /// computation is done.
    LimitReached,
}

/// Applies one rule lookup against one combination drawn from a space at
/// the current time.
#[derive(Debug, Clone)]
pub struct CellularAutomaton {
    /// The rule table every step resolves against.
    rule: Rule,
}

impl CellularAutomaton {
    /// Create an automaton from its rule table.
    pub const fn new(rule: Rule) -> Self {
        Self { rule }
    }

    /// Return the rule table.
    pub const fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Execute one rule step: extract the combination at the current
    /// time, resolve it, commit the resulting transition, then advance
    /// time.
    ///
    /// When time advancement hits the absolute limit the committed write
    /// still counts and the step reports [`StepOutcome::LimitReached`];
    /// the step is not atomic on failure either -- a resolution failure
    /// after a successful read leaves the space as the read left it.
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] if combination extraction, rule resolution,
    /// or the commit fails.
    pub fn execute_rule<S: Topology>(
        &self,
        space: &mut S,
        time: &mut Time,
    ) -> Result<StepOutcome, StepError> {
        let combination = space.combination(time)?;
        let transition = self.rule.transition_for(&combination)?;
        space.commit(time, transition)?;
        match time.increase() {
            Ok(absolute) => Ok(StepOutcome::Advanced { absolute }),
            Err(TimeError::LimitReached { .. }) => Ok(StepOutcome::LimitReached),
            Err(source) => Err(StepError::Time { source }),
        }
    }
}
