//! Simulation state machine: repeated rule steps under three execution
//! modes with cooperative cancellation.
//!
//! A [`Simulation`] owns a universe behind a mutex (locked per step, not
//! per run, so concurrent observers get eventually-consistent snapshots)
//! and a shared [`RunControl`] whose single atomic flag is both the
//! mutual-exclusion gate for starting runs and the cancellation signal
//! for stopping one.
//!
//! # Modes
//!
//! - [`Simulation::simulate_complete`] -- run every remaining step up to
//!   the absolute time limit.
//! - [`Simulation::simulate_iteration`] -- run until the absolute counter
//!   advances: exactly one full sweep of the innermost dimension.
//! - [`Simulation::simulate_unit`] -- run exactly one step.
//!
//! Every mode sets the active flag on entry, clears it on every exit path
//! (expected end, stop, or structural failure), and observes a `stop()`
//! within one step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use lattice_types::Cell;

use crate::automaton::{CellularAutomaton, StepError, StepOutcome};
use crate::space::Topology;
use crate::time::Level;
use crate::universe::Universe;

/// Errors that can occur when driving a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// A run is already active on this simulation; starts are rejected,
    /// never queued.
    #[error("a run is already active on this simulation")]
    AlreadyActive,

    /// A rule step failed structurally.
    #[error("rule step failed: {source}")]
    Step {
        /// The underlying step error.
        #[from]
        source: StepError,
    },
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// The absolute time limit was reached (the expected end of a
    /// complete run).
    TimeLimitReached,
    /// `stop()` was observed before the run finished.
    Stopped,
    /// The absolute counter advanced: one full sweep completed.
    IterationComplete,
    /// Exactly one step completed.
    StepComplete,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Number of rule steps executed during the run.
    pub steps: u64,
    /// Why the run ended.
    pub end: EndReason,
}

/// Shared run-control flag: mutual exclusion for starting runs and the
/// cooperative cancellation signal.
#[derive(Debug, Default)]
pub struct RunControl {
    /// Whether a run is currently active.
    active: AtomicBool,
}

impl RunControl {
    /// Atomically claim the single run slot.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AlreadyActive`] if a run already holds
    /// the slot.
    pub fn activate(&self) -> Result<(), SimulationError> {
        match self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(()),
            Err(_) => Err(SimulationError::AlreadyActive),
        }
    }

    /// Release the run slot.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Request cancellation: the running loop observes the cleared flag
    /// at its next per-step check.
    pub fn stop(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Whether a run currently holds the slot.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Serializable view of the universe for concurrent observers: the full
/// read model plus counter positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseSnapshot {
    /// Absolute counter value.
    pub absolute: u64,
    /// Absolute counter limit.
    pub absolute_limit: u64,
    /// Relative counter values, outermost first.
    pub relative: Vec<u64>,
    /// Relative counter limits, outermost first.
    pub relative_limits: Vec<u64>,
    /// The fixed initial condition.
    pub initial: Vec<Cell>,
    /// Fully-computed rows, oldest first.
    pub history: Vec<Vec<Cell>>,
    /// The most recently completed row.
    pub last: Vec<Cell>,
    /// The in-progress row.
    pub current: Vec<Cell>,
    /// Whether a run was active when the snapshot was taken.
    pub active: bool,
}

/// Orchestrates repeated rule application over one universe.
#[derive(Debug)]
pub struct Simulation<S: Topology> {
    /// The space and time being evolved; locked once per step.
    universe: Arc<Mutex<Universe<S>>>,
    /// The stepping engine.
    automaton: CellularAutomaton,
    /// Shared active/cancellation flag.
    control: Arc<RunControl>,
}

impl<S: Topology> Simulation<S> {
    /// Create a simulation over a universe and an automaton.
    pub fn new(universe: Universe<S>, automaton: CellularAutomaton) -> Self {
        Self {
            universe: Arc::new(Mutex::new(universe)),
            automaton,
            control: Arc::new(RunControl::default()),
        }
    }

    /// Return a handle to the shared run-control flag.
    pub fn control(&self) -> Arc<RunControl> {
        Arc::clone(&self.control)
    }

    /// Whether a run is currently active.
    pub fn is_active(&self) -> bool {
        self.control.is_active()
    }

    /// Request cancellation of the current run, if any.
    pub fn stop(&self) {
        self.control.stop();
    }

    /// Lock the universe, recovering the data from a poisoned lock (the
    /// universe holds no invariant a panicked reader could break).
    fn lock_universe(&self) -> MutexGuard<'_, Universe<S>> {
        self.universe
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Execute one rule step under the universe lock.
    fn step(&self) -> Result<StepOutcome, SimulationError> {
        let mut universe = self.lock_universe();
        let (space, time) = universe.parts_mut();
        Ok(self.automaton.execute_rule(space, time)?)
    }

    /// Run every remaining step up to the absolute time limit.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AlreadyActive`] if a run is in
    /// progress, or [`SimulationError::Step`] on a structural failure.
    /// The active flag is cleared on every exit path.
    pub fn simulate_complete(&self) -> Result<RunReport, SimulationError> {
        self.control.activate()?;
        let result = self.run_complete_activated();
        self.control.deactivate();
        result
    }

    /// Run until the absolute counter advances: one full sweep of the
    /// innermost dimension.
    ///
    /// # Errors
    ///
    /// Same contract as [`Simulation::simulate_complete`].
    pub fn simulate_iteration(&self) -> Result<RunReport, SimulationError> {
        self.control.activate()?;
        let result = self.run_iteration_activated();
        self.control.deactivate();
        result
    }

    /// Run exactly one step. Reaching the time limit is reported in the
    /// outcome, not raised.
    ///
    /// # Errors
    ///
    /// Same contract as [`Simulation::simulate_complete`].
    pub fn simulate_unit(&self) -> Result<RunReport, SimulationError> {
        self.control.activate()?;
        let result = self.run_unit_activated();
        self.control.deactivate();
        result
    }

    /// Complete-mode loop body; the caller owns the active flag.
    pub(crate) fn run_complete_activated(&self) -> Result<RunReport, SimulationError> {
        info!("complete run starting");
        let mut steps: u64 = 0;
        loop {
            if !self.control.is_active() {
                info!(steps, "run stopped before completion");
                return Ok(RunReport {
                    steps,
                    end: EndReason::Stopped,
                });
            }
            let outcome = self.checked_step(steps)?;
            steps = steps.saturating_add(1);
            if outcome == StepOutcome::LimitReached {
                info!(steps, "complete run reached the time limit");
                return Ok(RunReport {
                    steps,
                    end: EndReason::TimeLimitReached,
                });
            }
        }
    }

    /// Iteration-mode loop body; the caller owns the active flag.
    pub(crate) fn run_iteration_activated(&self) -> Result<RunReport, SimulationError> {
        let entry_absolute = self.lock_universe().time().absolute();
        debug!(entry_absolute, "iteration run starting");
        let mut steps: u64 = 0;
        loop {
            if !self.control.is_active() {
                info!(steps, "iteration stopped before the sweep finished");
                return Ok(RunReport {
                    steps,
                    end: EndReason::Stopped,
                });
            }
            let outcome = self.checked_step(steps)?;
            steps = steps.saturating_add(1);
            match outcome {
                StepOutcome::LimitReached => {
                    info!(steps, "iteration reached the time limit");
                    return Ok(RunReport {
                        steps,
                        end: EndReason::TimeLimitReached,
                    });
                }
                StepOutcome::Advanced { absolute } => {
                    if absolute != entry_absolute {
                        debug!(steps, absolute, "iteration completed one sweep");
                        return Ok(RunReport {
                            steps,
                            end: EndReason::IterationComplete,
                        });
                    }
                }
            }
        }
    }

    /// Unit-mode body; the caller owns the active flag.
    pub(crate) fn run_unit_activated(&self) -> Result<RunReport, SimulationError> {
        let outcome = self.checked_step(0)?;
        let end = match outcome {
            StepOutcome::Advanced { .. } => EndReason::StepComplete,
            // Swallowed at this level: a unit step at the limit is not
            // an error to the caller.
            StepOutcome::LimitReached => EndReason::TimeLimitReached,
        };
        debug!(?end, "unit step executed");
        Ok(RunReport { steps: 1, end })
    }

    /// One step with failure logging.
    fn checked_step(&self, steps_so_far: u64) -> Result<StepOutcome, SimulationError> {
        self.step().map_err(|error| {
            warn!(steps_so_far, %error, "rule step failed");
            error
        })
    }

    /// Take a snapshot of the universe for observers.
    ///
    /// The snapshot is taken under the universe lock, so it lands
    /// between steps of an active run; it may lag the run by the steps
    /// executed after it returns.
    pub fn snapshot(&self) -> UniverseSnapshot {
        let universe = self.lock_universe();
        let time = universe.time();
        let space = universe.space();
        UniverseSnapshot {
            absolute: time.absolute(),
            absolute_limit: time.absolute_limit(),
            relative: time.relative_levels().iter().map(Level::value).collect(),
            relative_limits: time.relative_levels().iter().map(Level::limit).collect(),
            initial: space.initial().to_vec(),
            history: space.history().to_vec(),
            last: space.last().to_vec(),
            current: space.current().to_vec(),
            active: self.control.is_active(),
        }
    }
}
