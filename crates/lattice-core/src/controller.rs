//! Background run controller: a single-slot executor over one
//! simulation.
//!
//! The controller launches the three run modes on the tokio blocking
//! pool, at most one run per simulation at a time. Activation happens
//! synchronously at the start call, before any blocking work, so a
//! second start issued while a run is in flight is rejected with
//! [`SimulationError::AlreadyActive`] at the call site. Run outcomes are
//! delivered to a [`RunObserver`] rather than re-thrown across the task
//! boundary, since the caller that started the run is not the frame that
//! observes its completion.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::simulation::{RunReport, Simulation, SimulationError, UniverseSnapshot};
use crate::space::Topology;

/// Which run mode a start call launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// Run to the absolute time limit.
    Complete,
    /// Run one full sweep of the innermost dimension.
    Iteration,
    /// Run exactly one step.
    Unit,
}

/// Notification sink for background run termination.
///
/// `run_finished` reports expected ends (time limit, stop, sweep or step
/// completion); `run_failed` reports structural failures.
pub trait RunObserver: Send + Sync {
    /// Called when a background run ends as expected.
    fn run_finished(&self, report: &RunReport);

    /// Called when a background run fails structurally.
    fn run_failed(&self, error: &SimulationError);
}

/// An observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RunObserver for NoOpObserver {
    fn run_finished(&self, _report: &RunReport) {}

    fn run_failed(&self, _error: &SimulationError) {}
}

/// Serializable controller status for progress reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerStatus {
    /// Absolute counter value at the time of the call.
    pub absolute: u64,
    /// Absolute counter limit.
    pub absolute_limit: u64,
    /// Whether a run is currently active.
    pub active: bool,
    /// Elapsed wall-clock seconds since the controller was built.
    pub elapsed_seconds: u64,
    /// The mode of the most recently started run, if any.
    pub last_mode: Option<RunMode>,
}

/// Drives one simulation on the tokio blocking pool, one run at a time.
pub struct Controller<S: Topology + Send + 'static> {
    /// The simulation every start call targets.
    simulation: Arc<Simulation<S>>,
    /// Sink for run termination notifications.
    observer: Arc<dyn RunObserver>,
    /// Wall-clock time the controller was built.
    started_at: DateTime<Utc>,
    /// Mode of the most recently started run.
    last_mode: Mutex<Option<RunMode>>,
}

impl<S: Topology + Send + 'static> Controller<S> {
    /// Create a controller over a simulation with a termination
    /// observer.
    pub fn new(simulation: Simulation<S>, observer: Arc<dyn RunObserver>) -> Self {
        Self {
            simulation: Arc::new(simulation),
            observer,
            started_at: Utc::now(),
            last_mode: Mutex::new(None),
        }
    }

    /// Launch a complete run in the background.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AlreadyActive`] if a run is in flight.
    pub fn start_complete(&self) -> Result<JoinHandle<()>, SimulationError> {
        self.start(RunMode::Complete)
    }

    /// Launch a one-sweep run in the background.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AlreadyActive`] if a run is in flight.
    pub fn start_iteration(&self) -> Result<JoinHandle<()>, SimulationError> {
        self.start(RunMode::Iteration)
    }

    /// Launch a single-step run in the background.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AlreadyActive`] if a run is in flight.
    pub fn start_unit(&self) -> Result<JoinHandle<()>, SimulationError> {
        self.start(RunMode::Unit)
    }

    /// Claim the run slot synchronously, then hand the already-activated
    /// run to the blocking pool.
    fn start(&self, mode: RunMode) -> Result<JoinHandle<()>, SimulationError> {
        self.simulation.control().activate()?;
        *self
            .last_mode
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(mode);
        info!(?mode, "background run starting");

        let simulation = Arc::clone(&self.simulation);
        let observer = Arc::clone(&self.observer);
        Ok(tokio::task::spawn_blocking(move || {
            let result = match mode {
                RunMode::Complete => simulation.run_complete_activated(),
                RunMode::Iteration => simulation.run_iteration_activated(),
                RunMode::Unit => simulation.run_unit_activated(),
            };
            simulation.control().deactivate();
            match result {
                Ok(report) => {
                    info!(?mode, steps = report.steps, end = ?report.end, "background run finished");
                    observer.run_finished(&report);
                }
                Err(error) => {
                    warn!(?mode, %error, "background run failed");
                    observer.run_failed(&error);
                }
            }
        }))
    }

    /// Request cancellation of the in-flight run, if any; the run
    /// observes it within one step.
    pub fn stop(&self) {
        self.simulation.stop();
    }

    /// Whether a run is currently in flight.
    pub fn is_active(&self) -> bool {
        self.simulation.is_active()
    }

    /// Return the current controller status.
    pub fn status(&self) -> ControllerStatus {
        let snapshot = self.simulation.snapshot();
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        ControllerStatus {
            absolute: snapshot.absolute,
            absolute_limit: snapshot.absolute_limit,
            active: snapshot.active,
            // `num_seconds` can be negative if clocks are weird; treat as 0.
            elapsed_seconds: u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX),
            last_mode: *self
                .last_mode
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Take a snapshot of the universe for observers. Snapshots of an
    /// in-flight run are eventually consistent, taken between steps.
    pub fn snapshot(&self) -> UniverseSnapshot {
        self.simulation.snapshot()
    }
}
