//! Computation core for discrete cellular automata.
//!
//! This crate evolves a finite-alphabet cellular automaton: given a rule
//! table, an initial row, and time limits, it produces the full history
//! of rows over discrete steps. The framework is generic over the
//! spatial layout through the [`Topology`] trait; the shipped concrete
//! instance is the 1-D elementary family (Wolfram rules 30/90/110 and
//! friends).
//!
//! # Modules
//!
//! - [`rule`] -- Rule table indexed by reference state, with structural
//!   neighborhood matching.
//! - [`time`] -- Hierarchical counters: absolute iterations over nested
//!   per-dimension relative counters, with all-or-nothing overflow
//!   detection.
//! - [`space`] -- The [`Topology`] seam and [`LineSpace`], a 1-D ring
//!   buffer with initial condition, rolling history, last completed row,
//!   and the row in progress.
//! - [`universe`] -- A space paired with its time, validated for shape.
//! - [`automaton`] -- One rule step: read, resolve, commit, advance.
//! - [`simulation`] -- The three run modes with activation gating and
//!   cooperative cancellation.
//! - [`controller`] -- Background execution on the tokio blocking pool
//!   with a termination-notification sink.
//! - [`builder`] -- Staged assembly of a ready-to-run simulation.
//! - [`config`] -- YAML-backed typed configuration.
//! - [`elementary`] -- The canonical binary alphabet, Wolfram rule
//!   decoding, and initial-row generators.
//!
//! [`Topology`]: space::Topology
//! [`LineSpace`]: space::LineSpace

pub mod automaton;
pub mod builder;
pub mod config;
pub mod controller;
pub mod elementary;
pub mod rule;
pub mod simulation;
pub mod space;
pub mod time;
pub mod universe;

// Re-export primary types at crate root.
pub use automaton::{CellularAutomaton, StepError, StepOutcome};
pub use builder::{BuildError, SimulationBuilder};
pub use config::{ConfigError, SimulationConfig};
pub use controller::{Controller, ControllerStatus, NoOpObserver, RunMode, RunObserver};
pub use rule::{Rule, RuleError};
pub use simulation::{
    EndReason, RunControl, RunReport, Simulation, SimulationError, UniverseSnapshot,
};
pub use space::{LineSpace, SpaceError, Topology};
pub use time::{Time, TimeError};
pub use universe::{Universe, UniverseError};
