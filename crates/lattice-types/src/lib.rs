//! Shared type definitions for the lattice cellular-automaton core.
//!
//! This crate is the single source of truth for the immutable domain
//! types that flow through every stage of a simulation: the alphabet
//! symbols, the neighborhoods drawn from the grid, the rule-table rows,
//! and the cells that make up each computed row.
//!
//! # Modules
//!
//! - [`state`] -- [`State`], an immutable named symbol in the alphabet
//! - [`combination`] -- [`Combination`], an ordered neighborhood around a
//!   reference state
//! - [`transition`] -- [`Transition`], one row of a rule table
//! - [`cell`] -- [`Cell`], a grid slot holding a state and the transition
//!   that produced it
//!
//! All types here are immutable after construction and serde-serializable
//! so that external collaborators can persist simulation parameters.

pub mod cell;
pub mod combination;
pub mod state;
pub mod transition;

// Re-export all public types at crate root for convenience.
pub use cell::Cell;
pub use combination::Combination;
pub use state::State;
pub use transition::Transition;
