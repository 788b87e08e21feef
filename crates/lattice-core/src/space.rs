//! Space buffers: initial condition, rolling history, and the row in
//! progress.
//!
//! The [`Topology`] trait is the narrow seam between the stepping engine
//! and a concrete spatial layout: extract the neighborhood combination at
//! the current time, and commit a computed transition back. The shipped
//! implementation is [`LineSpace`], a 1-D row with toroidal wraparound
//! (edge neighbor lookups wrap to the opposite end, making the row a
//! ring).
//!
//! # Row rotation
//!
//! A completed row rotates exactly once: it is pushed onto `history`
//! (when history keeping is on), becomes `last`, and `current` restarts
//! empty. Rotation is lazy -- it runs at the head of both
//! [`Topology::combination`] and [`Topology::commit`], whichever touches
//! the buffers first after the row fills. A final row that nothing reads
//! past therefore stays complete in `current`, which is exactly the end
//! state observers expect.

use lattice_types::{Cell, Combination, Transition};
use tracing::debug;

use crate::time::Time;

/// Errors that can occur during space construction or access.
#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    /// The initial condition must contain at least one cell.
    #[error("initial row must contain at least one cell")]
    EmptyInitialRow,

    /// The time's cell index does not fit the row.
    #[error("cell index {index} out of range for row width {width}")]
    CellIndexOutOfRange {
        /// The offending index.
        index: u64,
        /// The row width.
        width: usize,
    },

    /// A completed row is needed but none has been committed yet.
    #[error("no completed row available to read at absolute time {absolute}")]
    RowUnavailable {
        /// The absolute counter at the failed read.
        absolute: u64,
    },
}

/// A spatial layout the stepping engine can read neighborhoods from and
/// commit transitions into.
///
/// Both operations take `&mut self` because either may trigger the
/// rotation of a just-completed row.
pub trait Topology {
    /// Number of spatial dimensions this topology models.
    fn dimension_count(&self) -> usize;

    /// Width of the innermost spatial axis.
    fn width(&self) -> usize;

    /// Extract the neighborhood combination at the position the time's
    /// innermost counter points at.
    fn combination(&mut self, time: &Time) -> Result<Combination, SpaceError>;

    /// Commit a resolved transition as the next cell of the in-progress
    /// row.
    fn commit(&mut self, time: &Time, transition: &Transition) -> Result<(), SpaceError>;

    /// The fixed initial condition.
    fn initial(&self) -> &[Cell];

    /// Fully-computed rows, oldest first (empty unless history keeping
    /// is on).
    fn history(&self) -> &[Vec<Cell>];

    /// The most recently completed row (empty before the first row
    /// completes).
    fn last(&self) -> &[Cell];

    /// The in-progress row.
    fn current(&self) -> &[Cell];
}

/// A one-dimensional row of cells with toroidal wraparound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpace {
    /// The initial condition, set once and never mutated.
    initial: Vec<Cell>,
    /// Fully-computed rows, oldest first.
    history: Vec<Vec<Cell>>,
    /// The most recently completed row.
    last: Vec<Cell>,
    /// The row currently being computed.
    current: Vec<Cell>,
    /// Row width, fixed by the initial condition.
    width: usize,
    /// Whether completed rows are appended to `history`.
    keep_history: bool,
}

impl LineSpace {
    /// Create a 1-D space from an initial row.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::EmptyInitialRow`] if the initial row is
    /// empty.
    pub fn new(initial: Vec<Cell>, keep_history: bool) -> Result<Self, SpaceError> {
        if initial.is_empty() {
            return Err(SpaceError::EmptyInitialRow);
        }
        let width = initial.len();
        Ok(Self {
            initial,
            history: Vec::new(),
            last: Vec::new(),
            current: Vec::new(),
            width,
            keep_history,
        })
    }

    /// Return whether completed rows are appended to `history`.
    pub const fn keep_history(&self) -> bool {
        self.keep_history
    }

    /// Rotate the buffers if the in-progress row has reached full width.
    fn rotate_if_complete(&mut self) {
        if self.current.len() < self.width {
            return;
        }
        let completed = std::mem::take(&mut self.current);
        if self.keep_history {
            self.history.push(completed.clone());
        }
        self.last = completed;
        debug!(rows = self.history.len(), "row completed and rotated");
    }

    /// The row neighborhoods are currently read from: the initial
    /// condition for the first sweep, the last completed row afterwards.
    fn reading_row(&self, time: &Time) -> Result<&[Cell], SpaceError> {
        if time.absolute() == 0 {
            return Ok(&self.initial);
        }
        if self.last.is_empty() {
            return Err(SpaceError::RowUnavailable {
                absolute: time.absolute(),
            });
        }
        Ok(&self.last)
    }
}

impl Topology for LineSpace {
    fn dimension_count(&self) -> usize {
        1
    }

    fn width(&self) -> usize {
        self.width
    }

    fn combination(&mut self, time: &Time) -> Result<Combination, SpaceError> {
        self.rotate_if_complete();

        let width = self.width;
        let row = self.reading_row(time)?;
        let index = usize::try_from(time.cell_index())
            .ok()
            .filter(|&index| index < width)
            .ok_or(SpaceError::CellIndexOutOfRange {
                index: time.cell_index(),
                width,
            })?;

        // Toroidal neighbors: -1 wraps to the last index, width wraps
        // to 0.
        let left_index = index
            .checked_sub(1)
            .unwrap_or_else(|| width.saturating_sub(1));
        let right_index = index.saturating_add(1).checked_rem(width).unwrap_or(0);

        let cell_state = |at: usize| {
            row.get(at)
                .map(|cell| cell.state().clone())
                .ok_or(SpaceError::CellIndexOutOfRange {
                    index: time.cell_index(),
                    width,
                })
        };
        let reference = cell_state(index)?;
        let left = cell_state(left_index)?;
        let right = cell_state(right_index)?;
        Ok(Combination::new(reference, vec![left, right]))
    }

    fn commit(&mut self, _time: &Time, transition: &Transition) -> Result<(), SpaceError> {
        self.rotate_if_complete();
        self.current.push(Cell::from_transition(transition.clone()));
        Ok(())
    }

    fn initial(&self) -> &[Cell] {
        &self.initial
    }

    fn history(&self) -> &[Vec<Cell>] {
        &self.history
    }

    fn last(&self) -> &[Cell] {
        &self.last
    }

    fn current(&self) -> &[Cell] {
        &self.current
    }
}
