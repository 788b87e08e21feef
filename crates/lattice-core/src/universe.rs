//! The universe: one space paired with the time that drives it.

use crate::space::Topology;
use crate::time::Time;

/// Errors that can occur when pairing a space with a time.
#[derive(Debug, thiserror::Error)]
pub enum UniverseError {
    /// The innermost relative limit must equal the row width.
    #[error("innermost relative time limit {limit} does not match space width {width}")]
    ShapeMismatch {
        /// The innermost relative limit.
        limit: u64,
        /// The space's row width.
        width: usize,
    },

    /// The number of relative levels must equal the space's dimension
    /// count.
    #[error("time has {levels} relative levels but space has {dimensions} dimensions")]
    DimensionMismatch {
        /// Relative levels in the time.
        levels: usize,
        /// Dimensions in the space.
        dimensions: usize,
    },
}

/// A space and the time that drives it, validated to agree on shape.
#[derive(Debug, Clone)]
pub struct Universe<S: Topology> {
    /// The spatial buffers.
    space: S,
    /// The counter hierarchy.
    time: Time,
}

impl<S: Topology> Universe<S> {
    /// Pair a space with a time.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::DimensionMismatch`] if the number of
    /// relative time levels differs from the space's dimension count, or
    /// [`UniverseError::ShapeMismatch`] if the innermost relative limit
    /// differs from the row width.
    pub fn new(space: S, time: Time) -> Result<Self, UniverseError> {
        let levels = time.relative_levels().len();
        let dimensions = space.dimension_count();
        if levels != dimensions {
            return Err(UniverseError::DimensionMismatch { levels, dimensions });
        }
        let limit = time.innermost_limit();
        let width = space.width();
        if u64::try_from(width) != Ok(limit) {
            return Err(UniverseError::ShapeMismatch { limit, width });
        }
        Ok(Self { space, time })
    }

    /// Return the spatial buffers.
    pub const fn space(&self) -> &S {
        &self.space
    }

    /// Return the counter hierarchy.
    pub const fn time(&self) -> &Time {
        &self.time
    }

    /// Split the universe into its mutable parts for one rule step.
    pub(crate) const fn parts_mut(&mut self) -> (&mut S, &mut Time) {
        (&mut self.space, &mut self.time)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lattice_types::{Cell, State};

    use super::*;
    use crate::space::LineSpace;

    fn three_cells() -> Vec<Cell> {
        (0..3)
            .map(|_| Cell::from_state(State::new("white", 0)))
            .collect()
    }

    #[test]
    fn accepts_matching_shapes() {
        let space = LineSpace::new(three_cells(), true).unwrap();
        let time = Time::new(3, &[3]).unwrap();
        let universe = Universe::new(space, time).unwrap();
        assert_eq!(universe.space().width(), 3);
        assert_eq!(universe.time().absolute_limit(), 3);
    }

    #[test]
    fn rejects_width_mismatch() {
        let space = LineSpace::new(three_cells(), true).unwrap();
        let time = Time::new(3, &[4]).unwrap();
        let err = Universe::new(space, time).unwrap_err();
        assert!(matches!(
            err,
            UniverseError::ShapeMismatch { limit: 4, width: 3 }
        ));
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let space = LineSpace::new(three_cells(), true).unwrap();
        let time = Time::new(3, &[2, 3]).unwrap();
        let err = Universe::new(space, time).unwrap_err();
        assert!(matches!(
            err,
            UniverseError::DimensionMismatch {
                levels: 2,
                dimensions: 1
            }
        ));
    }
}
