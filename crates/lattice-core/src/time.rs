//! Hierarchical time: nested per-dimension counters under an absolute
//! limit.
//!
//! A [`Time`] tracks one absolute (outer) counter plus one relative
//! counter per spatial dimension, innermost level last. One logical tick
//! advances the innermost relative counter; when a counter reaches its
//! limit the carry cascades into the next coarser level and finally into
//! the absolute counter.
//!
//! # Design Principles
//!
//! - All counter arithmetic is checked or saturating (no silent
//!   overflow).
//! - A tick that would push the absolute counter to its limit fails
//!   **before any counter mutates**: a failed [`Time::increase`] is
//!   all-or-nothing, so callers never observe a half-applied cascade.

use serde::{Deserialize, Serialize};

/// Errors that can occur during time construction or advancement.
#[derive(Debug, thiserror::Error)]
pub enum TimeError {
    /// The absolute limit must be at least 1.
    #[error("absolute time limit must be at least 1")]
    InvalidAbsoluteLimit,

    /// A relative limit must be at least 1.
    #[error("relative time limit at level {level} must be at least 1")]
    InvalidRelativeLimit {
        /// Zero-based level of the offending limit (0 = outermost).
        level: usize,
    },

    /// A dimensional time needs at least one relative level.
    #[error("at least one relative time level must be configured")]
    MissingRelativeLevels,

    /// The tick would push the absolute counter past its limit.
    #[error("absolute time limit {limit} reached")]
    LimitReached {
        /// The configured absolute limit.
        limit: u64,
    },
}

/// One relative counter level: a value bounded by its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Current counter value, `0 <= value < limit`.
    value: u64,
    /// Exclusive upper bound for the value.
    limit: u64,
}

impl Level {
    /// Return the current counter value.
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Return the exclusive upper bound for the value.
    pub const fn limit(&self) -> u64 {
        self.limit
    }
}

/// A hierarchical counter: an absolute counter bounded by an absolute
/// limit, plus a chain of relative counters, one per spatial dimension.
///
/// Levels are stored outermost first; the innermost (last) level is the
/// cell index within the row being computed. The struct is
/// dimension-generic: a 1-D automaton uses one relative level, an N-D
/// automaton uses N.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    /// The outer iteration counter, `0 <= absolute < absolute_limit`
    /// while active.
    absolute: u64,
    /// Exclusive upper bound for the absolute counter.
    absolute_limit: u64,
    /// Relative counter levels, outermost first.
    relative: Vec<Level>,
}

impl Time {
    /// Create a dimensional time from an absolute limit and one relative
    /// limit per spatial dimension (outermost first).
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::InvalidAbsoluteLimit`] if `absolute_limit`
    /// is 0, [`TimeError::MissingRelativeLevels`] if no relative limit
    /// is given, or [`TimeError::InvalidRelativeLimit`] if any relative
    /// limit is 0.
    pub fn new(absolute_limit: u64, relative_limits: &[u64]) -> Result<Self, TimeError> {
        if absolute_limit == 0 {
            return Err(TimeError::InvalidAbsoluteLimit);
        }
        if relative_limits.is_empty() {
            return Err(TimeError::MissingRelativeLevels);
        }
        let mut relative = Vec::with_capacity(relative_limits.len());
        for (level, &limit) in relative_limits.iter().enumerate() {
            if limit == 0 {
                return Err(TimeError::InvalidRelativeLimit { level });
            }
            relative.push(Level { value: 0, limit });
        }
        Ok(Self {
            absolute: 0,
            absolute_limit,
            relative,
        })
    }

    /// Advance the counter hierarchy by one logical tick. Returns the
    /// absolute counter value after the tick.
    ///
    /// The innermost relative counter advances by one; if it would reach
    /// its limit it resets to 0 and the carry cascades into the next
    /// coarser level, finally into the absolute counter.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::LimitReached`] when the carry would push the
    /// absolute counter to its limit. A failed increase mutates no
    /// counter.
    pub fn increase(&mut self) -> Result<u64, TimeError> {
        // Overflow is detected up front so the cascade below never has
        // to roll back.
        let carries_to_absolute = self
            .relative
            .iter()
            .all(|level| level.value.saturating_add(1) >= level.limit);
        if carries_to_absolute && self.absolute.saturating_add(1) >= self.absolute_limit {
            return Err(TimeError::LimitReached {
                limit: self.absolute_limit,
            });
        }

        for level in self.relative.iter_mut().rev() {
            let next = level.value.saturating_add(1);
            if next < level.limit {
                level.value = next;
                return Ok(self.absolute);
            }
            level.value = 0;
        }
        self.absolute = self.absolute.saturating_add(1);
        Ok(self.absolute)
    }

    /// Reset the absolute counter to 0 without touching the relative
    /// levels.
    pub const fn reset_absolute(&mut self) {
        self.absolute = 0;
    }

    /// Return the absolute counter value.
    pub const fn absolute(&self) -> u64 {
        self.absolute
    }

    /// Return the exclusive upper bound for the absolute counter.
    pub const fn absolute_limit(&self) -> u64 {
        self.absolute_limit
    }

    /// Return the relative levels, outermost first.
    pub fn relative_levels(&self) -> &[Level] {
        &self.relative
    }

    /// Return the counter value at the given relative level, if the
    /// level exists.
    pub fn relative(&self, level: usize) -> Option<u64> {
        self.relative.get(level).map(Level::value)
    }

    /// Return the limit at the given relative level, if the level
    /// exists.
    pub fn relative_limit(&self, level: usize) -> Option<u64> {
        self.relative.get(level).map(Level::limit)
    }

    /// Return the innermost relative counter value: the cell index
    /// within the row currently being computed.
    pub fn cell_index(&self) -> u64 {
        self.relative.last().map_or(0, Level::value)
    }

    /// Return the innermost relative limit: the row width.
    pub fn innermost_limit(&self) -> u64 {
        self.relative.last().map_or(0, Level::limit)
    }

    /// Return the total number of ticks this time can serve before the
    /// limit is reached, or `None` if the product overflows.
    pub fn total_ticks(&self) -> Option<u64> {
        self.relative
            .iter()
            .try_fold(self.absolute_limit, |acc, level| {
                acc.checked_mul(level.limit)
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_absolute_limit() {
        let result = Time::new(0, &[3]);
        assert!(matches!(
            result.unwrap_err(),
            TimeError::InvalidAbsoluteLimit
        ));
    }

    #[test]
    fn rejects_zero_relative_limit() {
        let result = Time::new(3, &[4, 0]);
        assert!(matches!(
            result.unwrap_err(),
            TimeError::InvalidRelativeLimit { level: 1 }
        ));
    }

    #[test]
    fn rejects_missing_relative_levels() {
        let result = Time::new(3, &[]);
        assert!(matches!(
            result.unwrap_err(),
            TimeError::MissingRelativeLevels
        ));
    }

    #[test]
    fn starts_at_zero() {
        let time = Time::new(3, &[3]).unwrap();
        assert_eq!(time.absolute(), 0);
        assert_eq!(time.cell_index(), 0);
        assert_eq!(time.innermost_limit(), 3);
    }

    #[test]
    fn innermost_advances_first() {
        let mut time = Time::new(3, &[3]).unwrap();
        assert_eq!(time.increase().unwrap(), 0);
        assert_eq!(time.cell_index(), 1);
        assert_eq!(time.increase().unwrap(), 0);
        assert_eq!(time.cell_index(), 2);
        // Third tick wraps the row and carries into the absolute counter.
        assert_eq!(time.increase().unwrap(), 1);
        assert_eq!(time.cell_index(), 0);
    }

    #[test]
    fn carry_cascades_through_nested_levels() {
        let mut time = Time::new(2, &[2, 3]).unwrap();
        // Ticks 1..3 sweep the innermost level, carrying into level 0.
        for _ in 0..3 {
            let _ = time.increase().unwrap();
        }
        assert_eq!(time.relative(0), Some(1));
        assert_eq!(time.relative(1), Some(0));
        assert_eq!(time.absolute(), 0);
        // Three more ticks carry all the way into the absolute counter.
        for _ in 0..3 {
            let _ = time.increase().unwrap();
        }
        assert_eq!(time.relative(0), Some(0));
        assert_eq!(time.relative(1), Some(0));
        assert_eq!(time.absolute(), 1);
    }

    #[test]
    fn limit_is_hit_after_exactly_the_budgeted_ticks() {
        // absolute_limit * relative_limit - 1 successful increases, then
        // the next one fails and no earlier one does.
        let mut time = Time::new(3, &[3]).unwrap();
        let budget = time.total_ticks().unwrap();
        for _ in 0..budget.checked_sub(1).unwrap() {
            assert!(time.increase().is_ok());
        }
        assert!(matches!(
            time.increase().unwrap_err(),
            TimeError::LimitReached { limit: 3 }
        ));
    }

    #[test]
    fn failed_increase_mutates_nothing() {
        let mut time = Time::new(2, &[2, 2]).unwrap();
        let budget = time.total_ticks().unwrap();
        for _ in 0..budget.checked_sub(1).unwrap() {
            let _ = time.increase().unwrap();
        }
        let before = time.clone();
        assert!(time.increase().is_err());
        assert_eq!(time, before);
        // Still failing, still untouched.
        assert!(time.increase().is_err());
        assert_eq!(time, before);
    }

    #[test]
    fn reset_absolute_keeps_relative_levels() {
        let mut time = Time::new(4, &[3]).unwrap();
        for _ in 0..4 {
            let _ = time.increase().unwrap();
        }
        assert_eq!(time.absolute(), 1);
        assert_eq!(time.cell_index(), 1);
        time.reset_absolute();
        assert_eq!(time.absolute(), 0);
        assert_eq!(time.cell_index(), 1);
    }

    #[test]
    fn total_ticks_is_the_product_of_limits() {
        let time = Time::new(5, &[4, 3]).unwrap();
        assert_eq!(time.total_ticks(), Some(60));
    }
}
