//! Cross-check of the full pipeline against an independent bitwise
//! implementation of the elementary rules.
//!
//! The reference below shares no code with the crate: it works on plain
//! bit vectors and indexes the rule number directly. Rules 30, 90, and
//! 110 are compared row by row over a grid large enough to exercise both
//! wraparound edges many times.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use lattice_core::builder::SimulationBuilder;
use lattice_core::elementary;
use lattice_core::simulation::EndReason;
use lattice_types::Cell;

/// One reference generation: toroidal neighbors, bit `l<<2 | c<<1 | r`
/// of the rule code selects the successor.
fn reference_next(code: u8, row: &[bool]) -> Vec<bool> {
    let width = row.len();
    (0..width)
        .map(|i| {
            let left = row[(i + width - 1) % width];
            let center = row[i];
            let right = row[(i + 1) % width];
            let index = u8::from(left) << 2 | u8::from(center) << 1 | u8::from(right);
            (code >> index) & 1 == 1
        })
        .collect()
}

fn to_bits(cells: &[Cell]) -> Vec<bool> {
    cells.iter().map(|cell| cell.state().value() == 1).collect()
}

/// Run a rule through the simulation and compare every produced row
/// against the reference evolution.
fn cross_check(code: u8, width: usize, iterations: u64) {
    let initial = elementary::single_black_row(width);
    let initial_bits = to_bits(&initial);

    let simulation = SimulationBuilder::new()
        .elementary_rule(code)
        .iterations(iterations)
        .initial_row(initial)
        .keep_history(true)
        .build()
        .unwrap();
    let report = simulation.simulate_complete().unwrap();
    assert_eq!(report.end, EndReason::TimeLimitReached);

    let snapshot = simulation.snapshot();
    // The final row finishes in `current`; every earlier generation is
    // in `history`, oldest first.
    let mut produced: Vec<Vec<bool>> = snapshot.history.iter().map(|row| to_bits(row)).collect();
    produced.push(to_bits(&snapshot.current));
    assert_eq!(produced.len(), usize::try_from(iterations).unwrap());

    let mut expected = initial_bits;
    for (generation, row) in produced.iter().enumerate() {
        expected = reference_next(code, &expected);
        assert_eq!(row, &expected, "rule {code}, generation {}", generation + 1);
    }
}

#[test]
fn rule_30_matches_the_reference() {
    cross_check(30, 101, 100);
}

#[test]
fn rule_90_matches_the_reference() {
    cross_check(90, 101, 100);
}

#[test]
fn rule_110_matches_the_reference() {
    cross_check(110, 101, 100);
}

#[test]
fn all_black_three_by_three_scenario() {
    // The concrete end-state contract: 3 cells, 3 iterations, all black.
    let simulation = SimulationBuilder::new()
        .elementary_rule(30)
        .iterations(3)
        .initial_row(elementary::uniform_row(&elementary::black(), 3))
        .keep_history(true)
        .build()
        .unwrap();
    let report = simulation.simulate_complete().unwrap();
    assert_eq!(report.end, EndReason::TimeLimitReached);
    assert_eq!(report.steps, 9);

    let snapshot = simulation.snapshot();
    assert_eq!(snapshot.history.len(), 2);
    assert_eq!(snapshot.last.len(), 3);
    assert_eq!(snapshot.current.len(), 3);

    let mut expected = vec![true, true, true];
    let mut produced = snapshot.history.clone();
    produced.push(snapshot.current.clone());
    for row in &produced {
        expected = reference_next(30, &expected);
        assert_eq!(to_bits(row), expected);
    }
    // `last` mirrors the most recently rotated row.
    assert_eq!(snapshot.last, *snapshot.history.last().unwrap());
}
