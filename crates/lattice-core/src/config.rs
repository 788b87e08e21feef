//! Configuration loading and typed config structures for a simulation.
//!
//! Drivers describe a run in a small YAML document; this module defines
//! strongly-typed structs that mirror it, a loader that reads and parses
//! the file, and glue that assembles a ready-to-run simulation through
//! the builder. All fields have sensible defaults.

use std::path::Path;

use lattice_types::Cell;
use serde::{Deserialize, Serialize};

use crate::builder::{BuildError, SimulationBuilder};
use crate::elementary;
use crate::simulation::Simulation;
use crate::space::LineSpace;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Automaton parameters (rule, grid, iterations).
    #[serde(default)]
    pub automaton: AutomatonConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Assemble a ready-to-run simulation from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if any construction stage rejects the
    /// configured values.
    pub fn build(&self) -> Result<Simulation<LineSpace>, BuildError> {
        SimulationBuilder::new()
            .elementary_rule(self.automaton.rule)
            .iterations(self.automaton.iterations)
            .initial_row(self.automaton.initial.to_row(self.automaton.cells))
            .keep_history(self.automaton.keep_history)
            .build()
    }
}

/// Automaton parameters: which rule to run, on what grid, for how long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonConfig {
    /// Wolfram rule number.
    #[serde(default = "default_rule")]
    pub rule: u8,

    /// Number of cells per row.
    #[serde(default = "default_cells")]
    pub cells: usize,

    /// Number of outer iterations (the absolute time limit).
    #[serde(default = "default_iterations")]
    pub iterations: u64,

    /// How the initial row is generated.
    #[serde(default)]
    pub initial: InitialPattern,

    /// Whether completed rows are kept in history.
    #[serde(default = "default_keep_history")]
    pub keep_history: bool,
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self {
            rule: default_rule(),
            cells: default_cells(),
            iterations: default_iterations(),
            initial: InitialPattern::default(),
            keep_history: default_keep_history(),
        }
    }
}

/// How the initial row is generated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "pattern")]
pub enum InitialPattern {
    /// All white with a single black cell at the center.
    #[default]
    SingleBlack,
    /// Every cell white.
    UniformWhite,
    /// Every cell black.
    UniformBlack,
    /// Reproducible random row from a seed.
    Random {
        /// Seed for the row generator.
        seed: u64,
    },
    /// Explicit bits, one per cell; any nonzero bit is black. Overrides
    /// the configured cell count.
    Explicit {
        /// The bits, leftmost cell first.
        bits: Vec<u8>,
    },
}

impl InitialPattern {
    /// Materialize the initial row at the given width.
    pub fn to_row(&self, cells: usize) -> Vec<Cell> {
        match self {
            Self::SingleBlack => elementary::single_black_row(cells),
            Self::UniformWhite => elementary::uniform_row(&elementary::white(), cells),
            Self::UniformBlack => elementary::uniform_row(&elementary::black(), cells),
            Self::Random { seed } => elementary::random_row(cells, *seed),
            Self::Explicit { bits } => bits
                .iter()
                .map(|&bit| Cell::from_state(elementary::state_for_bit(bit != 0)))
                .collect(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Tracing filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

const fn default_rule() -> u8 {
    30
}

const fn default_cells() -> usize {
    64
}

const fn default_iterations() -> u64 {
    64
}

const fn default_keep_history() -> bool {
    true
}

fn default_log_filter() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::simulation::EndReason;

    #[test]
    fn defaults_are_sensible() {
        let config = SimulationConfig::default();
        assert_eq!(config.automaton.rule, 30);
        assert_eq!(config.automaton.cells, 64);
        assert_eq!(config.automaton.iterations, 64);
        assert_eq!(config.automaton.initial, InitialPattern::SingleBlack);
        assert!(config.automaton.keep_history);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn parses_a_partial_document() {
        let config = SimulationConfig::parse(
            "automaton:\n  rule: 110\n  cells: 16\n  iterations: 8\n",
        )
        .unwrap();
        assert_eq!(config.automaton.rule, 110);
        assert_eq!(config.automaton.cells, 16);
        assert_eq!(config.automaton.iterations, 8);
        // Unspecified fields keep their defaults.
        assert!(config.automaton.keep_history);
    }

    #[test]
    fn parses_an_initial_pattern() {
        let config = SimulationConfig::parse(
            "automaton:\n  initial:\n    pattern: random\n    seed: 7\n",
        )
        .unwrap();
        assert_eq!(config.automaton.initial, InitialPattern::Random { seed: 7 });
    }

    #[test]
    fn explicit_bits_override_the_cell_count() {
        let pattern = InitialPattern::Explicit {
            bits: vec![1, 0, 1],
        };
        let row = pattern.to_row(64);
        assert_eq!(row.len(), 3);
        assert_eq!(row.first().unwrap().state(), &elementary::black());
        assert_eq!(row.get(1).unwrap().state(), &elementary::white());
    }

    #[test]
    fn rejects_malformed_yaml() {
        let result = SimulationConfig::parse("automaton: [not, a, map]");
        assert!(matches!(result.unwrap_err(), ConfigError::Yaml { .. }));
    }

    #[test]
    fn a_configured_simulation_runs() {
        let config = SimulationConfig::parse(
            "automaton:\n  rule: 90\n  cells: 8\n  iterations: 4\n",
        )
        .unwrap();
        let simulation = config.build().unwrap();
        let report = simulation.simulate_complete().unwrap();
        assert_eq!(report.end, EndReason::TimeLimitReached);
        assert_eq!(report.steps, 32);
    }
}
