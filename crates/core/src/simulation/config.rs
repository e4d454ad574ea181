use crate::core_types::spatial::SpreadPattern;
use crate::core_types::units::Meters;
use crate::error::SimulationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default edge length of a fire grid cell
pub const DEFAULT_CELL_SIZE: Meters = Meters::new(100.0);

/// Fuel codes that never carry fire: urban, snow/ice, agricultural, open water, bare ground
pub const DEFAULT_NON_BURNABLE_CODES: [&str; 5] = ["NB1", "NB2", "NB3", "NB8", "NB9"];

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Edge length of a grid cell
    pub cell_size: Meters,
    /// Directions each node spreads in
    pub spread_pattern: SpreadPattern,
    /// Fuel codes treated as barriers, matched exactly
    pub non_burnable_codes: BTreeSet<String>,
    /// Advance perimeter nodes on the rayon pool
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            spread_pattern: SpreadPattern::default(),
            non_burnable_codes: DEFAULT_NON_BURNABLE_CODES
                .iter()
                .map(ToString::to_string)
                .collect(),
            parallel: true,
        }
    }
}

impl SimulationConfig {
    /// Check the configuration can drive a simulation
    ///
    /// # Errors
    /// [`SimulationError::InvalidConfig`] for a non-finite or non-positive
    /// cell size.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.cell_size.is_finite() || *self.cell_size <= 0.0 {
            return Err(SimulationError::InvalidConfig(
                "cell size must be a positive finite distance",
            ));
        }
        Ok(())
    }

    /// Whether a fuel code is configured as non-burnable
    pub fn is_non_burnable(&self, code: &str) -> bool {
        self.non_burnable_codes.contains(code)
    }
}
