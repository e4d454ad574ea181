//! Error types for environment lookups and simulation setup

use thiserror::Error;

/// Failure to answer an environment query at a point
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvironmentError {
    /// The point lies outside the modelled area
    #[error("position ({east:.1}, {north:.1}) is outside the modelled area")]
    OutOfBounds { east: f64, north: f64 },

    /// A fuel raster referenced a model number the catalog does not know
    #[error("unknown fuel model number {0}")]
    UnknownFuelModel(u16),

    /// The backing data source could not be reached
    #[error("environment data unavailable: {0}")]
    Unavailable(String),

    /// The backing data source returned something unusable
    #[error("malformed environment data: {0}")]
    Malformed(String),
}

impl EnvironmentError {
    /// Whether this failure marks the edge of the modelled area rather than a fault
    pub fn is_boundary(&self) -> bool {
        matches!(self, EnvironmentError::OutOfBounds { .. })
    }
}

/// Failure to create or configure a simulation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid simulation configuration: {0}")]
    InvalidConfig(&'static str),

    /// The environment could not describe the ignition point
    #[error("cannot ignite: {source}")]
    Ignition {
        #[source]
        source: EnvironmentError,
    },
}

impl From<EnvironmentError> for SimulationError {
    fn from(source: EnvironmentError) -> Self {
        SimulationError::Ignition { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_ignition_error_keeps_source() {
        let err = SimulationError::from(EnvironmentError::UnknownFuelModel(42));
        assert_eq!(err.to_string(), "cannot ignite: unknown fuel model number 42");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_boundary_classification() {
        assert!(EnvironmentError::OutOfBounds { east: 1.0, north: 2.0 }.is_boundary());
        assert!(!EnvironmentError::Unavailable("timeout".into()).is_boundary());
    }
}
