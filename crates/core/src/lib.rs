//! Wildfire Perimeter Growth Core Library
//!
//! Grows a fire outward from an ignition point over a square cell grid. Each
//! burning cell on the edge spreads at Rothermel (1972) surface-fire rates,
//! shaped into an ellipse by wind and slope, and ignites its neighbours once
//! its front crosses into them.
//!
//! ## Layout
//!
//! - `core_types`: units, fuel models, grid coordinates, weather
//! - `physics`: Rothermel spread equations and the elliptical spread shape
//! - `grid`: terrain, rasters, the fuel catalog and the [`EnvironmentQuery`] seam
//! - `simulation`: [`FireSimulation`], control lines and perimeter output

// Core types and utilities
pub mod core_types;
pub mod error;

// Spread physics and world data
pub mod grid;
pub mod physics;

// Perimeter growth
pub mod simulation;

// Re-export core types
pub use core_types::{
    Degrees, Direction, FuelModel, GridCoordinate, GridGeometry, Meters, MetersPerMinute,
    MetersPerSecond, Minutes, SpreadPattern, WeatherSnapshot, WorldPoint, WorldPoint3,
};
pub use error::{EnvironmentError, SimulationError};

// Re-export world and physics types
pub use grid::{
    EnvironmentQuery, FuelCatalog, Raster, RasterEnvironment, TerrainData, TerrainSample,
    UniformEnvironment,
};
pub use physics::{spread_rates, Slope, SpreadInputs, SpreadRates};

// Re-export simulation types
pub use simulation::{
    ControlLine, ControlLineRegistry, FireNode, FireSimulation, PerimeterPoint, PerimeterSink,
    PerimeterSnapshot, SimulationConfig, SimulationId, SimulationStats, TracingSink,
};
