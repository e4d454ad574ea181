//! Core types and utilities

pub mod fuel;
pub mod position;
pub mod spatial;
pub mod units;
pub mod weather;

pub use fuel::FuelModel;
pub use position::{Vec2, WorldPoint, WorldPoint3};
pub use spatial::{Direction, GridCoordinate, GridGeometry, SpreadPattern};
pub use units::{
    Degrees, FeetPerMinute, Fraction, Meters, MetersPerMinute, MetersPerSecond, Minutes,
};
pub use weather::WeatherSnapshot;
