//! Surface fire spread physics
//!
//! `rothermel` holds the Rothermel (1972) equations, `elliptical` turns the
//! head fire into a rate for every compass direction. [`spread_rates`] chains
//! the two for one cell.

pub mod elliptical;
pub mod rothermel;

pub use elliptical::{elliptical_spread, SpreadEllipse};
pub use rothermel::{maximum_spread, zero_wind_zero_slope_rate, MaximumSpread, Slope};

use crate::core_types::fuel::FuelModel;
use crate::core_types::spatial::Direction;
use crate::core_types::units::{FeetPerMinute, Fraction, MetersPerMinute};
use crate::core_types::weather::WeatherSnapshot;
use std::collections::BTreeMap;

/// Everything the spread equations need to know about one cell
#[derive(Debug, Clone, Copy)]
pub struct SpreadInputs<'a> {
    pub fuel: &'a FuelModel,
    pub moisture: Fraction,
    pub weather: &'a WeatherSnapshot,
    pub slope: Slope,
}

/// Spread behaviour of one cell
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadRates {
    pub base_rate: FeetPerMinute,
    pub maximum: MaximumSpread,
    pub effective_wind_speed: FeetPerMinute,
    pub per_direction: BTreeMap<Direction, FeetPerMinute>,
}

impl SpreadRates {
    /// Per-direction rates in metres per minute
    pub fn metric(&self) -> BTreeMap<Direction, MetersPerMinute> {
        self.per_direction
            .iter()
            .map(|(&direction, &rate)| (direction, rate.to_meters_per_minute()))
            .collect()
    }

    /// Whether any direction spreads at all
    pub fn can_spread(&self) -> bool {
        self.per_direction.values().any(|rate| **rate > 0.0)
    }
}

/// Rates of spread from a cell along each of `directions`
pub fn spread_rates(inputs: &SpreadInputs<'_>, directions: &[Direction]) -> SpreadRates {
    let base_rate = zero_wind_zero_slope_rate(inputs.fuel, inputs.moisture);
    let maximum = maximum_spread(inputs.fuel, inputs.moisture, inputs.weather, &inputs.slope);
    let effective_wind_speed = rothermel::effective_wind_speed(
        inputs.fuel,
        inputs.moisture,
        inputs.weather,
        &inputs.slope,
    );

    SpreadRates {
        base_rate,
        maximum,
        effective_wind_speed,
        per_direction: elliptical_spread(maximum, effective_wind_speed, directions),
    }
}
