//! Wind conditions frozen at ignition
//!
//! A simulation queries the wind once, at the ignition point, and holds it for
//! its whole life. Wind variability over the run is deliberately not modelled:
//! every node's spread rates are derived from the same snapshot.

use crate::core_types::units::{Degrees, FeetPerMinute, MetersPerSecond};
use serde::{Deserialize, Serialize};

/// Wind at the ignition point at the moment of ignition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Midflame wind speed
    pub wind_speed: MetersPerSecond,
    /// Direction the wind is blowing towards, clockwise from true north
    pub wind_bearing: Degrees,
}

impl WeatherSnapshot {
    /// Create a snapshot, wrapping the bearing into [0, 360)
    pub fn new(wind_speed: MetersPerSecond, wind_bearing: Degrees) -> Self {
        Self {
            wind_speed,
            wind_bearing: wind_bearing.normalized(),
        }
    }

    /// Still air
    pub fn calm() -> Self {
        Self::new(MetersPerSecond::new(0.0), Degrees::NORTH)
    }

    /// Wind speed in the Rothermel native unit
    pub fn wind_speed_feet_per_minute(&self) -> FeetPerMinute {
        self.wind_speed.to_feet_per_minute()
    }
}

impl Default for WeatherSnapshot {
    fn default() -> Self {
        Self::calm()
    }
}
