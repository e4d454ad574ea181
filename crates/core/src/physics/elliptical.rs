//! Elliptical fire growth (Anderson 1983, Alexander 1985)
//!
//! A point-source fire on uniform fuel grows as an ellipse whose long axis
//! follows the maximum spread bearing. The rate at any other bearing is read
//! off that ellipse with the ignition at its rear focus:
//!
//! ```text
//! L/W = 1 + 0.25 × U_E          (U_E in m/s)
//! e   = √((L/W)² - 1) / (L/W)
//! R(θ) = R_max × (1 - e) / (1 - e × cos θ)
//! ```
//!
//! θ is the angle between the queried bearing and the head fire bearing. At
//! θ = 0 the head rate R_max is returned unchanged; at θ = 180° it is the
//! backing rate R_max × (1 - e) / (1 + e).

use crate::core_types::spatial::Direction;
use crate::core_types::units::{Degrees, FeetPerMinute};
use crate::physics::rothermel::MaximumSpread;
use std::collections::BTreeMap;

/// Length-to-width ratio of the fire ellipse
pub fn length_to_width_ratio(effective_wind_speed: FeetPerMinute) -> f64 {
    1.0 + 0.25 * *effective_wind_speed.to_meters_per_second()
}

/// Eccentricity of an ellipse with the given length-to-width ratio
pub fn eccentricity(length_to_width: f64) -> f64 {
    if length_to_width <= 1.0 {
        return 0.0;
    }
    (length_to_width.powi(2) - 1.0).sqrt() / length_to_width
}

/// Fire ellipse anchored on the head fire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadEllipse {
    max_rate: FeetPerMinute,
    max_bearing: Degrees,
    eccentricity: f64,
}

impl SpreadEllipse {
    pub fn new(maximum: MaximumSpread, effective_wind_speed: FeetPerMinute) -> Self {
        Self {
            max_rate: maximum.rate,
            max_bearing: maximum.bearing.normalized(),
            eccentricity: eccentricity(length_to_width_ratio(effective_wind_speed)),
        }
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn max_rate(&self) -> FeetPerMinute {
        self.max_rate
    }

    pub fn max_bearing(&self) -> Degrees {
        self.max_bearing
    }

    /// Rate of spread along `bearing`
    pub fn rate_at(&self, bearing: Degrees) -> FeetPerMinute {
        let theta = self.max_bearing.signed_difference(bearing).to_radians();
        let e = self.eccentricity;
        let factor = (1.0 - e) / (1.0 - e * theta.cos());
        FeetPerMinute::new(*self.max_rate * factor)
    }

    /// Rate directly opposite the head fire
    pub fn backing_rate(&self) -> FeetPerMinute {
        let e = self.eccentricity;
        FeetPerMinute::new(*self.max_rate * (1.0 - e) / (1.0 + e))
    }
}

/// Rate of spread along each of `directions`
pub fn elliptical_spread(
    maximum: MaximumSpread,
    effective_wind_speed: FeetPerMinute,
    directions: &[Direction],
) -> BTreeMap<Direction, FeetPerMinute> {
    let ellipse = SpreadEllipse::new(maximum, effective_wind_speed);
    directions
        .iter()
        .map(|&direction| (direction, ellipse.rate_at(direction.bearing())))
        .collect()
}
