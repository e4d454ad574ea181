//! Semantic unit types for type-safe physical quantity handling
//!
//! The Rothermel equations are stated in imperial units (ft/min, lb/ft², BTU)
//! while the grid, terrain and weather data are metric. These newtypes keep the
//! two worlds apart so a wind speed in m/s can never be fed where ft/min is
//! expected.
//!
//! # Design Philosophy
//! - All quantities use f64; the spread equations chain several powers and
//!   exponentials and the original formulation is double precision
//! - `Deref` to the raw f64 for arithmetic inside formulas
//! - Total ordering via `Ord` (NaN handled as greater than all values)
//! - Explicit conversion methods between related types
//! - Serde support for serialization
//!
//! # Usage
//! ```
//! use perimeter_sim_core::core_types::units::{FeetPerMinute, MetersPerSecond};
//!
//! let wind = MetersPerSecond::new(1.0);
//! let wind_fpm: FeetPerMinute = wind.into();
//! assert!((*wind_fpm - 196.85).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Div, Mul, Sub};

/// Metres in one foot
const METERS_PER_FOOT: f64 = 0.3048;

/// Feet in one metre
const FEET_PER_METER: f64 = 3.28084;

/// Seconds in one minute
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Shared impls for every unit newtype: total ordering, `Deref` to f64,
/// raw conversions and `Display` with the unit suffix.
macro_rules! unit_type {
    ($name:ident, $suffix:expr) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }

        impl PartialEq<f64> for $name {
            fn eq(&self, other: &f64) -> bool {
                self.0 == *other
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.3}{}", self.0, $suffix)
            }
        }

        impl $name {
            /// Get the raw f64 value
            #[inline]
            #[must_use]
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

/// Additive impls for quantities where summing two values is meaningful.
macro_rules! additive_unit {
    ($name:ident) => {
        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: $name) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl Div<f64> for $name {
            type Output = $name;
            fn div(self, rhs: f64) -> $name {
                $name(self.0 / rhs)
            }
        }
    };
}

// ============================================================================
// ANGLES
// ============================================================================

/// Angle or compass bearing in degrees
///
/// Bearings are measured clockwise from true north (0° = N, 90° = E).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(f64);

unit_type!(Degrees, "°");
additive_unit!(Degrees);

impl Degrees {
    /// North bearing
    pub const NORTH: Degrees = Degrees(0.0);
    /// East bearing
    pub const EAST: Degrees = Degrees(90.0);
    /// South bearing
    pub const SOUTH: Degrees = Degrees(180.0);
    /// West bearing
    pub const WEST: Degrees = Degrees(270.0);

    /// Create an angle in degrees (any finite value)
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Degrees(value)
    }

    /// Convert to radians
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }

    /// Wrap into the compass range [0, 360)
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Self {
        let wrapped = self.0.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if wrapped >= 360.0 {
            Degrees(0.0)
        } else {
            Degrees(wrapped)
        }
    }

    /// Signed shortest rotation from `self` to `other`, in (-180, 180]
    #[must_use]
    pub fn signed_difference(self, other: Degrees) -> Degrees {
        let diff = (other.0 - self.0).rem_euclid(360.0);
        if diff > 180.0 {
            Degrees(diff - 360.0)
        } else {
            Degrees(diff)
        }
    }
}

// ============================================================================
// SPATIAL / TEMPORAL
// ============================================================================

/// Distance in metres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f64);

unit_type!(Meters, " m");
additive_unit!(Meters);

impl Meters {
    /// Create a new distance in metres. Asserts value >= 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Meters::new: negative distance is invalid");
        Meters(value)
    }
}

/// Simulated time span in minutes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Minutes(f64);

unit_type!(Minutes, " min");
additive_unit!(Minutes);

impl Minutes {
    /// Zero elapsed time
    pub const ZERO: Minutes = Minutes(0.0);

    /// Create a time span in minutes. Asserts value >= 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Minutes::new: negative duration is invalid");
        Minutes(value)
    }
}

// ============================================================================
// SPEEDS
// ============================================================================

/// Speed in metres per second (wind data)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerSecond(f64);

unit_type!(MetersPerSecond, " m/s");

impl MetersPerSecond {
    /// Create a speed in m/s. Asserts value >= 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "MetersPerSecond::new: negative speed is invalid");
        MetersPerSecond(value)
    }

    /// Convert to feet per minute
    #[inline]
    #[must_use]
    pub fn to_feet_per_minute(self) -> FeetPerMinute {
        FeetPerMinute(self.0 * FEET_PER_METER * SECONDS_PER_MINUTE)
    }
}

impl From<MetersPerSecond> for FeetPerMinute {
    fn from(v: MetersPerSecond) -> FeetPerMinute {
        v.to_feet_per_minute()
    }
}

/// Speed in feet per minute (Rothermel native unit)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct FeetPerMinute(f64);

unit_type!(FeetPerMinute, " ft/min");
additive_unit!(FeetPerMinute);

impl FeetPerMinute {
    /// Create a speed in ft/min (no validation, formulas may pass through zero)
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        FeetPerMinute(value)
    }

    /// Convert to metres per minute
    #[inline]
    #[must_use]
    pub fn to_meters_per_minute(self) -> MetersPerMinute {
        MetersPerMinute(self.0 * METERS_PER_FOOT)
    }

    /// Convert to metres per second
    #[inline]
    #[must_use]
    pub fn to_meters_per_second(self) -> MetersPerSecond {
        MetersPerSecond(self.0 / FEET_PER_METER / SECONDS_PER_MINUTE)
    }
}

impl From<FeetPerMinute> for MetersPerMinute {
    fn from(v: FeetPerMinute) -> MetersPerMinute {
        v.to_meters_per_minute()
    }
}

/// Rate of spread in metres per minute
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerMinute(f64);

unit_type!(MetersPerMinute, " m/min");
additive_unit!(MetersPerMinute);

impl MetersPerMinute {
    /// Stationary front
    pub const ZERO: MetersPerMinute = MetersPerMinute(0.0);

    /// Create a rate in m/min
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MetersPerMinute(value)
    }

    /// Distance covered over a time span
    #[inline]
    #[must_use]
    pub fn distance_over(self, time: Minutes) -> Meters {
        Meters(self.0 * time.0)
    }
}

// ============================================================================
// FRACTIONS
// ============================================================================

/// Dimensionless fraction, e.g. fuel moisture content (kg water / kg dry fuel)
///
/// Values above 1 are physically possible for live fuel moisture, so only
/// negative values are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Fraction(f64);

unit_type!(Fraction, "");

impl Fraction {
    /// Create a fraction. Asserts value >= 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Fraction::new: negative fraction is invalid");
        Fraction(value)
    }

    /// Convert a percentage (e.g. a moisture raster value of 85) to a fraction
    #[inline]
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        Fraction(percent / 100.0)
    }

    /// Express as a percentage
    #[inline]
    #[must_use]
    pub fn as_percent(self) -> f64 {
        self.0 * 100.0
    }
}
