//! Rothermel Surface Fire Spread Model (1972)
//!
//! Pure functions over a fuel model, a fuel moisture fraction, the wind and
//! the local slope. Everything here is stated in the Rothermel native units:
//! loads in lb/ft², depths in ft, σ in 1/ft, intensities in BTU/(ft²·min) and
//! rates in ft/min. Callers convert at the boundary.
//!
//! Degenerate fuels (σ = 0, no depth, no load, relative packing ratio 0) and
//! fuel at or above its moisture of extinction produce a rate of 0. These are
//! legitimate "cannot burn" states, not errors.
//!
//! # References
//! - Rothermel, R.C. (1972). "A mathematical model for predicting fire spread in wildland fuels."
//!   USDA Forest Service Research Paper INT-115.
//! - Albini, F.A. (1976). "Estimating wildfire behavior and effects."
//!   USDA Forest Service General Technical Report INT-30.
//! - Andrews, P.L. (2018). "The Rothermel surface fire spread model and associated developments."
//!   USDA Forest Service General Technical Report RMRS-GTR-371.

use crate::core_types::fuel::{
    FuelModel, EFFECTIVE_MINERAL_CONTENT, HEAT_CONTENT, TOTAL_MINERAL_CONTENT,
};
use crate::core_types::units::{Degrees, FeetPerMinute, Fraction};
use crate::core_types::weather::WeatherSnapshot;
use serde::{Deserialize, Serialize};

/// Below this characteristic σ (1/ft) the net fuel load is weighted to zero
const MIN_WEIGHTED_SAV: f64 = 16.0;

/// Terrain slope at a point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Slope {
    /// Inclination from horizontal
    pub angle: Degrees,
    /// Bearing pointing uphill, clockwise from true north
    pub upslope_bearing: Degrees,
}

impl Slope {
    /// Level ground
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn new(angle: Degrees, upslope_bearing: Degrees) -> Self {
        Self {
            angle,
            upslope_bearing: upslope_bearing.normalized(),
        }
    }
}

/// Head fire rate and the bearing it travels along
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaximumSpread {
    pub rate: FeetPerMinute,
    pub bearing: Degrees,
}

/// Zero-wind, zero-slope rate of spread R₀
///
/// # Formula
/// ```text
/// R₀ = I_R × ξ / (ρ_b × ε × Q_ig)
/// ```
///
/// Returns 0 when either the propagating flux or the heat sink is 0.
pub fn zero_wind_zero_slope_rate(fuel: &FuelModel, moisture: Fraction) -> FeetPerMinute {
    let flux = propagating_flux(fuel, moisture);
    let sink = heat_sink(fuel, moisture);

    if flux == 0.0 || sink == 0.0 {
        return FeetPerMinute::new(0.0);
    }

    FeetPerMinute::new(flux / sink)
}

/// Whether this fuel can carry a fire at this moisture
pub fn can_burn(fuel: &FuelModel, moisture: Fraction) -> bool {
    *zero_wind_zero_slope_rate(fuel, moisture) > 0.0
}

/// No-wind, no-slope propagating flux I_R × ξ, BTU/(ft²·min)
pub fn propagating_flux(fuel: &FuelModel, moisture: Fraction) -> f64 {
    reaction_intensity(fuel, moisture) * propagating_flux_ratio(fuel)
}

/// Heat sink ρ_b × ε × Q_ig, BTU/ft³
pub fn heat_sink(fuel: &FuelModel, moisture: Fraction) -> f64 {
    fuel.mean_bulk_density() * effective_heating_number(fuel) * heat_of_preignition(moisture)
}

/// Effective heating number ε = exp(-138 / σ), 0 when σ is 0
pub fn effective_heating_number(fuel: &FuelModel) -> f64 {
    if fuel.characteristic_sav == 0.0 {
        return 0.0;
    }
    (-138.0 / fuel.characteristic_sav).exp()
}

/// Heat of pre-ignition Q_ig = 250 + 1116 M_f, BTU/lb
pub fn heat_of_preignition(moisture: Fraction) -> f64 {
    250.0 + 1116.0 * *moisture
}

/// Reaction intensity I_R, BTU/(ft²·min)
///
/// # Formula
/// ```text
/// I_R = Γ' × w_n × h × η_M × η_s
/// ```
///
/// Where:
/// - **Γ'** = Optimum reaction velocity (1/min)
/// - **w_n** = Net fuel load (lb/ft²), weighted to 0 for σ < 16
/// - **h** = Heat content (BTU/lb)
/// - **η_M** = Moisture damping coefficient (0-1)
/// - **η_s** = Mineral damping coefficient (0-1)
pub fn reaction_intensity(fuel: &FuelModel, moisture: Fraction) -> f64 {
    let net_load = net_fuel_load(fuel.oven_dry_fuel_load()) * net_fuel_load_weighting(fuel);
    let moisture_damping =
        moisture_damping_coefficient(moisture, fuel.dead_fuel_moisture_of_extinction);

    optimum_reaction_velocity(fuel)
        * net_load
        * HEAT_CONTENT
        * moisture_damping
        * mineral_damping_coefficient()
}

/// Net fuel load w_n = w₀ (1 - S_T)
fn net_fuel_load(oven_dry_load: f64) -> f64 {
    oven_dry_load * (1.0 - TOTAL_MINERAL_CONTENT)
}

fn net_fuel_load_weighting(fuel: &FuelModel) -> f64 {
    if fuel.characteristic_sav < MIN_WEIGHTED_SAV {
        0.0
    } else {
        1.0
    }
}

/// Optimum reaction velocity Γ' (1/min)
///
/// # Formula
/// ```text
/// Γ' = Γ'_max × (β/β_op)^A × exp(A × (1 - β/β_op))
/// A  = 133 × σ^-0.7913
/// ```
pub fn optimum_reaction_velocity(fuel: &FuelModel) -> f64 {
    let sigma = fuel.characteristic_sav;
    let relative_packing = fuel.relative_packing_ratio;

    if sigma == 0.0 || relative_packing == 0.0 {
        return 0.0;
    }

    let a = 133.0 * sigma.powf(-0.7913);

    maximum_reaction_velocity(sigma)
        * relative_packing.powf(a)
        * (a * (1.0 - relative_packing)).exp()
}

/// Maximum reaction velocity Γ'_max = σ^1.5 / (495 + 0.0594 σ^1.5)
pub fn maximum_reaction_velocity(sigma: f64) -> f64 {
    if sigma == 0.0 {
        return 0.0;
    }
    let sigma_15 = sigma.powf(1.5);
    sigma_15 / (495.0 + 0.0594 * sigma_15)
}

/// Moisture damping coefficient η_M
///
/// # Formula
/// ```text
/// r_M = min(M_f / M_x, 1)
/// η_M = 1 - 2.59 r_M + 5.11 r_M² - 3.52 r_M³
/// ```
///
/// Exactly 0 once the fuel reaches its moisture of extinction, and for a
/// fuel with no moisture of extinction at all.
pub fn moisture_damping_coefficient(moisture: Fraction, extinction: f64) -> f64 {
    if extinction <= 0.0 {
        return 0.0;
    }

    let ratio = (*moisture / extinction).min(1.0);
    if ratio >= 1.0 {
        return 0.0;
    }

    1.0 - 2.59 * ratio + 5.11 * ratio.powi(2) - 3.52 * ratio.powi(3)
}

/// Mineral damping coefficient η_s = min(0.174 S_e^-0.19, 1)
pub fn mineral_damping_coefficient() -> f64 {
    (0.174 * EFFECTIVE_MINERAL_CONTENT.powf(-0.19)).min(1.0)
}

/// Propagating flux ratio ξ
///
/// # Formula
/// ```text
/// ξ = exp((0.792 + 0.681 σ^0.5)(β + 0.1)) / (192 + 0.2595 σ)
/// ```
///
/// Where β is the mean packing ratio of the bed.
pub fn propagating_flux_ratio(fuel: &FuelModel) -> f64 {
    let sigma = fuel.characteristic_sav;
    let beta = fuel.mean_packing_ratio();

    ((0.792 + 0.681 * sigma.sqrt()) * (beta + 0.1)).exp() / (192.0 + 0.2595 * sigma)
}

/// Empirical wind coefficients C, B and E, all functions of σ
#[derive(Debug, Clone, Copy)]
struct WindCoefficients {
    c: f64,
    b: f64,
    e: f64,
}

impl WindCoefficients {
    fn for_fuel(fuel: &FuelModel) -> Self {
        let sigma = fuel.characteristic_sav;
        Self {
            c: 7.47 * (-0.133 * sigma.powf(0.55)).exp(),
            b: 0.02526 * sigma.powf(0.54),
            e: 0.715 * (-3.59e-4 * sigma).exp(),
        }
    }
}

/// Maximum reliable wind speed, 0.9 × I_R
///
/// Beyond this the rate of spread is modelled as constant.
pub fn maximum_reliable_wind_speed(reaction_intensity: f64) -> FeetPerMinute {
    FeetPerMinute::new(0.9 * reaction_intensity)
}

/// Wind factor Φ_w
///
/// # Formula
/// ```text
/// Φ_w = C × U^B × (β/β_op)^-E
/// ```
///
/// U is the midflame wind speed in ft/min, capped at the maximum reliable
/// wind speed.
pub fn wind_factor(fuel: &FuelModel, moisture: Fraction, wind_speed: FeetPerMinute) -> f64 {
    if fuel.relative_packing_ratio == 0.0 || fuel.characteristic_sav == 0.0 {
        return 0.0;
    }

    let coefficients = WindCoefficients::for_fuel(fuel);
    let cap = maximum_reliable_wind_speed(reaction_intensity(fuel, moisture));
    let u = wind_speed.min(cap).max(FeetPerMinute::new(0.0));

    coefficients.c
        * u.powf(coefficients.b)
        * fuel.relative_packing_ratio.powf(-coefficients.e)
}

/// Slope factor Φ_s
///
/// # Formula
/// ```text
/// Φ_s = 5.275 × β^-0.3 × tan²(θ)
/// ```
pub fn slope_factor(fuel: &FuelModel, slope_angle: Degrees) -> f64 {
    let beta = fuel.packing_ratio();
    if beta == 0.0 {
        return 0.0;
    }

    5.275 * beta.powf(-0.3) * slope_angle.to_radians().tan().powi(2)
}

/// Effective midflame wind speed U_E
///
/// The wind speed that alone would produce the combined wind and slope
/// effect:
///
/// ```text
/// U_E = ((Φ_w + Φ_s) × (β/β_op)^E / C)^(1/B)
/// ```
pub fn effective_wind_speed(
    fuel: &FuelModel,
    moisture: Fraction,
    weather: &WeatherSnapshot,
    slope: &Slope,
) -> FeetPerMinute {
    let phi = wind_factor(fuel, moisture, weather.wind_speed_feet_per_minute())
        + slope_factor(fuel, slope.angle);
    let coefficients = WindCoefficients::for_fuel(fuel);

    if phi <= 0.0 || coefficients.c == 0.0 || coefficients.b == 0.0 {
        return FeetPerMinute::new(0.0);
    }

    let base = phi * fuel.relative_packing_ratio.powf(coefficients.e) / coefficients.c;
    FeetPerMinute::new(base.powf(1.0 / coefficients.b))
}

/// Head fire rate and bearing from vector-composed wind and slope effects
///
/// For elapsed time t the slope vector has magnitude D_s = R₀Φ_s along the
/// upslope bearing and the wind vector has magnitude D_w = R₀Φ_w at angle w
/// from upslope. The resultant is (D_s + D_w cos w, D_w sin w) with
/// magnitude D_h, and the head fire rate is R₀ + D_h.
///
/// The bearing is resolved from the upslope bearing: when the slope bearing
/// is at or clockwise of the wind bearing the resultant offset is subtracted,
/// otherwise it is added. Bearings are compared along the shorter arc, so a
/// slope of 10° and a wind of 350° count as slope clockwise of wind.
pub fn maximum_spread(
    fuel: &FuelModel,
    moisture: Fraction,
    weather: &WeatherSnapshot,
    slope: &Slope,
) -> MaximumSpread {
    let r0 = *zero_wind_zero_slope_rate(fuel, moisture);
    let slope_bearing = slope.upslope_bearing.normalized();

    let ds = r0 * slope_factor(fuel, slope.angle);
    let dw = r0 * wind_factor(fuel, moisture, weather.wind_speed_feet_per_minute());

    // Signed rotation from upslope to wind; <= 0 means slope bearing >= wind bearing
    let w = slope_bearing.signed_difference(weather.wind_bearing);
    let w_rad = w.to_radians().abs();

    let x = ds + dw * w_rad.cos();
    let y = dw * w_rad.sin();
    let dh = x.hypot(y);

    // Angle of the resultant away from upslope, in [0, 180]
    let offset = y.abs().atan2(x).to_degrees();

    let bearing = if *w <= 0.0 {
        Degrees::new(*slope_bearing - offset)
    } else {
        Degrees::new(*slope_bearing + offset)
    };

    MaximumSpread {
        rate: FeetPerMinute::new(r0 + dh),
        bearing: bearing.normalized(),
    }
}
