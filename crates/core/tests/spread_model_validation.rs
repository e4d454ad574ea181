//! Spread Model Validation Suite
//!
//! Checks the Rothermel (1972) surface spread model and the elliptical
//! per-direction rates against the qualitative behaviour reported in the
//! literature:
//!
//! - **Rothermel (1972)**: USDA Forest Service Research Paper INT-115
//! - **Albini (1976)**: Estimating wildfire behavior and effects, INT-30
//! - **Anderson (1983)**: Predicting wind-driven wild land fire size and shape
//! - **Scott & Burgan (2005)**: Standard fire behavior fuel models, RMRS-GTR-153
//!
//! Run tests with: cargo test --test `spread_model_validation`

use perimeter_sim_core::{
    core_types::units::Fraction,
    physics::{maximum_spread, zero_wind_zero_slope_rate},
    spread_rates, Degrees, Direction, FuelCatalog, FuelModel, MetersPerSecond, Slope,
    SpreadInputs, TerrainData, WeatherSnapshot, WorldPoint,
};

fn head_rate(fuel: &FuelModel, moisture: f64, weather: &WeatherSnapshot, slope: Slope) -> f64 {
    *maximum_spread(fuel, Fraction::new(moisture), weather, &slope).rate
}

// ═══════════════════════════════════════════════════════════════════════════════
// Fuel moisture
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_rate_falls_with_moisture() {
    let fuel = FuelModel::short_grass();
    let mut previous = f64::INFINITY;

    for percent in [2.0, 4.0, 6.0, 8.0, 10.0] {
        let rate = *zero_wind_zero_slope_rate(&fuel, Fraction::from_percent(percent));
        assert!(rate > 0.0, "{percent}% moisture should still burn");
        assert!(rate < previous, "rate should fall as moisture rises ({percent}%)");
        previous = rate;
    }

    // Moisture of extinction for FM1 is 12%
    assert_eq!(*zero_wind_zero_slope_rate(&fuel, Fraction::from_percent(12.0)), 0.0);
    assert_eq!(*zero_wind_zero_slope_rate(&fuel, Fraction::from_percent(20.0)), 0.0);
}

#[test]
fn test_standard_catalog_burnability() {
    let catalog = FuelCatalog::standard();
    let dry = Fraction::new(0.05);

    let burnable: Vec<&FuelModel> = (1..=250)
        .filter_map(|number| catalog.by_number(number))
        .filter(|fuel| !fuel.code.starts_with("NB"))
        .collect();
    assert_eq!(burnable.len(), 42);
    for fuel in burnable {
        assert!(*zero_wind_zero_slope_rate(fuel, dry) > 0.0, "{} should carry fire", fuel.code);
    }
    for code in ["NB1", "NB2", "NB3", "NB8", "NB9"] {
        let fuel = catalog.by_code(code).expect("standard fuel");
        assert_eq!(*zero_wind_zero_slope_rate(fuel, dry), 0.0, "{code} should not burn");
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Wind and slope
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_rate_rises_with_wind() {
    let fuel = FuelModel::tall_grass();
    let mut previous = 0.0;

    for speed in [0.0, 1.0, 2.0, 4.0, 8.0, 12.0] {
        let weather = WeatherSnapshot::new(MetersPerSecond::new(speed), Degrees::EAST);
        let rate = head_rate(&fuel, 0.06, &weather, Slope::flat());
        // Non-decreasing: above the reliable wind speed the rate plateaus
        assert!(rate >= previous, "rate dropped at {speed} m/s");
        previous = rate;
    }

    let calm = head_rate(&fuel, 0.06, &WeatherSnapshot::calm(), Slope::flat());
    assert!(previous > calm * 3.0, "strong wind should multiply the spread rate");
}

#[test]
fn test_fire_runs_up_a_hill() {
    let terrain = TerrainData::single_hill(1000.0, 1000.0, 25.0, 0.0, 150.0, 200.0).expect("valid grid");
    // East flank of the hill: uphill is west
    let slope = terrain.slope_at(WorldPoint::new(650.0, 500.0)).expect("inside terrain");

    assert!(*slope.angle > 5.0, "flank should be noticeably steep, got {}", slope.angle);
    assert!(
        slope.upslope_bearing.signed_difference(Degrees::WEST).abs() < 5.0,
        "upslope bearing {} should point west",
        slope.upslope_bearing
    );

    let fuel = FuelModel::short_grass();
    let weather = WeatherSnapshot::calm();
    let rates = spread_rates(
        &SpreadInputs {
            fuel: &fuel,
            moisture: Fraction::new(0.06),
            weather: &weather,
            slope,
        },
        &Direction::CARDINAL,
    );

    assert!(rates.per_direction[&Direction::West] > rates.per_direction[&Direction::East]);
    assert!(rates.maximum.rate > rates.base_rate);
}

#[test]
fn test_wind_shapes_ellipse() {
    let fuel = FuelModel::short_grass();
    let weather = WeatherSnapshot::new(MetersPerSecond::new(4.0), Degrees::NORTH);
    let rates = spread_rates(
        &SpreadInputs {
            fuel: &fuel,
            moisture: Fraction::new(0.06),
            weather: &weather,
            slope: Slope::flat(),
        },
        &Direction::ALL,
    );

    let north = rates.per_direction[&Direction::North];
    let south = rates.per_direction[&Direction::South];
    let east = rates.per_direction[&Direction::East];
    let west = rates.per_direction[&Direction::West];

    assert_eq!(north, rates.maximum.rate);
    assert!(north > rates.per_direction[&Direction::NorthEast]);
    assert!(rates.per_direction[&Direction::NorthEast] > east);
    assert!(east > south);
    assert!((*east - *west).abs() < 1e-9 * *east.max(west));
}
