//! Environment data seam
//!
//! The simulation never reads terrain, fuel or weather directly. It asks an
//! [`EnvironmentQuery`] about a world position and gets back the fuel model,
//! fuel moisture, wind and terrain there. Two providers ship with the crate:
//! [`UniformEnvironment`] (the same answer everywhere, useful for tests and
//! calibration) and [`RasterEnvironment`] (terrain grid plus fuel and
//! moisture rasters).

use crate::core_types::fuel::FuelModel;
use crate::core_types::position::WorldPoint;
use crate::core_types::units::{Degrees, Fraction};
use crate::core_types::weather::WeatherSnapshot;
use crate::error::EnvironmentError;
use crate::grid::fuel_catalog::FuelCatalog;
use crate::grid::raster::Raster;
use crate::grid::terrain::TerrainData;
use crate::physics::Slope;
use serde::{Deserialize, Serialize};

/// Terrain at one point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TerrainSample {
    /// Metres above datum
    pub elevation: f64,
    pub slope: Slope,
}

impl TerrainSample {
    pub fn slope_angle(&self) -> Degrees {
        self.slope.angle
    }

    pub fn slope_bearing(&self) -> Degrees {
        self.slope.upslope_bearing
    }
}

/// Source of fuel, moisture, wind and terrain data
///
/// Implementations are shared across rayon workers while a step constructs
/// new perimeter nodes, so every method takes `&self`.
pub trait EnvironmentQuery: Send + Sync {
    /// Fuel model at a position
    ///
    /// # Errors
    /// Any [`EnvironmentError`]; `OutOfBounds` marks the edge of the world.
    fn fuel_model(&self, at: WorldPoint) -> Result<FuelModel, EnvironmentError>;

    /// Fuel moisture content as a fraction of dry weight
    ///
    /// # Errors
    /// Any [`EnvironmentError`].
    fn fuel_moisture(&self, at: WorldPoint) -> Result<Fraction, EnvironmentError>;

    /// Midflame wind at a position
    ///
    /// # Errors
    /// Any [`EnvironmentError`].
    fn wind(&self, at: WorldPoint) -> Result<WeatherSnapshot, EnvironmentError>;

    /// Elevation and slope at a position
    ///
    /// # Errors
    /// Any [`EnvironmentError`]; `OutOfBounds` marks the edge of the world.
    fn terrain(&self, at: WorldPoint) -> Result<TerrainSample, EnvironmentError>;
}

// ============================================================================
// Uniform environment
// ============================================================================

/// Same fuel, moisture, wind and slope everywhere
///
/// Optionally bounded to a rectangle; outside it every query fails with
/// [`EnvironmentError::OutOfBounds`].
#[derive(Debug, Clone)]
pub struct UniformEnvironment {
    fuel: FuelModel,
    moisture: Fraction,
    weather: WeatherSnapshot,
    terrain: TerrainSample,
    bounds: Option<(WorldPoint, WorldPoint)>,
}

impl UniformEnvironment {
    /// Flat, unbounded world at elevation 0
    pub fn new(fuel: FuelModel, moisture: Fraction, weather: WeatherSnapshot) -> Self {
        Self {
            fuel,
            moisture,
            weather,
            terrain: TerrainSample::default(),
            bounds: None,
        }
    }

    pub fn with_slope(mut self, slope: Slope) -> Self {
        self.terrain.slope = slope;
        self
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.terrain.elevation = elevation;
        self
    }

    /// Restrict the world to the rectangle spanned by two corners
    pub fn with_bounds(mut self, a: WorldPoint, b: WorldPoint) -> Self {
        let min = WorldPoint::new(a.x.min(b.x), a.y.min(b.y));
        let max = WorldPoint::new(a.x.max(b.x), a.y.max(b.y));
        self.bounds = Some((min, max));
        self
    }

    fn check_bounds(&self, at: WorldPoint) -> Result<(), EnvironmentError> {
        match self.bounds {
            Some((min, max)) if at.x < min.x || at.y < min.y || at.x > max.x || at.y > max.y => {
                Err(EnvironmentError::OutOfBounds {
                    east: at.x,
                    north: at.y,
                })
            }
            _ => Ok(()),
        }
    }
}

impl EnvironmentQuery for UniformEnvironment {
    fn fuel_model(&self, at: WorldPoint) -> Result<FuelModel, EnvironmentError> {
        self.check_bounds(at)?;
        Ok(self.fuel.clone())
    }

    fn fuel_moisture(&self, at: WorldPoint) -> Result<Fraction, EnvironmentError> {
        self.check_bounds(at)?;
        Ok(self.moisture)
    }

    fn wind(&self, at: WorldPoint) -> Result<WeatherSnapshot, EnvironmentError> {
        self.check_bounds(at)?;
        Ok(self.weather)
    }

    fn terrain(&self, at: WorldPoint) -> Result<TerrainSample, EnvironmentError> {
        self.check_bounds(at)?;
        Ok(self.terrain)
    }
}

// ============================================================================
// Raster environment
// ============================================================================

/// Terrain grid, fuel-number raster and moisture raster
///
/// Moisture is stored in percent, the way moisture services report it, and
/// converted to a fraction on lookup. Wind is a single field-wide value.
#[derive(Debug, Clone)]
pub struct RasterEnvironment {
    terrain: TerrainData,
    fuel_numbers: Raster<u16>,
    moisture_percent: Raster<f64>,
    catalog: FuelCatalog,
    weather: WeatherSnapshot,
}

impl RasterEnvironment {
    pub fn new(
        terrain: TerrainData,
        fuel_numbers: Raster<u16>,
        moisture_percent: Raster<f64>,
        catalog: FuelCatalog,
        weather: WeatherSnapshot,
    ) -> Self {
        Self {
            terrain,
            fuel_numbers,
            moisture_percent,
            catalog,
            weather,
        }
    }

    pub fn terrain_data(&self) -> &TerrainData {
        &self.terrain
    }

    pub fn catalog(&self) -> &FuelCatalog {
        &self.catalog
    }
}

impl EnvironmentQuery for RasterEnvironment {
    fn fuel_model(&self, at: WorldPoint) -> Result<FuelModel, EnvironmentError> {
        let number = self.fuel_numbers.sample(at)?;
        self.catalog.resolve(number).cloned()
    }

    fn fuel_moisture(&self, at: WorldPoint) -> Result<Fraction, EnvironmentError> {
        let percent = self.moisture_percent.sample(at)?;
        if !percent.is_finite() || percent < 0.0 {
            return Err(EnvironmentError::Malformed(format!(
                "fuel moisture {percent}% at ({:.1}, {:.1})",
                at.x, at.y
            )));
        }
        Ok(Fraction::from_percent(percent))
    }

    fn wind(&self, at: WorldPoint) -> Result<WeatherSnapshot, EnvironmentError> {
        if !self.terrain.contains(at) {
            return Err(EnvironmentError::OutOfBounds {
                east: at.x,
                north: at.y,
            });
        }
        Ok(self.weather)
    }

    fn terrain(&self, at: WorldPoint) -> Result<TerrainSample, EnvironmentError> {
        Ok(TerrainSample {
            elevation: self.terrain.elevation_at(at)?,
            slope: self.terrain.slope_at(at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::MetersPerSecond;
    use approx::assert_relative_eq;

    fn raster_world() -> RasterEnvironment {
        let mut fuel = Raster::filled(10, 10, 10.0, 1_u16);
        fuel.set(9, 9, 98);
        fuel.set(0, 9, 7);
        RasterEnvironment::new(
            TerrainData::flat(100.0, 100.0, 10.0, 250.0).unwrap(),
            fuel,
            Raster::filled(10, 10, 10.0, 8.0),
            FuelCatalog::standard(),
            WeatherSnapshot::new(MetersPerSecond::new(4.0), Degrees::EAST),
        )
    }

    #[test]
    fn test_uniform_answers_everywhere() {
        let env = UniformEnvironment::new(
            FuelModel::short_grass(),
            Fraction::new(0.06),
            WeatherSnapshot::calm(),
        )
        .with_elevation(120.0);

        let far = WorldPoint::new(-1.0e6, 3.0e6);
        assert_eq!(env.fuel_model(far).map(|f| f.code), Ok("FM1".to_string()));
        assert_eq!(env.terrain(far).map(|t| t.elevation), Ok(120.0));
    }

    #[test]
    fn test_uniform_bounds() {
        let env = UniformEnvironment::new(
            FuelModel::short_grass(),
            Fraction::new(0.06),
            WeatherSnapshot::calm(),
        )
        .with_bounds(WorldPoint::new(100.0, 100.0), WorldPoint::new(-100.0, -100.0));

        assert!(env.terrain(WorldPoint::new(100.0, -100.0)).is_ok());
        assert!(env.terrain(WorldPoint::new(100.1, 0.0)).unwrap_err().is_boundary());
        assert!(env.wind(WorldPoint::new(0.0, -250.0)).unwrap_err().is_boundary());
    }

    #[test]
    fn test_raster_lookups() {
        let env = raster_world();
        let at = WorldPoint::new(45.0, 45.0);

        assert_eq!(env.fuel_model(at).map(|f| f.number), Ok(1));
        assert_relative_eq!(*env.fuel_moisture(at).unwrap(), 0.08, epsilon = 1e-12);
        assert_eq!(env.terrain(at).map(|t| t.elevation), Ok(250.0));
        assert_eq!(env.wind(at).map(|w| w.wind_bearing), Ok(Degrees::EAST));

        let water = env.fuel_model(WorldPoint::new(95.0, 95.0)).unwrap();
        assert_eq!(water.code, "NB8");
    }

    #[test]
    fn test_raster_unknown_fuel_number() {
        let env = raster_world();
        assert_eq!(
            env.fuel_model(WorldPoint::new(5.0, 95.0)),
            Err(EnvironmentError::UnknownFuelModel(7))
        );
    }

    #[test]
    fn test_raster_out_of_bounds() {
        let env = raster_world();
        let outside = WorldPoint::new(150.0, 50.0);

        assert!(env.fuel_model(outside).unwrap_err().is_boundary());
        assert!(env.terrain(outside).unwrap_err().is_boundary());
        assert!(env.wind(outside).unwrap_err().is_boundary());
    }
}
