//! Terrain elevation and topography
//!
//! A regular elevation grid anchored at world (0, 0) with bilinear height
//! queries and Horn's method slope and aspect. Queries outside the grid fail
//! with [`EnvironmentError::OutOfBounds`]; that is how the fire learns where
//! the modelled world ends.

use crate::core_types::position::WorldPoint;
use crate::core_types::units::Degrees;
use crate::error::EnvironmentError;
use crate::physics::Slope;
use serde::{Deserialize, Serialize};

/// Terrain data structure holding elevation information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainData {
    /// Width of terrain in meters (east)
    width: f64,
    /// Height of terrain in meters (north)
    height: f64,
    /// Grid resolution in meters per sample
    resolution: f64,
    /// Number of elevation samples in X direction
    nx: usize,
    /// Number of elevation samples in Y direction
    ny: usize,
    /// Elevation data in meters (row-major order: [y * nx + x])
    elevations: Vec<f64>,
    min_elevation: f64,
    max_elevation: f64,
}

/// Sample counts for a grid covering `width` x `height`, two or more per axis
fn grid_samples(width: f64, height: f64, resolution: f64) -> Result<(usize, usize), EnvironmentError> {
    let extent_ok = |extent: f64| extent.is_finite() && extent >= 0.0;
    if !(resolution.is_finite() && resolution > 0.0) || !extent_ok(width) || !extent_ok(height) {
        return Err(EnvironmentError::Malformed(format!(
            "terrain of {width} x {height} m at {resolution} m resolution"
        )));
    }

    let samples = |extent: f64| ((extent / resolution).ceil() as usize + 1).max(2);
    Ok((samples(width), samples(height)))
}

impl TerrainData {
    /// Create flat terrain at given elevation
    ///
    /// # Errors
    /// [`EnvironmentError::Malformed`] for a non-positive resolution or a
    /// negative or non-finite extent.
    pub fn flat(width: f64, height: f64, resolution: f64, elevation: f64) -> Result<Self, EnvironmentError> {
        let (nx, ny) = grid_samples(width, height, resolution)?;

        Ok(TerrainData {
            width,
            height,
            resolution,
            nx,
            ny,
            elevations: vec![elevation; nx * ny],
            min_elevation: elevation,
            max_elevation: elevation,
        })
    }

    /// Create terrain with a single Gaussian hill in the middle
    ///
    /// # Errors
    /// Same as [`TerrainData::flat`].
    pub fn single_hill(
        width: f64,
        height: f64,
        resolution: f64,
        base_elevation: f64,
        hill_height: f64,
        hill_radius: f64,
    ) -> Result<Self, EnvironmentError> {
        let (nx, ny) = grid_samples(width, height, resolution)?;
        let center_x = width / 2.0;
        let center_y = height / 2.0;

        let mut elevations = Vec::with_capacity(nx * ny);
        for iy in 0..ny {
            for ix in 0..nx {
                let dx = ix as f64 * resolution - center_x;
                let dy = iy as f64 * resolution - center_y;
                let dist_sq = dx * dx + dy * dy;
                elevations.push(base_elevation + hill_height * (-dist_sq / (hill_radius * hill_radius)).exp());
            }
        }

        Ok(Self::from_samples(width, height, resolution, nx, ny, elevations))
    }

    /// Create terrain from a heightmap array
    ///
    /// # Arguments
    /// * `width` - Width of terrain in meters
    /// * `height` - Height of terrain in meters
    /// * `heightmap` - Row-major samples `[y * nx + x]`, row 0 at the south edge
    /// * `nx`, `ny` - Sample counts, at least 2 each
    /// * `elevation_scale` - Multiplier for heightmap values
    /// * `base_elevation` - Base elevation added to all heights
    ///
    /// # Errors
    /// [`EnvironmentError::Malformed`] when the sample count does not match
    /// `nx × ny` or either dimension has fewer than two samples.
    pub fn from_heightmap(
        width: f64,
        height: f64,
        heightmap: &[f64],
        nx: usize,
        ny: usize,
        elevation_scale: f64,
        base_elevation: f64,
    ) -> Result<Self, EnvironmentError> {
        if nx < 2 || ny < 2 {
            return Err(EnvironmentError::Malformed(format!(
                "heightmap needs at least 2x2 samples, got {nx}x{ny}"
            )));
        }
        if heightmap.len() != nx * ny {
            return Err(EnvironmentError::Malformed(format!(
                "heightmap has {} samples, expected {}",
                heightmap.len(),
                nx * ny
            )));
        }

        let resolution = width / (nx - 1) as f64;
        let elevations = heightmap
            .iter()
            .map(|&h| base_elevation + h * elevation_scale)
            .collect();

        Ok(Self::from_samples(width, height, resolution, nx, ny, elevations))
    }

    fn from_samples(
        width: f64,
        height: f64,
        resolution: f64,
        nx: usize,
        ny: usize,
        elevations: Vec<f64>,
    ) -> Self {
        let (min_elevation, max_elevation) = elevations
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &e| (lo.min(e), hi.max(e)));

        TerrainData {
            width,
            height,
            resolution,
            nx,
            ny,
            elevations,
            min_elevation,
            max_elevation,
        }
    }

    /// Whether a world position lies on the terrain
    pub fn contains(&self, point: WorldPoint) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Elevation at a world position using bilinear interpolation
    ///
    /// # Errors
    /// [`EnvironmentError::OutOfBounds`] outside the terrain extent.
    pub fn elevation_at(&self, point: WorldPoint) -> Result<f64, EnvironmentError> {
        if !self.contains(point) {
            return Err(EnvironmentError::OutOfBounds {
                east: point.x,
                north: point.y,
            });
        }
        Ok(self.interpolate(point.x, point.y))
    }

    /// Bilinear interpolation with the position clamped onto the grid
    fn interpolate(&self, x: f64, y: f64) -> f64 {
        let gx = x.clamp(0.0, self.width) / self.resolution;
        let gy = y.clamp(0.0, self.height) / self.resolution;

        // A one-sample axis (only reachable through deserialized data) is constant along it
        let ix0 = (gx.floor() as usize).min(self.nx.saturating_sub(2));
        let iy0 = (gy.floor() as usize).min(self.ny.saturating_sub(2));
        let ix1 = (ix0 + 1).min(self.nx - 1);
        let iy1 = (iy0 + 1).min(self.ny - 1);

        let fx = gx - ix0 as f64;
        let fy = gy - iy0 as f64;

        let e00 = self.elevations[iy0 * self.nx + ix0];
        let e10 = self.elevations[iy0 * self.nx + ix1];
        let e01 = self.elevations[iy1 * self.nx + ix0];
        let e11 = self.elevations[iy1 * self.nx + ix1];

        let e0 = e00 * (1.0 - fx) + e10 * fx;
        let e1 = e01 * (1.0 - fx) + e11 * fx;
        e0 * (1.0 - fy) + e1 * fy
    }

    /// Horn's method gradient (∂z/∂east, ∂z/∂north)
    ///
    /// # Scientific Reference
    /// Horn, B.K.P. (1981). "Hill Shading and the Reflectance Map."
    /// Proceedings of the IEEE, 69(1), 14-47.
    fn horn_gradient(&self, x: f64, y: f64) -> (f64, f64) {
        let d = self.resolution;

        // NW N NE / W C E / SW S SE; neighbours past the edge are clamped
        let nw = self.interpolate(x - d, y + d);
        let north = self.interpolate(x, y + d);
        let ne = self.interpolate(x + d, y + d);
        let west = self.interpolate(x - d, y);
        let east = self.interpolate(x + d, y);
        let sw = self.interpolate(x - d, y - d);
        let south = self.interpolate(x, y - d);
        let se = self.interpolate(x + d, y - d);

        let dz_dx = ((ne + 2.0 * east + se) - (nw + 2.0 * west + sw)) / (8.0 * d);
        let dz_dy = ((nw + 2.0 * north + ne) - (sw + 2.0 * south + se)) / (8.0 * d);
        (dz_dx, dz_dy)
    }

    /// Slope angle and upslope bearing at a world position
    ///
    /// # Errors
    /// [`EnvironmentError::OutOfBounds`] outside the terrain extent.
    pub fn slope_at(&self, point: WorldPoint) -> Result<Slope, EnvironmentError> {
        if !self.contains(point) {
            return Err(EnvironmentError::OutOfBounds {
                east: point.x,
                north: point.y,
            });
        }

        let (dz_dx, dz_dy) = self.horn_gradient(point.x, point.y);
        let angle = dz_dx.hypot(dz_dy).atan().to_degrees();
        // Steepest ascent; bearing is clockwise from north so east is the first atan2 argument
        let upslope = dz_dx.atan2(dz_dy).to_degrees();

        Ok(Slope::new(Degrees::new(angle), Degrees::new(upslope)))
    }

    /// Aspect (direction the slope faces, downhill) at a world position
    ///
    /// # Errors
    /// [`EnvironmentError::OutOfBounds`] outside the terrain extent.
    pub fn aspect_at(&self, point: WorldPoint) -> Result<Degrees, EnvironmentError> {
        let slope = self.slope_at(point)?;
        Ok((slope.upslope_bearing + Degrees::SOUTH).normalized())
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn min_elevation(&self) -> f64 {
        self.min_elevation
    }

    pub fn max_elevation(&self) -> f64 {
        self.max_elevation
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }
}
