//! World data: terrain, rasters, fuel models and the environment seam

pub mod environment;
pub mod fuel_catalog;
pub mod raster;
pub mod terrain;

pub use environment::{EnvironmentQuery, RasterEnvironment, TerrainSample, UniformEnvironment};
pub use fuel_catalog::FuelCatalog;
pub use raster::Raster;
pub use terrain::TerrainData;
