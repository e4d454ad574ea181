use serde::{Deserialize, Serialize};

/// Low heat content of the fuel, BTU/lb (standard fuel models use 8000 for all classes)
pub const HEAT_CONTENT: f64 = 8000.0;

/// Total mineral content, fraction (S_T)
pub const TOTAL_MINERAL_CONTENT: f64 = 0.0555;

/// Effective (silica-free) mineral content, fraction (S_e)
pub const EFFECTIVE_MINERAL_CONTENT: f64 = 0.01;

/// Oven-dry particle density, lb/ft³ (ρ_p)
pub const PARTICLE_DENSITY: f64 = 32.0;

/// tons/acre to lb/ft²
pub const TONS_PER_ACRE: f64 = 2000.0 / 43_560.0;

/// Surface-area-to-volume ratios of the 10-h and 100-h dead classes, 1/ft
const TEN_HOUR_SAV: f64 = 109.0;
const HUNDRED_HOUR_SAV: f64 = 30.0;

/// One row of a published fuel model table, in the units the tables use
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelModelRow {
    pub code: &'static str,
    pub number: u16,
    pub name: &'static str,
    /// tons/acre: 1-h, 10-h, 100-h, live herb, live woody
    pub loads: [f64; 5],
    /// 1/ft: 1-h, live herb, live woody
    pub sav: [f64; 3],
    /// ft
    pub depth: f64,
    /// percent
    pub extinction_moisture: f64,
}

/// Surface fire behaviour fuel model
///
/// Parameters follow the standard fire behaviour fuel model tables
/// (Anderson 1982, Scott & Burgan 2005) in the Rothermel native units:
/// loads in lb/ft², depths in ft, surface-area-to-volume ratios in 1/ft.
/// A fuel model is fetched per coordinate and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelModel {
    // Identification
    pub code: String,   // e.g. "GR2", "NB8" - checked against the non-burnable set
    pub number: u16,    // numeric model id used by fuel rasters
    pub name: String,

    // Fuel bed
    pub fuel_load: Vec<f64>,                   // lb/ft² per size class (1h, 10h, 100h, live herb, live woody)
    pub fuel_bed_depth: f64,                   // ft
    pub characteristic_sav: f64,               // σ, 1/ft
    pub dead_fuel_moisture_of_extinction: f64, // M_x, fraction
    pub relative_packing_ratio: f64,           // β/β_op
    pub bulk_density: f64,                     // ρ_b, lb/ft³
}

impl FuelModel {
    /// Oven-dry fuel load w₀ (lb/ft²)
    pub fn oven_dry_fuel_load(&self) -> f64 {
        self.fuel_bed_depth * self.bulk_density
    }

    /// Mean bulk density ρ_b = Σw / δ (lb/ft³), 0 for a bed with no depth
    pub fn mean_bulk_density(&self) -> f64 {
        if self.fuel_bed_depth == 0.0 {
            return 0.0;
        }
        self.total_fuel_load() / self.fuel_bed_depth
    }

    /// Optimum packing ratio β_op = 3.348 σ^-0.8189
    pub fn optimum_packing_ratio(&self) -> f64 {
        if self.characteristic_sav == 0.0 {
            return 0.0;
        }
        3.348 * self.characteristic_sav.powf(-0.8189)
    }

    /// Packing ratio β = (β/β_op) × β_op
    pub fn packing_ratio(&self) -> f64 {
        self.relative_packing_ratio * self.optimum_packing_ratio()
    }

    /// Mean packing ratio β̄ = w₀ / (δ ρ_p)
    ///
    /// Returns 0 for a bed with no depth or no fuel.
    pub fn mean_packing_ratio(&self) -> f64 {
        let load = self.oven_dry_fuel_load();
        if self.fuel_bed_depth == 0.0 || load == 0.0 {
            return 0.0;
        }
        (1.0 / self.fuel_bed_depth) * (load / PARTICLE_DENSITY)
    }

    /// Total fuel load across all size classes (lb/ft²)
    pub fn total_fuel_load(&self) -> f64 {
        self.fuel_load.iter().sum()
    }

    /// Build a non-burnable model (NB series): no load, no depth, no SAV.
    pub fn non_burnable(code: &str, number: u16, name: &str) -> Self {
        FuelModel {
            code: code.to_string(),
            number,
            name: name.to_string(),
            fuel_load: vec![0.0; 5],
            fuel_bed_depth: 0.0,
            characteristic_sav: 0.0,
            dead_fuel_moisture_of_extinction: 0.0,
            relative_packing_ratio: 0.0,
            bulk_density: 0.0,
        }
    }

    /// Model from a table row
    ///
    /// Loads are converted to lb/ft². The characteristic SAV is the
    /// surface-area weighted mean over all classes, bulk density is the
    /// total load over depth, and the relative packing ratio follows from
    /// both.
    pub fn from_row(row: &FuelModelRow) -> Self {
        let fuel_load: Vec<f64> = row.loads.iter().map(|tons| tons * TONS_PER_ACRE).collect();
        let [one_hour, herb, woody] = row.sav;
        let savs = [one_hour, TEN_HOUR_SAV, HUNDRED_HOUR_SAV, herb, woody];

        let area: f64 = fuel_load.iter().zip(savs).map(|(w, sigma)| w * sigma).sum();
        let characteristic_sav = if area > 0.0 {
            fuel_load
                .iter()
                .zip(savs)
                .map(|(w, sigma)| w * sigma * sigma)
                .sum::<f64>()
                / area
        } else {
            0.0
        };

        let mut model = FuelModel {
            code: row.code.to_string(),
            number: row.number,
            name: row.name.to_string(),
            fuel_load,
            fuel_bed_depth: row.depth,
            characteristic_sav,
            dead_fuel_moisture_of_extinction: row.extinction_moisture / 100.0,
            relative_packing_ratio: 0.0,
            bulk_density: 0.0,
        };
        model.bulk_density = model.mean_bulk_density();
        let optimum = model.optimum_packing_ratio();
        if optimum > 0.0 {
            model.relative_packing_ratio = model.bulk_density / PARTICLE_DENSITY / optimum;
        }
        model
    }

    // ========================================================================
    // Standard fuel models
    // ========================================================================

    /// Anderson FM1 - short grass (1 ft)
    ///
    /// Fine, continuous cured grass. Fastest spreading standard model.
    pub fn short_grass() -> Self {
        FuelModel {
            code: "FM1".to_string(),
            number: 1,
            name: "Short grass".to_string(),
            fuel_load: vec![0.034, 0.0, 0.0, 0.0, 0.0],
            fuel_bed_depth: 1.0,
            characteristic_sav: 3500.0,
            dead_fuel_moisture_of_extinction: 0.12,
            relative_packing_ratio: 0.25,
            bulk_density: 0.034,
        }
    }

    /// Anderson FM3 - tall grass (2.5 ft)
    pub fn tall_grass() -> Self {
        FuelModel {
            code: "FM3".to_string(),
            number: 3,
            name: "Tall grass".to_string(),
            fuel_load: vec![0.138, 0.0, 0.0, 0.0, 0.0],
            fuel_bed_depth: 2.5,
            characteristic_sav: 1500.0,
            dead_fuel_moisture_of_extinction: 0.25,
            relative_packing_ratio: 0.21,
            bulk_density: 0.055,
        }
    }

    /// NB1 - urban/developed
    pub fn urban() -> Self {
        Self::non_burnable("NB1", 91, "Urban/developed")
    }

    /// NB3 - agricultural
    pub fn agricultural() -> Self {
        Self::non_burnable("NB3", 93, "Agricultural")
    }

    /// NB8 - open water
    pub fn open_water() -> Self {
        Self::non_burnable("NB8", 98, "Open water")
    }

    /// NB9 - bare ground
    pub fn bare_ground() -> Self {
        Self::non_burnable("NB9", 99, "Bare ground")
    }
}
