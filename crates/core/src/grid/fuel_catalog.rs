//! Fuel model catalog
//!
//! Maps the numeric fuel model ids found in fuel rasters to [`FuelModel`]
//! parameter sets, and looks models up by code for the non-burnable check.
//!
//! # Standard numbering
//! - 1-13: Anderson (1982) models, e.g. 1 = short grass, 3 = tall grass
//! - 91-99: Scott & Burgan non-burnable models (NB1 urban ... NB9 bare ground)
//! - 101-204: Scott & Burgan burnable models, e.g. 102 = GR2, 145 = SH5

use crate::core_types::fuel::{FuelModel, FuelModelRow};
use crate::error::EnvironmentError;
use rustc_hash::FxHashMap;

/// Scott & Burgan (2005) standard fire behaviour fuel models
///
/// Loads in tons/acre, SAV in 1/ft, depth in ft, extinction moisture in %.
/// A 0 SAV marks a class the model carries no load in.
const SCOTT_AND_BURGAN: [FuelModelRow; 40] = [
    FuelModelRow {
        code: "GR1",
        number: 101,
        name: "Short, sparse dry climate grass",
        loads: [0.10, 0.00, 0.00, 0.30, 0.00],
        sav: [2200.0, 2000.0, 0.0],
        depth: 0.4,
        extinction_moisture: 15.0,
    },
    FuelModelRow {
        code: "GR2",
        number: 102,
        name: "Low load, dry climate grass",
        loads: [0.10, 0.00, 0.00, 1.00, 0.00],
        sav: [2000.0, 1800.0, 0.0],
        depth: 1.0,
        extinction_moisture: 15.0,
    },
    FuelModelRow {
        code: "GR3",
        number: 103,
        name: "Low load, very coarse, humid climate grass",
        loads: [0.10, 0.40, 0.00, 1.50, 0.00],
        sav: [1500.0, 1300.0, 0.0],
        depth: 2.0,
        extinction_moisture: 30.0,
    },
    FuelModelRow {
        code: "GR4",
        number: 104,
        name: "Moderate load, dry climate grass",
        loads: [0.25, 0.00, 0.00, 1.90, 0.00],
        sav: [2000.0, 1800.0, 0.0],
        depth: 2.0,
        extinction_moisture: 15.0,
    },
    FuelModelRow {
        code: "GR5",
        number: 105,
        name: "Low load, humid climate grass",
        loads: [0.40, 0.00, 0.00, 2.50, 0.00],
        sav: [1800.0, 1600.0, 0.0],
        depth: 1.5,
        extinction_moisture: 40.0,
    },
    FuelModelRow {
        code: "GR6",
        number: 106,
        name: "Moderate load, humid climate grass",
        loads: [0.10, 0.00, 0.00, 3.40, 0.00],
        sav: [2200.0, 2000.0, 0.0],
        depth: 1.5,
        extinction_moisture: 40.0,
    },
    FuelModelRow {
        code: "GR7",
        number: 107,
        name: "High load, dry climate grass",
        loads: [1.00, 0.00, 0.00, 5.40, 0.00],
        sav: [2000.0, 1800.0, 0.0],
        depth: 3.0,
        extinction_moisture: 15.0,
    },
    FuelModelRow {
        code: "GR8",
        number: 108,
        name: "High load, very coarse, humid climate grass",
        loads: [0.50, 1.00, 0.00, 7.30, 0.00],
        sav: [1500.0, 1300.0, 0.0],
        depth: 4.0,
        extinction_moisture: 30.0,
    },
    FuelModelRow {
        code: "GR9",
        number: 109,
        name: "Very high load, humid climate grass",
        loads: [1.00, 1.00, 0.00, 9.00, 0.00],
        sav: [1800.0, 1600.0, 0.0],
        depth: 5.0,
        extinction_moisture: 40.0,
    },
    FuelModelRow {
        code: "GS1",
        number: 121,
        name: "Low load, dry climate grass-shrub",
        loads: [0.20, 0.00, 0.00, 0.50, 0.65],
        sav: [2000.0, 1800.0, 1800.0],
        depth: 0.9,
        extinction_moisture: 15.0,
    },
    FuelModelRow {
        code: "GS2",
        number: 122,
        name: "Moderate load, dry climate grass-shrub",
        loads: [0.50, 0.50, 0.00, 0.60, 1.00],
        sav: [2000.0, 1800.0, 1800.0],
        depth: 1.5,
        extinction_moisture: 15.0,
    },
    FuelModelRow {
        code: "GS3",
        number: 123,
        name: "Moderate load, humid climate grass-shrub",
        loads: [0.30, 0.25, 0.00, 1.45, 1.25],
        sav: [1800.0, 1600.0, 1600.0],
        depth: 1.8,
        extinction_moisture: 40.0,
    },
    FuelModelRow {
        code: "GS4",
        number: 124,
        name: "High load, humid climate grass-shrub",
        loads: [1.90, 0.30, 0.10, 3.40, 7.10],
        sav: [1800.0, 1600.0, 1600.0],
        depth: 2.1,
        extinction_moisture: 40.0,
    },
    FuelModelRow {
        code: "SH1",
        number: 141,
        name: "Low load, dry climate shrub",
        loads: [0.25, 0.25, 0.00, 0.15, 1.30],
        sav: [2000.0, 1800.0, 1600.0],
        depth: 1.0,
        extinction_moisture: 15.0,
    },
    FuelModelRow {
        code: "SH2",
        number: 142,
        name: "Moderate load, dry climate shrub",
        loads: [1.35, 2.40, 0.75, 0.00, 3.85],
        sav: [2000.0, 0.0, 1600.0],
        depth: 1.0,
        extinction_moisture: 15.0,
    },
    FuelModelRow {
        code: "SH3",
        number: 143,
        name: "Moderate load, humid climate shrub",
        loads: [0.45, 3.00, 0.00, 0.00, 6.20],
        sav: [1600.0, 0.0, 1400.0],
        depth: 2.4,
        extinction_moisture: 40.0,
    },
    FuelModelRow {
        code: "SH4",
        number: 144,
        name: "Low load, humid climate timber-shrub",
        loads: [0.85, 1.15, 0.20, 0.00, 2.55],
        sav: [2000.0, 1800.0, 1600.0],
        depth: 3.0,
        extinction_moisture: 30.0,
    },
    FuelModelRow {
        code: "SH5",
        number: 145,
        name: "High load, dry climate shrub",
        loads: [3.60, 2.10, 0.00, 0.00, 2.90],
        sav: [750.0, 0.0, 1600.0],
        depth: 6.0,
        extinction_moisture: 15.0,
    },
    FuelModelRow {
        code: "SH6",
        number: 146,
        name: "Low load, humid climate shrub",
        loads: [2.90, 1.45, 0.00, 0.00, 1.40],
        sav: [750.0, 0.0, 1600.0],
        depth: 2.0,
        extinction_moisture: 30.0,
    },
    FuelModelRow {
        code: "SH7",
        number: 147,
        name: "Very high load, dry climate shrub",
        loads: [3.50, 5.30, 2.20, 0.00, 3.40],
        sav: [750.0, 0.0, 1600.0],
        depth: 6.0,
        extinction_moisture: 15.0,
    },
    FuelModelRow {
        code: "SH8",
        number: 148,
        name: "High load, humid climate shrub",
        loads: [2.05, 3.40, 0.85, 0.00, 4.35],
        sav: [750.0, 0.0, 1600.0],
        depth: 3.0,
        extinction_moisture: 40.0,
    },
    FuelModelRow {
        code: "SH9",
        number: 149,
        name: "Very high load, humid climate shrub",
        loads: [4.50, 2.45, 0.00, 1.55, 7.00],
        sav: [750.0, 1800.0, 1500.0],
        depth: 4.4,
        extinction_moisture: 40.0,
    },
    FuelModelRow {
        code: "TU1",
        number: 161,
        name: "Low load, dry climate timber-grass-shrub",
        loads: [0.20, 0.90, 1.50, 0.20, 0.90],
        sav: [2000.0, 1800.0, 1600.0],
        depth: 0.6,
        extinction_moisture: 20.0,
    },
    FuelModelRow {
        code: "TU2",
        number: 162,
        name: "Moderate load, humid climate timber-shrub",
        loads: [0.95, 1.80, 1.25, 0.00, 0.20],
        sav: [2000.0, 0.0, 1600.0],
        depth: 1.0,
        extinction_moisture: 30.0,
    },
    FuelModelRow {
        code: "TU3",
        number: 163,
        name: "Moderate load, humid climate timber-grass-shrub",
        loads: [1.10, 0.15, 0.25, 0.65, 1.10],
        sav: [1800.0, 1600.0, 1400.0],
        depth: 1.3,
        extinction_moisture: 30.0,
    },
    FuelModelRow {
        code: "TU4",
        number: 164,
        name: "Dwarf conifer with understory",
        loads: [4.50, 0.00, 0.00, 0.00, 2.00],
        sav: [2300.0, 0.0, 2000.0],
        depth: 0.5,
        extinction_moisture: 12.0,
    },
    FuelModelRow {
        code: "TU5",
        number: 165,
        name: "Very high load, dry climate timber-shrub",
        loads: [4.00, 4.00, 3.00, 0.00, 3.00],
        sav: [1500.0, 0.0, 750.0],
        depth: 1.0,
        extinction_moisture: 25.0,
    },
    FuelModelRow {
        code: "TL1",
        number: 181,
        name: "Low load compact conifer litter",
        loads: [1.00, 2.20, 3.60, 0.00, 0.00],
        sav: [2000.0, 0.0, 0.0],
        depth: 0.2,
        extinction_moisture: 30.0,
    },
    FuelModelRow {
        code: "TL2",
        number: 182,
        name: "Low load broadleaf litter",
        loads: [1.40, 2.30, 2.20, 0.00, 0.00],
        sav: [2000.0, 0.0, 0.0],
        depth: 0.2,
        extinction_moisture: 25.0,
    },
    FuelModelRow {
        code: "TL3",
        number: 183,
        name: "Moderate load conifer litter",
        loads: [0.50, 2.20, 2.80, 0.00, 0.00],
        sav: [2000.0, 0.0, 0.0],
        depth: 0.3,
        extinction_moisture: 20.0,
    },
    FuelModelRow {
        code: "TL4",
        number: 184,
        name: "Small downed logs",
        loads: [0.50, 1.50, 4.20, 0.00, 0.00],
        sav: [2000.0, 0.0, 0.0],
        depth: 0.4,
        extinction_moisture: 25.0,
    },
    FuelModelRow {
        code: "TL5",
        number: 185,
        name: "High load conifer litter",
        loads: [1.15, 2.50, 4.40, 0.00, 0.00],
        sav: [2000.0, 0.0, 0.0],
        depth: 0.6,
        extinction_moisture: 25.0,
    },
    FuelModelRow {
        code: "TL6",
        number: 186,
        name: "Moderate load broadleaf litter",
        loads: [2.40, 1.20, 1.20, 0.00, 0.00],
        sav: [2000.0, 0.0, 0.0],
        depth: 0.3,
        extinction_moisture: 25.0,
    },
    FuelModelRow {
        code: "TL7",
        number: 187,
        name: "Large downed logs",
        loads: [0.30, 1.40, 8.10, 0.00, 0.00],
        sav: [2000.0, 0.0, 0.0],
        depth: 0.4,
        extinction_moisture: 25.0,
    },
    FuelModelRow {
        code: "TL8",
        number: 188,
        name: "Long-needle litter",
        loads: [5.80, 1.40, 1.10, 0.00, 0.00],
        sav: [1800.0, 0.0, 0.0],
        depth: 0.3,
        extinction_moisture: 35.0,
    },
    FuelModelRow {
        code: "TL9",
        number: 189,
        name: "Very high load broadleaf litter",
        loads: [6.65, 3.30, 4.15, 0.00, 0.00],
        sav: [1800.0, 0.0, 0.0],
        depth: 0.6,
        extinction_moisture: 35.0,
    },
    FuelModelRow {
        code: "SB1",
        number: 201,
        name: "Low load activity fuel",
        loads: [1.50, 3.00, 11.00, 0.00, 0.00],
        sav: [2000.0, 0.0, 0.0],
        depth: 1.0,
        extinction_moisture: 25.0,
    },
    FuelModelRow {
        code: "SB2",
        number: 202,
        name: "Moderate load activity fuel or low load blowdown",
        loads: [4.50, 4.25, 4.00, 0.00, 0.00],
        sav: [2000.0, 0.0, 0.0],
        depth: 1.0,
        extinction_moisture: 25.0,
    },
    FuelModelRow {
        code: "SB3",
        number: 203,
        name: "High load activity fuel or moderate load blowdown",
        loads: [5.50, 2.75, 3.00, 0.00, 0.00],
        sav: [2000.0, 0.0, 0.0],
        depth: 1.2,
        extinction_moisture: 25.0,
    },
    FuelModelRow {
        code: "SB4",
        number: 204,
        name: "High load blowdown",
        loads: [5.25, 3.50, 5.25, 0.00, 0.00],
        sav: [2000.0, 0.0, 0.0],
        depth: 2.7,
        extinction_moisture: 25.0,
    },
];

/// Fuel model lookup by number and by code
#[derive(Debug, Clone, Default)]
pub struct FuelCatalog {
    by_number: FxHashMap<u16, FuelModel>,
    numbers_by_code: FxHashMap<String, u16>,
}

impl FuelCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of the built-in standard fuel models
    ///
    /// Anderson FM1 and FM3, the five Scott & Burgan non-burnable models and
    /// all forty Scott & Burgan burnable models.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for model in [
            FuelModel::short_grass(),
            FuelModel::tall_grass(),
            FuelModel::urban(),
            FuelModel::non_burnable("NB2", 92, "Snow/ice"),
            FuelModel::agricultural(),
            FuelModel::open_water(),
            FuelModel::bare_ground(),
        ] {
            catalog.insert(model);
        }
        for row in &SCOTT_AND_BURGAN {
            catalog.insert(FuelModel::from_row(row));
        }
        catalog
    }

    /// Add or replace a model, keyed by its number and code
    pub fn insert(&mut self, model: FuelModel) {
        if let Some(previous) = self.by_number.get(&model.number) {
            self.numbers_by_code.remove(&previous.code);
        }
        self.numbers_by_code.insert(model.code.clone(), model.number);
        self.by_number.insert(model.number, model);
    }

    pub fn by_number(&self, number: u16) -> Option<&FuelModel> {
        self.by_number.get(&number)
    }

    pub fn by_code(&self, code: &str) -> Option<&FuelModel> {
        self.numbers_by_code
            .get(code)
            .and_then(|number| self.by_number.get(number))
    }

    /// Model for a raster value
    ///
    /// # Errors
    /// [`EnvironmentError::UnknownFuelModel`] if the number is not in the catalog.
    pub fn resolve(&self, number: u16) -> Result<&FuelModel, EnvironmentError> {
        self.by_number(number)
            .ok_or(EnvironmentError::UnknownFuelModel(number))
    }

    pub fn len(&self) -> usize {
        self.by_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog() {
        let catalog = FuelCatalog::standard();

        assert_eq!(catalog.by_number(1).map(|m| m.code.as_str()), Some("FM1"));
        assert_eq!(catalog.by_code("GR2").map(|m| m.number), Some(102));
        assert_eq!(catalog.by_code("NB2").map(|m| m.name.as_str()), Some("Snow/ice"));
        assert!(catalog.by_number(7).is_none());
        assert_eq!(catalog.len(), 47);
    }

    #[test]
    fn test_every_scott_and_burgan_model_resolves() {
        let catalog = FuelCatalog::standard();
        let families = [
            ("GR", 101..=109),
            ("GS", 121..=124),
            ("SH", 141..=149),
            ("TU", 161..=165),
            ("TL", 181..=189),
            ("SB", 201..=204),
        ];

        for (family, numbers) in families {
            for number in numbers {
                let model = catalog.resolve(number).unwrap();
                assert!(model.code.starts_with(family), "{} under number {number}", model.code);
                assert!(model.total_fuel_load() > 0.0);
                assert!(model.characteristic_sav > 0.0);
                assert!(model.fuel_bed_depth > 0.0);
            }
        }
        assert_eq!(catalog.by_code("TL1").map(|m| m.number), Some(181));
    }

    #[test]
    fn test_resolve_unknown_number() {
        let catalog = FuelCatalog::standard();
        assert_eq!(
            catalog.resolve(250).unwrap_err(),
            EnvironmentError::UnknownFuelModel(250)
        );
        assert!(catalog.resolve(98).is_ok());
    }

    #[test]
    fn test_insert_replaces_code_index() {
        let mut catalog = FuelCatalog::new();
        assert!(catalog.is_empty());

        catalog.insert(FuelModel::short_grass());
        let mut renamed = FuelModel::tall_grass();
        renamed.number = 1;
        catalog.insert(renamed);

        assert_eq!(catalog.len(), 1);
        assert!(catalog.by_code("FM1").is_none());
        assert_eq!(catalog.by_code("FM3").map(|m| m.number), Some(1));
    }
}
