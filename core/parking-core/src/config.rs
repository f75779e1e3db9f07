//! Runtime configuration: the per-class price table and optional start-up
//! lot dimensions.
//!
//! Loaded from `~/.parking-lot/config.toml` unless a path is given. A missing
//! file is not an error; every section falls back to the built-in defaults.

use std::path::{Path, PathBuf};

use parking_protocol::VehicleClass;
use serde::{Deserialize, Serialize};

use crate::error::{ParkingError, Result};

const DEFAULT_CONFIG_RELATIVE_PATH: &str = ".parking-lot/config.toml";

/// Prices charged for one vehicle class. Fixed for the life of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassPrices {
    /// Per started hour within the final day.
    pub parking: u64,
    /// Per collision with a wall, pillar or vehicle.
    pub hit: u64,
    /// Per full 24-hour block.
    pub overnight: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceTable {
    pub bike: ClassPrices,
    pub motorbike: ClassPrices,
    pub car: ClassPrices,
    pub truck: ClassPrices,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            bike: ClassPrices {
                parking: 2,
                hit: 0,
                overnight: 5,
            },
            motorbike: ClassPrices {
                parking: 3,
                hit: 10,
                overnight: 5,
            },
            car: ClassPrices {
                parking: 4,
                hit: 20,
                overnight: 10,
            },
            truck: ClassPrices {
                parking: 10,
                hit: 50,
                overnight: 20,
            },
        }
    }
}

impl PriceTable {
    pub fn for_class(&self, class: VehicleClass) -> ClassPrices {
        match class {
            VehicleClass::Bike => self.bike,
            VehicleClass::Motorbike => self.motorbike,
            VehicleClass::Car => self.car,
            VehicleClass::Truck => self.truck,
        }
    }
}

/// Lot dimensions applied at start-up. Both must be present to take effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LotDefaults {
    pub length: Option<usize>,
    pub width: Option<usize>,
}

impl LotDefaults {
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        match (self.width, self.length) {
            (Some(width), Some(length)) => Some((width, length)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParkingConfig {
    pub prices: PriceTable,
    pub lot: LotDefaults,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_RELATIVE_PATH))
}

/// Loads configuration from `path`, or from the default location when
/// `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<ParkingConfig> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => return Ok(ParkingConfig::default()),
        },
    };

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config file; using defaults");
        return Ok(ParkingConfig::default());
    }

    let content = fs_err::read_to_string(&config_path).map_err(|source| ParkingError::Io {
        context: format!("reading config {}", config_path.display()),
        source,
    })?;
    toml::from_str::<ParkingConfig>(&content).map_err(|err| ParkingError::ConfigMalformed {
        path: config_path.clone(),
        details: err.to_string(),
    })
}
