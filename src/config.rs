use crate::error::{ConfigError, PersistError};
use crate::lattice::{Lattice, MAX_MESH_LENGTH};
use crate::walker::MAX_WIND_LEVEL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete run configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowflakeConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Radius of the hexagonal region walkers live in
    pub mesh_length: u32,
    /// Cluster size at which growth stops, origin included
    pub nucleus_upper_limit: usize,
    /// Directional bias in `[0, 1/6]`, 0 = isotropic
    pub wind_level: f64,
    /// Fixed RNG seed for reproducible runs; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SnowflakeConfig {
    /// Check the parameters the engine refuses to run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=MAX_WIND_LEVEL).contains(&self.wind_level) {
            return Err(ConfigError::InvalidWindLevel(self.wind_level));
        }
        if self.mesh_length > MAX_MESH_LENGTH {
            return Err(ConfigError::MeshTooLarge {
                mesh_length: self.mesh_length,
                max: MAX_MESH_LENGTH,
            });
        }
        if self.nucleus_upper_limit == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Lattice::new(self.mesh_length).capacity_check(self.nucleus_upper_limit)
    }

    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| PersistError::io(path, e))
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).map_err(|e| PersistError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Default for SnowflakeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            mesh_length: 90,
            nucleus_upper_limit: 3000,
            wind_level: 0.0,
            seed: None,
        }
    }
}
