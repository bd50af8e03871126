use crate::config::SnowflakeConfig;
use crate::error::PersistError;
use crate::walker::MAX_WIND_LEVEL;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A named, reusable run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub config: SnowflakeConfig,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        mesh_length: u32,
        nucleus_upper_limit: usize,
        wind_level: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            config: SnowflakeConfig {
                mesh_length,
                nucleus_upper_limit,
                wind_level,
                ..Default::default()
            },
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the binary
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
    dir: Option<PathBuf>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    /// Built-in presets plus anything saved in the user config directory
    pub fn new() -> Self {
        Self::with_dir(Self::default_dir())
    }

    /// Like `new`, but reads and writes user presets in `dir`
    pub fn with_dir(dir: Option<PathBuf>) -> Self {
        let mut manager = Self {
            builtin: builtin_presets(),
            user: Vec::new(),
            dir,
        };
        manager.load_user_presets();
        manager
    }

    /// Get the default presets directory path
    fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("snowflake-dla").join("presets"))
    }

    /// Load user presets from disk, skipping files that fail to parse
    fn load_user_presets(&mut self) {
        let Some(dir) = &self.dir else {
            return;
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            match fs::read_to_string(&path)
                .map_err(|e| PersistError::io(&path, e))
                .and_then(|content| Ok(serde_json::from_str::<Preset>(&content)?))
            {
                Ok(preset) => {
                    debug!("Loaded preset {:?} from {}", preset.name, path.display());
                    self.user.push(preset);
                }
                Err(e) => warn!("Skipping preset file {}: {}", path.display(), e),
            }
        }
    }

    fn preset_path(&self, name: &str) -> Result<PathBuf, PersistError> {
        let dir = self.dir.as_ref().ok_or(PersistError::NoConfigDir)?;
        Ok(dir.join(format!("{}.json", sanitize(name))))
    }

    /// Save a preset to disk, replacing a user preset of the same name
    pub fn save_preset(&mut self, preset: Preset) -> Result<(), PersistError> {
        let path = self.preset_path(&preset.name)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| PersistError::io(dir, e))?;
        }

        let json = serde_json::to_string_pretty(&preset)?;
        fs::write(&path, json).map_err(|e| PersistError::io(&path, e))?;

        self.user.retain(|p| p.name != preset.name);
        self.user.push(preset);
        Ok(())
    }

    /// Delete a user preset
    pub fn delete_preset(&mut self, name: &str) -> Result<(), PersistError> {
        let path = self.preset_path(name)?;
        self.user.retain(|p| p.name != name);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| PersistError::io(&path, e))?;
        }
        Ok(())
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name, case-insensitively; user presets shadow built-ins
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.user
            .iter()
            .chain(self.builtin.iter())
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn preset_names(&self) -> Vec<&str> {
        self.all_presets().map(|p| p.name.as_str()).collect()
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset::new("Classic", "Still air, the reference snowflake", 90, 3000, 0.0),
        Preset::new("Seedling", "Small quick crystal for a first look", 30, 400, 0.0),
        Preset::new("Breeze", "Light wind leaning the arms westward", 90, 3000, 0.03),
        Preset::new("Gusty", "Strong wind, lopsided growth", 90, 3000, 0.08),
        Preset::new(
            "Gale",
            "Walkers never step east; growth streams from the east side",
            90,
            3000,
            MAX_WIND_LEVEL,
        ),
        Preset::new("Blizzard", "Large dense crystal", 150, 9000, 0.0),
    ]
}
