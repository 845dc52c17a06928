use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::relax::RelaxConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub bond_radius: f32,
    /// Spacing between the cylinders of a multiple bond, in bond radii.
    pub bond_offset_factor: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bond_radius: 0.1,
            bond_offset_factor: 2.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Atoms closer than the sum of their radii times this are bonded on import.
    pub bond_tolerance: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            bond_tolerance: 1.15,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub relax: RelaxConfig,
    pub render: RenderConfig,
    pub perception: PerceptionConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }
}
