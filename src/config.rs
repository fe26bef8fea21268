/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Result, SimError};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub building: BuildingConfig,
    pub elevator: ElevatorConfig,
    pub spawner: SpawnerConfig,
    pub renderer: RendererConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BuildingConfig {
    pub floors: usize,
    pub elevators: usize,
    pub address: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ElevatorConfig {
    pub capacity: u32,
    pub door_speed_ms: u64,
    pub travel_speed_ms: u64,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SpawnerConfig {
    pub intensity: u32,
    pub interval_ms: u64,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    Text,
    Json,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RendererConfig {
    pub enabled: bool,
    pub interval_ms: u64,
    pub format: RenderFormat,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        BuildingConfig {
            floors: 10,
            elevators: 5,
            address: "address".to_string(),
        }
    }
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        ElevatorConfig {
            capacity: 400,
            door_speed_ms: 1000,
            travel_speed_ms: 1000,
        }
    }
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        SpawnerConfig {
            intensity: 1,
            interval_ms: 20_000,
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig {
            enabled: true,
            interval_ms: 1000,
            format: RenderFormat::Text,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.building.floors == 0 {
            return Err(SimError::InvalidFloorCount(self.building.floors));
        }
        if self.building.elevators == 0 {
            return Err(SimError::InvalidElevatorCount(self.building.elevators));
        }
        if self.building.address.trim().is_empty() {
            return Err(SimError::MissingAddress);
        }
        if self.elevator.capacity == 0 {
            return Err(SimError::Config("elevator capacity must be positive".into()));
        }
        if self.spawner.intensity == 0 {
            return Err(SimError::Config("spawner intensity must be positive".into()));
        }
        if !(100..=1000).contains(&self.renderer.interval_ms) {
            return Err(SimError::Config(format!(
                "renderer interval {} ms outside [100, 1000]",
                self.renderer.interval_ms
            )));
        }
        Ok(())
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path).map_err(|e| {
        SimError::Config(format!("failed to read {}: {}", path.display(), e))
    })?;
    parse_config(&config_str)
}
