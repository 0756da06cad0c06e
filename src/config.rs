use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "FARMRIDE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Tunables for the player's horse.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HorseConfig {
    /// Units moved per tick at full input.
    pub speed: f32,
    /// Radians turned per tick at full input.
    pub rotation_speed: f32,
    pub jump_height: f32,
    /// Jump progress added per tick (1.0 = full arc).
    pub jump_step: f32,
    /// Height above which the horse clears fences.
    pub jump_clearance: f32,
    pub radius: f32,
    pub spawn: [f32; 3],
}

impl Default for HorseConfig {
    fn default() -> Self {
        Self {
            speed: 8.0,
            rotation_speed: 0.04,
            jump_height: 100.0,
            jump_step: 0.02,
            jump_clearance: 50.0,
            radius: 30.0,
            spawn: [-600.0, 0.0, -600.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimalConfig {
    pub cow_count: usize,
    pub chicken_count: usize,
    pub radius: f32,
    /// Spawn scatter around the field center (half-width).
    pub spawn_spread: f32,
    /// Containment rectangle half-width around the field center.
    pub field_inset: f32,
    /// Seconds between random direction changes.
    pub change_min_secs: f32,
    pub change_max_secs: f32,
}

impl Default for AnimalConfig {
    fn default() -> Self {
        Self {
            cow_count: 8,
            chicken_count: 15,
            radius: 30.0,
            spawn_spread: 600.0,
            field_inset: 900.0,
            change_min_secs: 3.0,
            change_max_secs: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    pub haystack_count: usize,
    pub duration_secs: u32,
    pub pickup_radius: f32,
    /// Haystacks scatter within +/- this many units of the origin.
    pub haystack_spread: f32,
    pub npc_interaction_distance: f32,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            haystack_count: 12,
            duration_secs: 60,
            pickup_radius: 150.0,
            haystack_spread: 1500.0,
            npc_interaction_distance: 300.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Half-width of the fenced square.
    pub half_extent: f32,
    /// Animals drifting past this distance on either axis are turned back.
    pub safety_radius: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            half_extent: 2000.0,
            safety_radius: 3000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tick_hz: f64,
    /// Max accumulated time before clamping (prevents spiral of death).
    pub max_accumulator_secs: f64,
    /// Fixed RNG seed; random per run when absent.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            max_accumulator_secs: 0.25,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    pub horse: HorseConfig,
    pub animals: AnimalConfig,
    pub challenge: ChallengeConfig,
    pub world: WorldConfig,
    pub sim: SimConfig,
}

impl FarmConfig {
    /// Load from the file named by `FARMRIDE_CONFIG`, or fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if path.is_empty() => {
                log::warn!("{CONFIG_ENV_VAR} is set but empty, using defaults");
                Ok(Self::default())
            }
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                })
            }
        }

        positive("horse.speed", self.horse.speed)?;
        positive("horse.jump_step", self.horse.jump_step)?;
        positive("horse.radius", self.horse.radius)?;
        positive("animals.radius", self.animals.radius)?;
        positive("animals.field_inset", self.animals.field_inset)?;
        positive("challenge.pickup_radius", self.challenge.pickup_radius)?;
        positive("world.safety_radius", self.world.safety_radius)?;
        positive("sim.tick_hz", self.sim.tick_hz as f32)?;

        if self.animals.change_max_secs < self.animals.change_min_secs {
            return Err(ConfigError::Invalid {
                field: "animals.change_max_secs",
                reason: "must not be below change_min_secs",
            });
        }
        if self.challenge.duration_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "challenge.duration_secs",
                reason: "must be at least one second",
            });
        }
        if self.challenge.haystack_count == 0 {
            log::warn!("challenge.haystack_count is 0, every challenge ends on its first tick");
        }
        Ok(())
    }
}
