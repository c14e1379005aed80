use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use bevy_ecs::prelude::Resource;
use course::{DeploymentMode, TriggerTuning, VehicleTuning};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Runtime configuration. Every field has a default, so a partial TOML file
/// (or none at all) is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct Config {
    /// Fixed frame rate used by the headless driver.
    pub tick_hz: u32,
    pub mode: DeploymentMode,
    pub vehicle: VehicleTuning,
    pub triggers: TriggerTuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            mode: DeploymentMode::Gated,
            vehicle: VehicleTuning::default(),
            triggers: TriggerTuning::default(),
        }
    }
}

impl Config {
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.tick_hz.max(1) as f32
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!(path = %path.display(), "No config file; using defaults");
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let cfg: Config = toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    ensure!(cfg.tick_hz > 0, "tick_hz must be positive");
    ensure!(
        cfg.vehicle.max_speed > 0.0 && cfg.vehicle.max_reverse >= 0.0,
        "vehicle speed limits must be positive"
    );
    ensure!(
        cfg.vehicle.max_steer_angle >= 0.0,
        "vehicle max_steer_angle must be non-negative"
    );
    Ok(cfg)
}
