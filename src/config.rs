use ::config::{Config, ConfigError, Environment, File, FileFormat, Source};
use serde::Deserialize;
use tracing::{error, info};

use diffbot_kinematics::{Boundary, RobotConfig};
use diffbot_navigation::GoalSeekConfig;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const ENV_PREFIX: &str = "DIFFBOT";

/// Voltages applied by the arrow keys in manual mode.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ManualConfig {
    /// Voltage on both motors for up/down (V).
    pub drive_voltage: f64,
    /// Voltage added/subtracted per side for left/right (V).
    pub turn_voltage: f64,
}

impl Default for ManualConfig {
    fn default() -> Self {
        ManualConfig {
            drive_voltage: 6.0,
            turn_voltage: 4.0,
        }
    }
}

/// Timing of the simulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Simulation ticks per second.
    pub tick_hz: f64,
    /// Longest time step fed to the integrator (s).
    pub max_dt: f64,
    /// Starting heading (rad). The robot starts in the middle of the area.
    pub start_heading: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            tick_hz: 60.0,
            max_dt: 0.05,
            start_heading: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub robot: RobotConfig,
    pub controller: GoalSeekConfig,
    pub boundary: Boundary,
    pub manual: ManualConfig,
    #[serde(rename = "loop")]
    pub sim: LoopConfig,
}

/// Loads `config/default.toml` (if present) with `DIFFBOT__*` environment overrides.
pub fn load_config() -> Result<SimConfig, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    match load_from(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(false)) {
        Ok(config) => {
            info!("Successfully loaded configuration: {:?}", config);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

fn load_from<S>(source: S) -> Result<SimConfig, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    Config::builder()
        .add_source(source)
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?
        .try_deserialize()
}
