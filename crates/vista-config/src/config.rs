//! Configuration structs with defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vista_noise::Seed;
use vista_planet::PlanetTextureParams;
use vista_raster::FlushPolicy;
use vista_space::VistaOptions;

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level renderer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Space vista composition.
    pub vista: VistaConfig,
    /// Planet texture set.
    pub planet: PlanetConfig,
    /// Lit disc preview.
    pub disc: DiscConfig,
    /// Frame slicing and flush cadence.
    pub render: RenderConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Which layers a vista renders, and at what size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VistaConfig {
    pub seed: Seed,
    pub width: u32,
    pub height: u32,
    pub point_stars: bool,
    pub stars: bool,
    pub nebulae: bool,
    pub sun: bool,
}

/// Planet texture output size and shaping parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    pub seed: Seed,
    /// Equirectangular width; twice the height gives square texels.
    pub width: u32,
    pub height: u32,
    pub params: PlanetTextureParams,
}

/// Disc preview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiscConfig {
    pub seed: Seed,
    /// Side of the square output in pixels.
    pub size: u32,
}

/// Rendering cadence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Wall-clock budget of one driver slice in milliseconds.
    pub frame_budget_ms: u64,
    /// Completed rows between front-buffer flushes.
    pub rows_per_flush: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Mirror logs as JSON into the log directory in debug builds.
    pub log_to_file: bool,
}

impl Default for VistaConfig {
    fn default() -> Self {
        let options = VistaOptions::default();
        Self {
            seed: options.seed,
            width: options.width,
            height: options.height,
            point_stars: options.point_stars,
            stars: options.stars,
            nebulae: options.nebulae,
            sun: options.sun,
        }
    }
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            seed: Seed::default(),
            width: 1024,
            height: 512,
            params: PlanetTextureParams::default(),
        }
    }
}

impl Default for DiscConfig {
    fn default() -> Self {
        Self {
            seed: Seed::default(),
            size: 512,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_budget_ms: 20,
            rows_per_flush: FlushPolicy::default().rows_per_flush,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

impl VistaConfig {
    pub fn to_options(&self) -> VistaOptions {
        VistaOptions {
            seed: self.seed.clone(),
            width: self.width,
            height: self.height,
            point_stars: self.point_stars,
            stars: self.stars,
            nebulae: self.nebulae,
            sun: self.sun,
        }
    }
}

impl RenderConfig {
    pub fn flush_policy(&self) -> FlushPolicy {
        FlushPolicy {
            rows_per_flush: self.rows_per_flush,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    /// Re-read the file: `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = std::fs::read_to_string(config_dir.join(CONFIG_FILE))
            .map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
