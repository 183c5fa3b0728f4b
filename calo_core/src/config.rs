//! Configuration file support for Calo.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/calo/config.toml`.

use crate::{Error, Result, UserProfile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Accepted ranges for user input
///
/// The engine itself accepts any numbers; these bounds are applied before
/// values reach it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_min_age")]
    pub min_age: u32,
    #[serde(default = "default_max_age")]
    pub max_age: u32,

    #[serde(default = "default_min_height_cm")]
    pub min_height_cm: f64,
    #[serde(default = "default_max_height_cm")]
    pub max_height_cm: f64,

    #[serde(default = "default_min_weight_kg")]
    pub min_weight_kg: f64,
    #[serde(default = "default_max_weight_kg")]
    pub max_weight_kg: f64,

    #[serde(default = "default_min_calorie_goal")]
    pub min_calorie_goal: f64,
    #[serde(default = "default_max_calorie_goal")]
    pub max_calorie_goal: f64,

    #[serde(default = "default_min_target_weight_kg")]
    pub min_target_weight_kg: f64,
    #[serde(default = "default_max_target_weight_kg")]
    pub max_target_weight_kg: f64,

    #[serde(default = "default_min_weeks")]
    pub min_weeks: u32,
    #[serde(default = "default_max_weeks")]
    pub max_weeks: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_age: default_min_age(),
            max_age: default_max_age(),
            min_height_cm: default_min_height_cm(),
            max_height_cm: default_max_height_cm(),
            min_weight_kg: default_min_weight_kg(),
            max_weight_kg: default_max_weight_kg(),
            min_calorie_goal: default_min_calorie_goal(),
            max_calorie_goal: default_max_calorie_goal(),
            min_target_weight_kg: default_min_target_weight_kg(),
            max_target_weight_kg: default_max_target_weight_kg(),
            min_weeks: default_min_weeks(),
            max_weeks: default_max_weeks(),
        }
    }
}

/// Presentation settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Width of the progress bar in character cells
    #[serde(default = "default_gauge_width")]
    pub gauge_width: usize,

    /// Weekly rate used when a target is set without `--rate` or `--weeks`
    #[serde(default = "default_weekly_rate")]
    pub default_weekly_rate: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            gauge_width: default_gauge_width(),
            default_weekly_rate: default_weekly_rate(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("calo")
}

fn default_min_age() -> u32 {
    1
}

fn default_max_age() -> u32 {
    120
}

fn default_min_height_cm() -> f64 {
    50.0
}

fn default_max_height_cm() -> f64 {
    250.0
}

fn default_min_weight_kg() -> f64 {
    20.0
}

fn default_max_weight_kg() -> f64 {
    500.0
}

fn default_min_calorie_goal() -> f64 {
    1000.0
}

fn default_max_calorie_goal() -> f64 {
    5000.0
}

fn default_min_target_weight_kg() -> f64 {
    30.0
}

fn default_max_target_weight_kg() -> f64 {
    300.0
}

fn default_min_weeks() -> u32 {
    1
}

fn default_max_weeks() -> u32 {
    104
}

fn default_gauge_width() -> usize {
    30
}

fn default_weekly_rate() -> f64 {
    0.5
}

fn check_range(name: &str, value: f64, min: f64, max: f64, unit: &str) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(Error::Validation(format!(
            "{} must be between {} and {} {} (got {})",
            name, min, max, unit, value
        )));
    }
    Ok(())
}

impl LimitsConfig {
    pub fn validate_profile(&self, profile: &UserProfile) -> Result<()> {
        if profile.age_years < self.min_age || profile.age_years > self.max_age {
            return Err(Error::Validation(format!(
                "age must be between {} and {} years (got {})",
                self.min_age, self.max_age, profile.age_years
            )));
        }
        check_range(
            "height",
            profile.height_cm,
            self.min_height_cm,
            self.max_height_cm,
            "cm",
        )?;
        self.validate_weight(profile.weight_kg)
    }

    /// Body weight range, shared by the profile and weigh-ins
    pub fn validate_weight(&self, kg: f64) -> Result<()> {
        check_range("weight", kg, self.min_weight_kg, self.max_weight_kg, "kg")
    }

    pub fn validate_calorie_goal(&self, kcal: f64) -> Result<()> {
        check_range(
            "calorie goal",
            kcal,
            self.min_calorie_goal,
            self.max_calorie_goal,
            "kcal",
        )
    }

    pub fn validate_target_weight(&self, kg: f64) -> Result<()> {
        check_range(
            "target weight",
            kg,
            self.min_target_weight_kg,
            self.max_target_weight_kg,
            "kg",
        )
    }

    pub fn validate_weeks(&self, weeks: u32) -> Result<()> {
        if weeks < self.min_weeks || weeks > self.max_weeks {
            return Err(Error::Validation(format!(
                "duration must be between {} and {} weeks (got {})",
                self.min_weeks, self.max_weeks, weeks
            )));
        }
        Ok(())
    }

    /// A weekly rate only has to be positive; safety is advisory
    pub fn validate_weekly_rate(&self, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::Validation(format!(
                "weekly rate must be greater than 0 kg/week (got {})",
                rate
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("calo").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
