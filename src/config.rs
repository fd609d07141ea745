use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::TdeeError;
use crate::export::ExportFormat;
use crate::logging::LogConfig;
use crate::models::{ActivityLevel, Gender, Goal, WeightUnit};
use crate::validation::{accept_numeric_entry, FormFields};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Initial form values
    pub defaults: FormDefaults,

    /// Result output preferences
    pub output: OutputSettings,

    /// Logging setup
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Values the form starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefaults {
    pub weight: String,
    pub height: String,
    pub age: String,

    /// Empty means no body fat percentage
    #[serde(default)]
    pub body_fat: String,

    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub weight_unit: WeightUnit,
}

/// Result output preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Format used by `calculate` when none is given
    pub format: ExportFormat,

    /// Colorize terminal output
    pub color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            defaults: FormDefaults::default(),
            output: OutputSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for FormDefaults {
    fn default() -> Self {
        FormDefaults {
            weight: "70".to_string(),
            height: "175".to_string(),
            age: "25".to_string(),
            body_fat: String::new(),
            gender: Gender::Male,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::Maintenance,
            weight_unit: WeightUnit::Kilograms,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            format: ExportFormat::Text,
            color: true,
        }
    }
}

impl FormDefaults {
    /// Form fields pre-filled with these defaults
    pub fn to_fields(&self) -> FormFields {
        FormFields {
            weight: self.weight.clone(),
            height: self.height.clone(),
            age: self.age.clone(),
            body_fat: self.body_fat.clone(),
            gender: Some(self.gender),
            activity_level: Some(self.activity_level),
            goal: Some(self.goal),
            weight_unit: self.weight_unit,
        }
    }
}

/// Keys accepted by `get` and `set`
pub const CONFIG_KEYS: [&str; 13] = [
    "defaults.weight",
    "defaults.height",
    "defaults.age",
    "defaults.body_fat",
    "defaults.gender",
    "defaults.activity_level",
    "defaults.goal",
    "defaults.weight_unit",
    "output.format",
    "output.color",
    "logging.level",
    "logging.format",
    "logging.file_path",
];

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tdeers")
            .join("config.toml")
    }

    /// Load configuration from `path`; a file that does not exist yet
    /// yields the defaults
    pub fn load_if_exists<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load_if_exists(path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Unreadable config file, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from the default location, falling back to defaults
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(Self::default_config_path())
    }

    /// Read a setting by dotted key
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "defaults.weight" => self.defaults.weight.clone(),
            "defaults.height" => self.defaults.height.clone(),
            "defaults.age" => self.defaults.age.clone(),
            "defaults.body_fat" => self.defaults.body_fat.clone(),
            "defaults.gender" => self.defaults.gender.key().to_string(),
            "defaults.activity_level" => self.defaults.activity_level.key().to_string(),
            "defaults.goal" => self.defaults.goal.key().to_string(),
            "defaults.weight_unit" => match self.defaults.weight_unit {
                WeightUnit::Kilograms => "kg".to_string(),
                WeightUnit::Pounds => "lb".to_string(),
            },
            "output.format" => self.output.format.to_string(),
            "output.color" => self.output.color.to_string(),
            "logging.level" => self.logging.level.to_filter(),
            "logging.format" => format!("{:?}", self.logging.format).to_lowercase(),
            "logging.file_path" => self
                .logging
                .file_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            _ => return Err(unknown_key(key)),
        };

        Ok(value)
    }

    /// Update a setting by dotted key.
    ///
    /// Numeric defaults go through the same entry filter as the form, and
    /// selector values must be one of their enumerated keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.weight" => self.defaults.weight = numeric_entry(key, value)?,
            "defaults.height" => self.defaults.height = numeric_entry(key, value)?,
            "defaults.age" => self.defaults.age = numeric_entry(key, value)?,
            "defaults.body_fat" => self.defaults.body_fat = numeric_entry(key, value)?,
            "defaults.gender" => self.defaults.gender = value.parse()?,
            "defaults.activity_level" => self.defaults.activity_level = value.parse()?,
            "defaults.goal" => self.defaults.goal = value.parse()?,
            "defaults.weight_unit" => self.defaults.weight_unit = value.parse()?,
            "output.format" => self.output.format = value.parse()?,
            "output.color" => {
                self.output.color = value
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("Expected true or false for {}, got: {}", key, value))?
            }
            "logging.level" => self.logging.level = value.parse().map_err(|e: String| anyhow!(e))?,
            "logging.format" => self.logging.format = value.parse().map_err(|e: String| anyhow!(e))?,
            "logging.file_path" => {
                self.logging.file_path = match value.trim() {
                    "" => None,
                    path => Some(PathBuf::from(path)),
                }
            }
            _ => return Err(unknown_key(key)),
        }

        self.metadata.updated_at = Utc::now();
        Ok(())
    }

    /// Parse a `KEY=VALUE` assignment and apply it
    pub fn set_assignment(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected KEY=VALUE, got: {}", assignment))?;
        self.set(key.trim(), value)
    }
}

fn unknown_key(key: &str) -> anyhow::Error {
    TdeeError::Configuration(format!("Unknown configuration key: {}", key)).into()
}

fn numeric_entry(key: &str, value: &str) -> Result<String> {
    if !accept_numeric_entry(value) {
        bail!("{} must be a non-negative number, got: {}", key, value);
    }
    Ok(value.trim().to_string())
}
