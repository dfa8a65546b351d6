use crate::domain::model::{ExperienceLevel, Frequency, MAX_TOTAL_WEEKS, MIN_TOTAL_WEEKS};
use crate::utils::error::{PlanError, Result};
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub defaults: PlanDefaults,
    pub logging: Option<LoggingConfig>,
}

/// Values applied to new plans when the payload leaves them unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanDefaults {
    pub frequency: Frequency,
    pub total_weeks: u32,
    pub level: ExperienceLevel,
}

impl Default for PlanDefaults {
    fn default() -> Self {
        Self {
            frequency: Frequency::ThreePerWeek,
            total_weeks: 4,
            level: ExperienceLevel::Beginner,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub filter: Option<String>,
}

impl PlannerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlanError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| PlanError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }
}

impl Validate for PlannerConfig {
    fn validate(&self) -> Result<()> {
        // Defaults must satisfy the same bounds the model enforces.
        validate_range(
            "defaults.total_weeks",
            self.defaults.total_weeks,
            MIN_TOTAL_WEEKS,
            MAX_TOTAL_WEEKS,
        )?;
        Ok(())
    }
}
