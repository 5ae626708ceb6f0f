//! Configuration management for the resume scorer

use crate::error::{Result, ResumeScorerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub ai: AiConfig,
    pub failure_log: FailureLogConfig,
    pub output: OutputConfig,
}

/// Category point weights. Must sum to exactly 100; validated fatally at
/// load time, never per-request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub required_skills: f64,
    pub experience: f64,
    pub education: f64,
    pub preferred_skills: f64,
    pub keyword_density: f64,
    pub format_clarity: f64,
}

impl CategoryWeights {
    pub fn sum(&self) -> f64 {
        self.required_skills
            + self.experience
            + self.education
            + self.preferred_skills
            + self.keyword_density
            + self.format_clarity
    }

    pub fn validate(&self) -> Result<()> {
        let sum = self.sum();
        if (sum - 100.0).abs() > 1e-9 {
            return Err(ResumeScorerError::Configuration(format!(
                "category weights must sum to exactly 100, got {}",
                sum
            )));
        }
        Ok(())
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            required_skills: 30.0,
            experience: 20.0,
            education: 15.0,
            preferred_skills: 10.0,
            keyword_density: 20.0,
            format_clarity: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: CategoryWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub timeout_secs: u64,
    pub retries: u32,
    pub temperature: f32,
    pub max_output_tokens: usize,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            retries: 1,
            temperature: 0.2,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureLogConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        let log_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("resume-scorer")
            .join("failures");

        Self {
            scoring: ScoringConfig {
                weights: CategoryWeights::default(),
            },
            ai: AiConfig::default(),
            failure_log: FailureLogConfig { dir: log_dir },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from disk, creating a default file on first run.
    /// Weight validation failures are fatal here.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Config>(&content).map_err(|e| {
                ResumeScorerError::Configuration(format!("Failed to parse config: {}", e))
            })?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };

        config.scoring.weights.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeScorerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-scorer")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_100() {
        let weights = CategoryWeights::default();
        assert!((weights.sum() - 100.0).abs() < 1e-9);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_unbalanced_weights_rejected() {
        let weights = CategoryWeights {
            required_skills: 50.0,
            ..CategoryWeights::default()
        };
        let err = weights.validate().unwrap_err();
        assert!(matches!(err, ResumeScorerError::Configuration(_)));
    }

    #[test]
    fn test_default_ai_config() {
        let ai = AiConfig::default();
        assert_eq!(ai.timeout(), Duration::from_secs(30));
        assert_eq!(ai.retries, 1);
    }
}
