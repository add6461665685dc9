use serde::{Deserialize, Serialize};

use super::error::PipelineError;
use super::levels::MAX_LEVEL;

/// Tuning for an `AudioLevelEffect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelEffectConfig {
    /// Smooth falling levels instead of reporting the raw per-frame value (default: true).
    pub animate: bool,

    /// Largest drop between two consecutive reported levels when animating (default: 8).
    pub max_decrement_per_frame: i32,

    /// Skip the listener call when the level did not change (default: false).
    pub notify_on_change_only: bool,
}

impl LevelEffectConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_decrement_per_frame <= 0 || self.max_decrement_per_frame > MAX_LEVEL {
            return Err(format!(
                "max decrement per frame must be in 1..={}, got {}",
                MAX_LEVEL, self.max_decrement_per_frame
            ));
        }
        Ok(())
    }
}

impl Default for LevelEffectConfig {
    fn default() -> Self {
        Self {
            animate: true,
            max_decrement_per_frame: 8,
            notify_on_change_only: false,
        }
    }
}

/// Configuration for an `AudioDeviceSession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfiguration {
    /// Applied to both the local and the stream level effect.
    pub level_effect: LevelEffectConfig,

    /// Start receive-stream processors as soon as they realize (default: true).
    pub start_receive_streams: bool,
}

impl SessionConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        self.level_effect.validate()
    }

    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, PipelineError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            PipelineError::InvalidConfiguration(format!("failed to parse configuration: {}", e))
        })?;
        config.validate().map_err(PipelineError::InvalidConfiguration)?;
        Ok(config)
    }
}

impl Default for SessionConfiguration {
    fn default() -> Self {
        Self {
            level_effect: LevelEffectConfig::default(),
            start_receive_streams: true,
        }
    }
}
