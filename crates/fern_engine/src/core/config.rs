//! # Runtime Configuration
//!
//! Configuration structures for the scene runtime and the frame driver. Both
//! implement [`Config`], so they can be loaded from TOML or RON files.

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError, ConfigFormat};

/// What a sweep does when a component hook returns an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookFailurePolicy {
    /// Log the failure, count it, and keep sweeping
    #[default]
    Isolate,
    /// Abort the sweep and hand the error to the caller
    Propagate,
}

/// # Scene Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Name given to objects created without an explicit name
    pub default_object_name: String,
    /// Failure handling for `start`, `update` and `render` hooks
    pub hook_failure_policy: HookFailurePolicy,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            default_object_name: "GameObject".to_string(),
            hook_failure_policy: HookFailurePolicy::Isolate,
        }
    }
}

impl Config for SceneConfig {}

/// # Engine Configuration
///
/// Settings for the headless frame driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scene settings
    pub scene: SceneConfig,
    /// Default log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Fixed simulation step in seconds
    pub fixed_timestep: f32,
    /// Stop after this many frames (unbounded when `None`)
    pub max_frames: Option<u64>,
    /// Multiplier applied to frame deltas
    pub time_scale: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            log_level: "info".to_string(),
            fixed_timestep: 1.0 / 60.0,
            max_frames: None,
            time_scale: 1.0,
        }
    }
}

impl EngineConfig {
    /// Set the frame cap
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Set the hook failure policy of the scene
    pub fn with_hook_failure_policy(mut self, policy: HookFailurePolicy) -> Self {
        self.scene.hook_failure_policy = policy;
        self
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixed_timestep.is_nan() || self.fixed_timestep <= 0.0 {
            return Err(ConfigError::Parse(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if self.time_scale < 0.0 {
            return Err(ConfigError::Parse(format!(
                "time_scale must not be negative, got {}",
                self.time_scale
            )));
        }
        Ok(())
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = r#"
            log_level = "debug"

            [scene]
            hook_failure_policy = "propagate"
        "#;
        let config = EngineConfig::from_str_with_format(text, ConfigFormat::Toml).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.scene.hook_failure_policy, HookFailurePolicy::Propagate);
        assert_eq!(config.scene.default_object_name, "GameObject");
        assert_eq!(config.max_frames, None);
    }

    #[test]
    fn test_ron_scene_config() {
        let text = r#"(default_object_name: "Node", hook_failure_policy: isolate)"#;
        let config = SceneConfig::from_str_with_format(text, ConfigFormat::Ron).unwrap();

        assert_eq!(config.default_object_name, "Node");
        assert_eq!(config.hook_failure_policy, HookFailurePolicy::Isolate);
    }

    #[test]
    fn test_validate_rejects_zero_timestep() {
        for fixed_timestep in [0.0, -0.5, f32::NAN] {
            let config = EngineConfig { fixed_timestep, ..Default::default() };
            assert!(config.validate().is_err(), "{fixed_timestep}");
        }
        assert!(EngineConfig::default().validate().is_ok());
    }
}
