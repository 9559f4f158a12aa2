//! # Core Engine Module
//!
//! Shared configuration for the scene runtime and the frame driver.

pub mod config;

pub use config::{Config, ConfigError, EngineConfig, HookFailurePolicy, SceneConfig};
