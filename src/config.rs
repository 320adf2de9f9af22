use crate::graph::CascadeMode;
use crate::visual::shinyness::EffectRangesPatch;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const AUTOMATON_JSON: &str = include_str!("../assets/automaton.json");

/// Error types for configuration loading
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    ZeroIterationDelay,
    InvalidEffectRange {
        effect: &'static str,
        dull: f32,
        shiny: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Invalid automaton config: {}", e),
            ConfigError::ZeroIterationDelay => {
                write!(f, "Iteration delay must be greater than zero")
            }
            ConfigError::InvalidEffectRange { effect, dull, shiny } => write!(
                f,
                "Effect range for {} must be finite and non-negative (dull={}, shiny={})",
                effect, dull, shiny
            ),
        }
    }
}

/// Easing used by the host when circles move toward their target look
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub scale_ease_rate: f32,
    pub color_ease_rate: f32,
    /// Glow intensity given to a circle the moment it becomes excited
    pub glow_on_excite: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            scale_ease_rate: 6.0,
            color_ease_rate: 8.0,
            glow_on_excite: 1.0,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomatonConfig {
    pub iteration_delay_ms: u64,
    pub cascade_mode: CascadeMode,
    /// Applied over the translator's built-in ranges
    pub effect_ranges: EffectRangesPatch,
    pub animation: AnimationConfig,
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        AutomatonConfig {
            iteration_delay_ms: 1000,
            cascade_mode: CascadeMode::Auto,
            effect_ranges: EffectRangesPatch::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl AutomatonConfig {
    /// Load the embedded configuration
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_json(AUTOMATON_JSON)
    }

    /// Embedded configuration, or the defaults if it does not validate
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => {
                log::info!(
                    "Automaton config loaded: {}ms delay, {} mode",
                    config.iteration_delay_ms,
                    config.cascade_mode
                );
                config
            }
            Err(e) => {
                log::error!("{}; falling back to defaults", e);
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AutomatonConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iteration_delay_ms == 0 {
            return Err(ConfigError::ZeroIterationDelay);
        }

        for (effect, range) in self.effect_ranges.iter() {
            let valid = |v: f32| v.is_finite() && v >= 0.0;
            if !valid(range.dull) || !valid(range.shiny) {
                return Err(ConfigError::InvalidEffectRange {
                    effect,
                    dull: range.dull,
                    shiny: range.shiny,
                });
            }
        }

        Ok(())
    }

    pub fn iteration_delay(&self) -> Duration {
        Duration::from_millis(self.iteration_delay_ms)
    }
}
