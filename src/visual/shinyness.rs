// visual/shinyness.rs

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Endpoints of one effect dimension, from fully dull (0.0) to fully shiny (1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectRange {
    pub dull: f32,
    pub shiny: f32,
}

impl EffectRange {
    pub const fn new(dull: f32, shiny: f32) -> Self {
        EffectRange { dull, shiny }
    }

    pub fn lerp(&self, t: f32) -> f32 {
        self.dull + (self.shiny - self.dull) * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectRanges {
    pub scale: EffectRange,
    pub opacity: EffectRange,
    pub saturation: EffectRange,
    pub brightness: EffectRange,
}

impl Default for EffectRanges {
    fn default() -> Self {
        EffectRanges {
            scale: EffectRange::new(0.7, 1.3),
            opacity: EffectRange::new(0.5, 1.0),
            saturation: EffectRange::new(0.3, 1.0),
            brightness: EffectRange::new(0.7, 1.3),
        }
    }
}

impl EffectRanges {
    /// Named view over the four dimensions, for validation and logging
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, EffectRange)> {
        [
            ("scale", self.scale),
            ("opacity", self.opacity),
            ("saturation", self.saturation),
            ("brightness", self.brightness),
        ]
        .into_iter()
    }
}

/// Partial update of the effect ranges; unset dimensions keep their range
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectRangesPatch {
    pub scale: Option<EffectRange>,
    pub opacity: Option<EffectRange>,
    pub saturation: Option<EffectRange>,
    pub brightness: Option<EffectRange>,
}

impl EffectRangesPatch {
    /// Only the dimensions this patch sets
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, EffectRange)> {
        [
            ("scale", self.scale),
            ("opacity", self.opacity),
            ("saturation", self.saturation),
            ("brightness", self.brightness),
        ]
        .into_iter()
        .filter_map(|(effect, range)| range.map(|range| (effect, range)))
    }
}

/// Effect magnitudes for one circle (1.0 = unchanged)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualEffects {
    pub scale: f32,
    pub opacity: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl VisualEffects {
    pub const NORMAL: VisualEffects = VisualEffects {
        scale: 1.0,
        opacity: 1.0,
        saturation: 1.0,
        brightness: 1.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircleType {
    #[default]
    Basic,
    Group,
    Emoji,
}

/// How a circle combines the shininess it receives from its connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReceiveMode {
    #[default]
    Or,
    AdditiveOr,
}

/// Per-circle display policy supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectOptions {
    pub circle_type: CircleType,
    pub receive_mode: ReceiveMode,
    pub connection_multiplier: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterEffects {
    pub saturation: f32,
    pub brightness: f32,
}

/// Transform / opacity / filter, ready to style a circle with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleEffects {
    pub transform_scale: f32,
    pub opacity: f32,
    pub filter: FilterEffects,
}

impl StyleEffects {
    /// Unscaled, fully opaque, unfiltered
    pub const NEUTRAL: StyleEffects = StyleEffects {
        transform_scale: 1.0,
        opacity: 1.0,
        filter: FilterEffects {
            saturation: 1.0,
            brightness: 1.0,
        },
    };
}

/// Maps numeric shininess to visual effect magnitudes
#[derive(Resource, Debug, Clone)]
pub struct ShinynessEffectsTranslator {
    effect_ranges: EffectRanges,
    normal_values: VisualEffects,
}

impl Default for ShinynessEffectsTranslator {
    fn default() -> Self {
        Self::new(EffectRanges::default())
    }
}

impl ShinynessEffectsTranslator {
    pub fn new(effect_ranges: EffectRanges) -> Self {
        ShinynessEffectsTranslator {
            effect_ranges,
            normal_values: VisualEffects::NORMAL,
        }
    }

    pub fn effect_ranges(&self) -> &EffectRanges {
        &self.effect_ranges
    }

    pub fn update_effect_ranges(&mut self, patch: EffectRangesPatch) {
        if let Some(range) = patch.scale {
            self.effect_ranges.scale = range;
        }
        if let Some(range) = patch.opacity {
            self.effect_ranges.opacity = range;
        }
        if let Some(range) = patch.saturation {
            self.effect_ranges.saturation = range;
        }
        if let Some(range) = patch.brightness {
            self.effect_ranges.brightness = range;
        }
    }

    /// No shininess keeps the circle at its normal look; otherwise the value is
    /// clamped to [0, 1] and each dimension interpolated between dull and shiny
    pub fn translate(&self, value: Option<f32>) -> VisualEffects {
        let Some(value) = value else {
            return self.normal_values;
        };

        let t = value.clamp(0.0, 1.0);
        let ranges = &self.effect_ranges;

        VisualEffects {
            scale: round3(ranges.scale.lerp(t)),
            opacity: round3(ranges.opacity.lerp(t)),
            saturation: round3(ranges.saturation.lerp(t)),
            brightness: round3(ranges.brightness.lerp(t)),
        }
    }

    /// Effects with the host's display policy applied
    pub fn style_effects(&self, value: Option<f32>, options: &EffectOptions) -> StyleEffects {
        let effects = self.translate(value);

        let mut scale = effects.scale;
        if options.circle_type == CircleType::Group {
            // Groups never grow or shrink, they only fade and tint
            scale = 1.0;
        } else if effects.scale > 1.0 {
            if let (ReceiveMode::AdditiveOr, Some(multiplier)) =
                (options.receive_mode, options.connection_multiplier)
            {
                scale *= multiplier;
            }
            if options.circle_type == CircleType::Emoji {
                scale = 1.0;
            }
        }

        StyleEffects {
            transform_scale: scale,
            opacity: effects.opacity,
            filter: FilterEffects {
                saturation: effects.saturation,
                brightness: effects.brightness,
            },
        }
    }

    /// `style_effects` over a whole map; missing options fall back to the defaults
    pub fn style_effects_for_all<K>(
        &self,
        values: &HashMap<K, Option<f32>>,
        options: &HashMap<K, EffectOptions>,
    ) -> HashMap<K, StyleEffects>
    where
        K: Eq + Hash + Clone,
    {
        values
            .iter()
            .map(|(key, &value)| {
                let opts = options.get(key).copied().unwrap_or_default();
                (key.clone(), self.style_effects(value, &opts))
            })
            .collect()
    }
}

fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}
