use bevy::prelude::*;

use crate::visual::shinyness::StyleEffects;

/// Animated display state for a circle, eased toward its style effects
#[derive(Component, Debug)]
pub struct CircleVisual {
    /// Color from activation and energy types, before filters
    pub base_color: Vec4,
    /// Style the circle is easing toward; refreshed only when the state changes
    pub style: StyleEffects,
    /// Color currently shown
    pub current_color: Vec4,
    /// Scale currently shown (1.0 = normal)
    pub current_scale: f32,
    /// Glow intensity (0.0 = none), set when the circle becomes excited
    pub glow: f32,
}

impl CircleVisual {
    pub fn new(base_color: Vec4) -> Self {
        CircleVisual {
            base_color,
            style: StyleEffects::NEUTRAL,
            current_color: base_color,
            current_scale: 1.0,
            glow: 0.0,
        }
    }
}
