pub mod animations;
pub mod components;

use crate::graph::{Activation, Circle, CircleId, EnergyTypes};
use bevy::prelude::*;

pub use animations::{pulse_newly_excited, refresh_circle_styles, update_circle_visuals};
pub use components::CircleVisual;

#[derive(Component)]
pub struct CircleNode {
    pub circle_id: CircleId,
}

/// Base color before shinyness filters: hue from the energy types it emits,
/// value from its activation
pub fn circle_color(circle: &Circle) -> Vec4 {
    let hue = match circle.energy_types {
        EnergyTypes::BOTH => Vec4::new(0.80, 0.35, 1.0, 1.0),     // PURPLE
        EnergyTypes::EXCITER => Vec4::new(1.0, 0.60, 0.20, 1.0),  // ORANGE
        EnergyTypes::DAMPENER => Vec4::new(0.20, 0.55, 1.0, 1.0), // BLUE
        _ => Vec4::new(0.85, 0.85, 0.88, 1.0),                    // WHITE-ish
    };

    match circle.activation {
        Activation::Activated => hue,
        Activation::Inactive => Vec4::new(hue.x * 0.6, hue.y * 0.6, hue.z * 0.6, 1.0),
        Activation::Inert => Vec4::new(0.25, 0.25, 0.28, 1.0), // Gray
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inert_circles_are_gray_regardless_of_energy() {
        let exciter = Circle::new(0, Activation::Inert, EnergyTypes::EXCITER);
        let dampener = Circle::new(1, Activation::Inert, EnergyTypes::DAMPENER);

        assert_eq!(circle_color(&exciter), circle_color(&dampener));
    }

    #[test]
    fn test_inactive_is_darker_than_activated() {
        let on = Circle::new(0, Activation::Activated, EnergyTypes::EXCITER);
        let off = Circle::new(0, Activation::Inactive, EnergyTypes::EXCITER);

        assert!(circle_color(&off).x < circle_color(&on).x);
    }
}
