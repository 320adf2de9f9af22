use bevy::prelude::*;
use std::collections::HashMap;

use crate::{
    config::AutomatonConfig,
    game::{control::EnergyStateChanged, document::GraphDocument},
    graph::{CellularAutomaton, CircleId, Energized},
    visual::{
        nodes::{CircleNode, circle_color, components::CircleVisual},
        shinyness::{ShinynessEffectsTranslator, StyleEffects},
        utils::{filtered_color, lerp_hsv},
    },
};

/// Extra scale at full glow
const GLOW_SWELL: f32 = 0.15;

/// Below this a frame's change is not worth touching the material or transform
const SETTLED_EPSILON: f32 = 1e-4;

/// System: Recompute target styles when the automaton publishes a new state,
/// the document or translator changes, or circles were just spawned
pub fn refresh_circle_styles(
    mut changes: MessageReader<EnergyStateChanged>,
    automaton: Res<CellularAutomaton>,
    translator: Res<ShinynessEffectsTranslator>,
    document: Res<GraphDocument>,
    mut circles: Query<(&CircleNode, &mut CircleVisual)>,
) {
    let published = changes.read().count() > 0;
    let refresh_all = published || document.is_changed() || translator.is_changed();

    let mut styles = None;
    for (node, mut visual) in &mut circles {
        if !refresh_all && !visual.is_added() {
            continue;
        }

        let styles = styles.get_or_insert_with(|| {
            translator.style_effects_for_all(
                &automaton.all_circle_shininess_numeric(),
                document.effect_options(),
            )
        });
        visual.style = styles
            .get(&node.circle_id)
            .copied()
            .unwrap_or(StyleEffects::NEUTRAL);
        if let Some(circle) = document.circle(node.circle_id) {
            visual.base_color = circle_color(circle);
        }
    }
}

/// System: Ease circle scale and color toward their cached styles
pub fn update_circle_visuals(
    time: Res<Time>,
    config: Res<AutomatonConfig>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut circles: Query<(
        &mut CircleVisual,
        &mut Transform,
        &MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let dt = time.delta_secs();
    let animation = &config.animation;

    for (mut visual, mut transform, material) in &mut circles {
        let shown_color = visual.current_color;
        let shown_glow = visual.glow;

        // === Color (ease-out in HSV) ===
        let target_color = filtered_color(visual.base_color, &visual.style);
        visual.current_color = lerp_hsv(
            visual.current_color,
            target_color,
            (dt * animation.color_ease_rate).min(1.0),
        );

        // === Scale ===
        let target_scale = visual.style.transform_scale;
        visual.current_scale = visual
            .current_scale
            .lerp(target_scale, (dt * animation.scale_ease_rate).min(1.0));

        // === Glow Decay ===
        if visual.glow > 0.0 {
            visual.glow *= 0.95_f32.powf(dt * 60.0);
            if visual.glow < 0.01 {
                visual.glow = 0.0;
            }
        }

        let scale = Vec3::splat(visual.current_scale * (1.0 + visual.glow * GLOW_SWELL));
        if (transform.scale - scale).abs().max_element() > SETTLED_EPSILON {
            transform.scale = scale;
        }

        let color_moved =
            (visual.current_color - shown_color).abs().max_element() > SETTLED_EPSILON;
        if !color_moved && shown_glow == 0.0 {
            continue;
        }

        if let Some(material) = materials.get_mut(&material.0) {
            let c = visual.current_color;
            material.base_color = Color::srgba(c.x, c.y, c.z, c.w);
            material.emissive = LinearRgba::rgb(c.x, c.y, c.z) * visual.glow;
        }
    }
}

/// System: Flash circles that just turned excited
pub fn pulse_newly_excited(
    mut changes: MessageReader<EnergyStateChanged>,
    config: Res<AutomatonConfig>,
    mut last_seen: Local<HashMap<CircleId, Energized>>,
    mut circles: Query<(&CircleNode, &mut CircleVisual)>,
) {
    for EnergyStateChanged(snapshot) in changes.read() {
        for (node, mut visual) in &mut circles {
            let now = snapshot.circle_state(node.circle_id).energized;
            let before = last_seen.insert(node.circle_id, now).unwrap_or_default();

            if now == Energized::Excited && before != Energized::Excited {
                trace!("Circle {} lit up", node.circle_id);
                visual.glow = config.animation.glow_on_excite;
            }
        }
    }
}
