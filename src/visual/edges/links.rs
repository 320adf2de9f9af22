use bevy::prelude::*;

use crate::game::control::EnergyStateChanged;
use crate::graph::{CellularAutomaton, ConnectionId};

pub const IDLE_LINK_COLOR: Color = Color::srgb(0.35, 0.35, 0.38);
pub const EXCITER_LINK_COLOR: Color = Color::srgb(1.0, 0.60, 0.20);
pub const DAMPENER_LINK_COLOR: Color = Color::srgb(0.20, 0.55, 1.0);

#[derive(Component)]
pub struct ConnectionLink {
    pub connection_id: ConnectionId,
}

/// Color for a connection's energy classes (dampening wins)
pub fn link_color(classes: &[&str]) -> Color {
    if classes.contains(&"dampener-connection") {
        DAMPENER_LINK_COLOR
    } else if classes.contains(&"exciter-connection") {
        EXCITER_LINK_COLOR
    } else {
        IDLE_LINK_COLOR
    }
}

/// System: Recolor connections when the automaton publishes a new state
pub fn update_connection_visuals(
    mut changes: MessageReader<EnergyStateChanged>,
    automaton: Res<CellularAutomaton>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    links: Query<(Ref<ConnectionLink>, &MeshMaterial3d<StandardMaterial>)>,
) {
    let published = changes.read().count() > 0;

    for (link, material) in &links {
        if !published && !link.is_added() {
            continue;
        }

        let color = link_color(automaton.connection_energy_classes(link.connection_id));
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = color;
        }
    }
}
