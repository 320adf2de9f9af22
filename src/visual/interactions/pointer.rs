use bevy::prelude::*;

use crate::{
    camera::MainCamera,
    game::document::GraphDocument,
    graph::CellularAutomaton,
    input::{PointerEvent, PointerEventType},
    visual::setup::{CIRCLE_RADIUS, SceneLayout},
};

/// System: Clicking a circle cycles its activation and re-runs the cascade
pub fn toggle_clicked_circle(
    mut pointer_events: MessageReader<PointerEvent>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    layout: Option<Res<SceneLayout>>,
    mut document: ResMut<GraphDocument>,
    mut automaton: ResMut<CellularAutomaton>,
) {
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Some(layout) = layout else {
        return;
    };

    for event in pointer_events.read() {
        if event.event_type != PointerEventType::Down {
            continue;
        }
        let Some(world_pos) = event.to_world_position(camera, camera_transform) else {
            continue;
        };

        let point = layout.board.to_normalized(world_pos);
        let Some(circle_id) = document.circle_at(point, CIRCLE_RADIUS) else {
            continue;
        };
        let Some(activation) = document.cycle_activation(circle_id) else {
            continue;
        };

        automaton.update_data(
            document.circles().to_vec(),
            document.connections().to_vec(),
        );
        automaton.trigger_immediate_iteration();

        info!(
            "Circle {} is now {} (shininess {:?})",
            circle_id,
            activation.as_str(),
            automaton.circle_shininess_numeric(circle_id)
        );
    }
}
