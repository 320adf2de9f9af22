use crate::game::control::{
    EnergyStateChanged, handle_automaton_commands, relay_state_changes, setup_automaton,
    start_automaton, tick_automaton,
};
use crate::game::{inbox::SnapshotInbox, library::setup_graph_library};
use crate::visual::edges::update_connection_visuals;
use crate::visual::interactions::toggle_clicked_circle;
use crate::visual::nodes::{pulse_newly_excited, refresh_circle_styles, update_circle_visuals};
use crate::visual::setup::sync_scene;
use bevy::prelude::*;

pub struct AutomatonPlugin;

impl Plugin for AutomatonPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SnapshotInbox>()
            .add_message::<EnergyStateChanged>()
            // Config and library first, then open the first scenario
            .add_systems(
                Startup,
                (setup_automaton, setup_graph_library, start_automaton).chain(),
            )
            .add_systems(
                Update,
                (
                    // Input
                    handle_automaton_commands,
                    toggle_clicked_circle,
                    // Automaton
                    tick_automaton,
                    relay_state_changes,
                    // Visual updates
                    sync_scene,
                    pulse_newly_excited,
                    refresh_circle_styles,
                    update_circle_visuals,
                    update_connection_visuals,
                )
                    .chain(),
            );
    }
}
