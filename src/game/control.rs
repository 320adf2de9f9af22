use bevy::prelude::*;
use std::time::Duration;

use crate::{
    config::AutomatonConfig,
    game::{document::GraphDocument, inbox::SnapshotInbox, library::GraphLibrary},
    graph::{CascadeMode, CellularAutomaton, StateSnapshot},
    input::AutomatonCommand,
    visual::shinyness::ShinynessEffectsTranslator,
};

const MIN_ITERATION_DELAY: Duration = Duration::from_millis(125);
const MAX_ITERATION_DELAY: Duration = Duration::from_millis(8000);

/// Broadcast every time the automaton publishes a new state
#[derive(Message, Debug, Clone)]
pub struct EnergyStateChanged(pub StateSnapshot);

/// System: Load the config and create the automaton and translator from it
pub fn setup_automaton(mut commands: Commands) {
    let config = AutomatonConfig::load_or_default();

    commands.insert_resource(CellularAutomaton::new(
        config.iteration_delay(),
        config.cascade_mode,
    ));

    let mut translator = ShinynessEffectsTranslator::default();
    translator.update_effect_ranges(config.effect_ranges);
    for (effect, range) in translator.effect_ranges().iter() {
        info!("  {}: dull={} shiny={}", effect, range.dull, range.shiny);
    }

    commands.insert_resource(translator);
    commands.insert_resource(config);
}

/// System: Open a random scenario and start the automaton on it
pub fn start_automaton(
    mut commands: Commands,
    library: Res<GraphLibrary>,
    inbox: Res<SnapshotInbox>,
    mut automaton: ResMut<CellularAutomaton>,
) {
    let Some(scenario) = library.random_scenario(&mut rand::rng()) else {
        panic!("Graph library has no scenarios");
    };

    let document = GraphDocument::from_scenario(scenario);
    restart(&mut automaton, &document, &inbox);
    info!("Opened scenario '{}'", document.scenario_name());

    commands.insert_resource(document);
}

fn restart(automaton: &mut CellularAutomaton, document: &GraphDocument, inbox: &SnapshotInbox) {
    automaton.start(
        document.circles().to_vec(),
        document.connections().to_vec(),
        inbox.listener(),
    );
}

/// System: Apply keyboard commands to the automaton
pub fn handle_automaton_commands(
    mut commands_in: MessageReader<AutomatonCommand>,
    mut automaton: ResMut<CellularAutomaton>,
    mut document: ResMut<GraphDocument>,
    library: Res<GraphLibrary>,
    inbox: Res<SnapshotInbox>,
) {
    for command in commands_in.read() {
        debug!("Automaton command: {:?}", command);

        match *command {
            AutomatonCommand::Step => {
                if !automaton.step_manual() {
                    info!("Step ignored: automaton is not running in manual mode");
                }
            }
            AutomatonCommand::ToggleMode => {
                let next = match automaton.cascade_mode() {
                    CascadeMode::Auto => CascadeMode::Manual,
                    CascadeMode::Manual => CascadeMode::Auto,
                };
                automaton.set_cascade_mode(next);
                info!("Cascade mode: {}", next);
            }
            AutomatonCommand::ApplyAll => {
                automaton.apply_all_batched_changes();
            }
            AutomatonCommand::ApplyIndex(index) => {
                if !automaton.apply_batched_change_by_index(index) {
                    info!(
                        "No pending change #{} ({} pending)",
                        index + 1,
                        automaton.batched_change_count()
                    );
                }
            }
            AutomatonCommand::IterateNow => {
                automaton.trigger_immediate_iteration();
            }
            AutomatonCommand::ToggleRunning => {
                if automaton.is_active() {
                    automaton.stop();
                    info!("Automaton stopped");
                } else {
                    restart(&mut automaton, &document, &inbox);
                    info!("Automaton restarted");
                }
            }
            AutomatonCommand::NextScenario => {
                let Some(next) =
                    library.random_scenario_except(document.scenario_name(), &mut rand::rng())
                else {
                    info!("No other scenario to switch to");
                    continue;
                };

                document.load_scenario(next);
                automaton.stop();
                restart(&mut automaton, &document, &inbox);
                info!("Switched to scenario '{}'", next.name);
            }
            AutomatonCommand::FasterIterations | AutomatonCommand::SlowerIterations => {
                let faster = *command == AutomatonCommand::FasterIterations;
                let delay = adjusted_delay(automaton.iteration_delay(), faster);
                automaton.set_iteration_delay(delay);
                info!("Iteration delay: {}ms", delay.as_millis());
            }
        }
    }
}

/// System: Advance the iteration timer by the frame delta
pub fn tick_automaton(time: Res<Time>, mut automaton: ResMut<CellularAutomaton>) {
    automaton.tick(time.delta());
}

/// Next iteration delay, halved or doubled within bounds
pub fn adjusted_delay(current: Duration, faster: bool) -> Duration {
    let next = if faster { current / 2 } else { current * 2 };
    next.clamp(MIN_ITERATION_DELAY, MAX_ITERATION_DELAY)
}

/// One line per pending change, numbered the way the 1-9 keys address them
pub fn describe_batch(automaton: &CellularAutomaton) -> Vec<String> {
    automaton
        .batched_changes()
        .iter()
        .enumerate()
        .map(|(index, view)| {
            let fields: Vec<String> = view
                .changes
                .iter()
                .map(|c| format!("{} {} -> {}", c.property, c.old_value, c.new_value))
                .collect();
            format!("{}. {}: {}", index + 1, view.change, fields.join(", "))
        })
        .collect()
}

/// System: Forward listener snapshots into ECS messages and report what is pending
pub fn relay_state_changes(
    inbox: Res<SnapshotInbox>,
    automaton: Res<CellularAutomaton>,
    mut out: MessageWriter<EnergyStateChanged>,
) {
    let mut published = false;
    for snapshot in inbox.drain() {
        debug!(
            "State published: {} phase, {} circles excited",
            snapshot.phase,
            snapshot.excited_circles()
        );
        out.write(EnergyStateChanged(snapshot));
        published = true;
    }

    if !published {
        return;
    }

    if automaton.can_step() {
        info!(
            "Phase {}, {} pending change(s)",
            automaton.current_phase(),
            automaton.batched_change_count()
        );
        for line in describe_batch(&automaton) {
            info!("  {}", line);
        }
    } else if let Some(remaining) = automaton.time_until_next_iteration() {
        debug!(
            "Next {} phase in {}ms",
            automaton.current_phase(),
            remaining.as_millis()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Activation, Circle, Connection, Directionality, EnergyTypes};

    #[test]
    fn test_describe_batch_numbers_pending_changes() {
        let mut automaton = CellularAutomaton::new(Duration::from_millis(1000), CascadeMode::Manual);
        automaton.start(
            vec![
                Circle::new(0, Activation::Activated, EnergyTypes::EXCITER),
                Circle::new(1, Activation::Inactive, EnergyTypes::NONE),
            ],
            vec![Connection::new(0, 0, 1, Directionality::None)],
            |_: &StateSnapshot| {},
        );

        assert_eq!(
            describe_batch(&automaton),
            vec![
                "1. circle c0: energized unenergized -> excited, shinyness default -> shiny",
                "2. circle c1: shinyness default -> dull",
            ]
        );

        automaton.apply_all_batched_changes();
        assert!(describe_batch(&automaton).is_empty());
    }

    #[test]
    fn test_adjusted_delay_stays_in_bounds() {
        let second = Duration::from_millis(1000);

        assert_eq!(adjusted_delay(second, true), Duration::from_millis(500));
        assert_eq!(adjusted_delay(second, false), Duration::from_millis(2000));
        assert_eq!(adjusted_delay(MIN_ITERATION_DELAY, true), MIN_ITERATION_DELAY);
        assert_eq!(adjusted_delay(MAX_ITERATION_DELAY, false), MAX_ITERATION_DELAY);
    }
}
