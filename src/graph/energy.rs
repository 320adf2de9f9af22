//! Transition rules for a single circle or connection.
//!
//! Every function here is pure: it reads the applied state of the rest of the
//! graph and proposes the next state for one element. The automaton decides
//! when (and whether) a proposal is committed.

use super::circle::{Activation, Circle, CircleId, EnergyType};
use super::connection::{Connection, ConnectionId};
use super::state::{CircleState, ConnectionState, Energized, Shinyness};

use std::collections::HashMap;

/// Next energy of a circle, first matching rule wins:
/// 1. any inbound connection dampened -> dampened
/// 2. activated exciter -> excited
/// 3. any inbound connection excited -> excited
/// 4. otherwise unenergized
pub fn circle_energized(
    circle: &Circle,
    connections: &[Connection],
    connection_states: &HashMap<ConnectionId, ConnectionState>,
) -> Energized {
    let inbound: Vec<Energized> = connections
        .iter()
        .filter(|connection| connection.is_inbound_to(circle.id))
        .map(|connection| {
            connection_states
                .get(&connection.id)
                .map(|state| state.energized)
                .unwrap_or_default()
        })
        .collect();

    if inbound.contains(&Energized::Dampened) {
        return Energized::Dampened;
    }

    if circle.activation == Activation::Activated
        && circle.energy_types.contains(EnergyType::Exciter)
    {
        return Energized::Excited;
    }

    if inbound.contains(&Energized::Excited) {
        return Energized::Excited;
    }

    Energized::Unenergized
}

/// Next energy of a connection, driven by the shiny circles feeding into it.
/// Dampening wins over exciting. A missing endpoint leaves the connection unenergized.
pub fn connection_energized(
    connection: &Connection,
    circles_by_id: &HashMap<CircleId, &Circle>,
    circle_states: &HashMap<CircleId, CircleState>,
) -> Energized {
    if !circles_by_id.contains_key(&connection.entity1_id)
        || !circles_by_id.contains_key(&connection.entity2_id)
    {
        return Energized::Unenergized;
    }

    let Some(sources) = connection
        .inbound_circles()
        .into_iter()
        .map(|id| circles_by_id.get(&id).copied())
        .collect::<Option<Vec<&Circle>>>()
    else {
        return Energized::Unenergized;
    };

    let shiny_with = |energy_type: EnergyType| {
        sources.iter().any(|circle| {
            let shinyness = circle_states
                .get(&circle.id)
                .map(|state| state.shinyness)
                .unwrap_or_default();
            shinyness == Shinyness::Shiny && circle.energy_types.contains(energy_type)
        })
    };

    if connection.carries(EnergyType::Dampener) && shiny_with(EnergyType::Dampener) {
        return Energized::Dampened;
    }

    if connection.carries(EnergyType::Exciter) && shiny_with(EnergyType::Exciter) {
        return Energized::Excited;
    }

    Energized::Unenergized
}

/// How a circle presents the energy it holds
pub fn circle_shinyness(circle: &Circle, energized: Energized) -> Shinyness {
    match circle.activation {
        Activation::Inert => Shinyness::Default,
        Activation::Activated => {
            if energized == Energized::Dampened {
                Shinyness::Dull
            } else {
                Shinyness::Shiny
            }
        }
        Activation::Inactive => {
            if energized == Energized::Excited {
                Shinyness::Shiny
            } else {
                Shinyness::Dull
            }
        }
    }
}

/// Full proposed state for a circle
pub fn circle_state(
    circle: &Circle,
    connections: &[Connection],
    connection_states: &HashMap<ConnectionId, ConnectionState>,
) -> CircleState {
    let energized = circle_energized(circle, connections, connection_states);
    CircleState {
        energized,
        shinyness: circle_shinyness(circle, energized),
    }
}

/// Bridge to the continuous effects interpolation: shiny 1.0, dull 0.0, default none
pub fn shinyness_to_numeric(shinyness: Shinyness) -> Option<f32> {
    match shinyness {
        Shinyness::Shiny => Some(1.0),
        Shinyness::Dull => Some(0.0),
        Shinyness::Default => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::circle::EnergyTypes;
    use crate::graph::connection::Directionality;

    fn connection_states(entries: &[(usize, Energized)]) -> HashMap<ConnectionId, ConnectionState> {
        entries
            .iter()
            .map(|&(id, energized)| (ConnectionId(id), ConnectionState { energized }))
            .collect()
    }

    fn shiny() -> CircleState {
        CircleState {
            energized: Energized::Excited,
            shinyness: Shinyness::Shiny,
        }
    }

    #[test]
    fn test_dampened_inbound_beats_own_exciter() {
        let circle = Circle::new(0, Activation::Activated, EnergyTypes::EXCITER);
        let connections = vec![Connection::new(0, 1, 0, Directionality::None)];
        let states = connection_states(&[(0, Energized::Dampened)]);

        assert_eq!(
            circle_energized(&circle, &connections, &states),
            Energized::Dampened
        );
    }

    #[test]
    fn test_activated_exciter_is_excited_without_connections() {
        let circle = Circle::new(0, Activation::Activated, EnergyTypes::EXCITER);

        assert_eq!(
            circle_energized(&circle, &[], &HashMap::new()),
            Energized::Excited
        );
    }

    #[test]
    fn test_excited_inbound_excites_inactive_circle() {
        let circle = Circle::new(1, Activation::Inactive, EnergyTypes::NONE);
        let connections = vec![Connection::new(0, 0, 1, Directionality::None)];
        let states = connection_states(&[(0, Energized::Excited)]);

        assert_eq!(
            circle_energized(&circle, &connections, &states),
            Energized::Excited
        );
    }

    #[test]
    fn test_outbound_connection_does_not_feed_its_source() {
        let source = Circle::new(0, Activation::Inactive, EnergyTypes::NONE);
        let target = Circle::new(1, Activation::Inactive, EnergyTypes::NONE);
        let connections = vec![Connection::new(0, 0, 1, Directionality::Out)];
        let states = connection_states(&[(0, Energized::Excited)]);

        assert_eq!(
            circle_energized(&source, &connections, &states),
            Energized::Unenergized
        );
        assert_eq!(
            circle_energized(&target, &connections, &states),
            Energized::Excited
        );

        let reversed = vec![Connection::new(0, 0, 1, Directionality::In)];
        assert_eq!(
            circle_energized(&source, &reversed, &states),
            Energized::Excited
        );
        assert_eq!(
            circle_energized(&target, &reversed, &states),
            Energized::Unenergized
        );
    }

    #[test]
    fn test_untracked_connection_counts_as_unenergized() {
        let circle = Circle::new(1, Activation::Inactive, EnergyTypes::NONE);
        let connections = vec![Connection::new(7, 0, 1, Directionality::None)];

        assert_eq!(
            circle_energized(&circle, &connections, &HashMap::new()),
            Energized::Unenergized
        );
    }

    #[test]
    fn test_connection_dampens_before_exciting() {
        let a = Circle::new(0, Activation::Activated, EnergyTypes::EXCITER);
        let b = Circle::new(1, Activation::Activated, EnergyTypes::DAMPENER);
        let by_id: HashMap<CircleId, &Circle> = [(a.id, &a), (b.id, &b)].into_iter().collect();
        let states: HashMap<CircleId, CircleState> =
            [(a.id, shiny()), (b.id, shiny())].into_iter().collect();

        let open = Connection::new(0, 0, 1, Directionality::None);
        assert_eq!(
            connection_energized(&open, &by_id, &states),
            Energized::Dampened
        );

        let exciter_only = open.clone().carrying(EnergyTypes::EXCITER);
        assert_eq!(
            connection_energized(&exciter_only, &by_id, &states),
            Energized::Excited
        );

        // Only the exciter feeds a connection flowing out of it
        let from_exciter = Connection::new(1, 0, 1, Directionality::Out);
        assert_eq!(
            connection_energized(&from_exciter, &by_id, &states),
            Energized::Excited
        );
    }

    #[test]
    fn test_dull_source_does_not_energize_connection() {
        let a = Circle::new(0, Activation::Activated, EnergyTypes::EXCITER);
        let b = Circle::new(1, Activation::Inactive, EnergyTypes::NONE);
        let by_id: HashMap<CircleId, &Circle> = [(a.id, &a), (b.id, &b)].into_iter().collect();
        let connection = Connection::new(0, 0, 1, Directionality::None);

        assert_eq!(
            connection_energized(&connection, &by_id, &HashMap::new()),
            Energized::Unenergized
        );
    }

    #[test]
    fn test_missing_endpoint_is_unenergized() {
        let a = Circle::new(0, Activation::Activated, EnergyTypes::EXCITER);
        let by_id: HashMap<CircleId, &Circle> = [(a.id, &a)].into_iter().collect();
        let states: HashMap<CircleId, CircleState> = [(a.id, shiny())].into_iter().collect();
        for directionality in [
            Directionality::None,
            Directionality::Out,
            Directionality::In,
            Directionality::Both,
        ] {
            // Circle 9 does not exist; circle 0 alone must not energize the connection
            let connection = Connection::new(0, 0, 9, directionality);
            assert_eq!(
                connection_energized(&connection, &by_id, &states),
                Energized::Unenergized,
                "{:?}",
                directionality
            );
        }
    }

    #[test]
    fn test_shinyness_table() {
        let inert = Circle::new(0, Activation::Inert, EnergyTypes::EXCITER);
        let activated = Circle::new(1, Activation::Activated, EnergyTypes::NONE);
        let inactive = Circle::new(2, Activation::Inactive, EnergyTypes::NONE);

        for energized in [Energized::Unenergized, Energized::Excited, Energized::Dampened] {
            assert_eq!(circle_shinyness(&inert, energized), Shinyness::Default);
        }

        assert_eq!(circle_shinyness(&activated, Energized::Dampened), Shinyness::Dull);
        assert_eq!(circle_shinyness(&activated, Energized::Unenergized), Shinyness::Shiny);
        assert_eq!(circle_shinyness(&activated, Energized::Excited), Shinyness::Shiny);

        assert_eq!(circle_shinyness(&inactive, Energized::Excited), Shinyness::Shiny);
        assert_eq!(circle_shinyness(&inactive, Energized::Dampened), Shinyness::Dull);
        assert_eq!(circle_shinyness(&inactive, Energized::Unenergized), Shinyness::Dull);
    }

    #[test]
    fn test_numeric_shinyness_matches_presentation() {
        let activations = [Activation::Activated, Activation::Inactive, Activation::Inert];
        let energies = [Energized::Unenergized, Energized::Excited, Energized::Dampened];

        for activation in activations {
            let circle = Circle::new(0, activation, EnergyTypes::BOTH);
            for energized in energies {
                let shinyness = circle_shinyness(&circle, energized);
                let numeric = shinyness_to_numeric(shinyness);

                assert_eq!(numeric == Some(1.0), shinyness == Shinyness::Shiny);
                assert_eq!(numeric == Some(0.0), shinyness == Shinyness::Dull);
                assert_eq!(numeric.is_none(), activation == Activation::Inert);
            }
        }
    }
}
