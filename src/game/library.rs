use crate::graph::{Circle, CircleId, Connection, ConnectionId};
use crate::visual::shinyness::EffectOptions;

use bevy::prelude::*;
use rand::prelude::*;
use serde::Deserialize;
use std::collections::HashSet;

const GRAPHS_JSON: &str = include_str!("../../assets/graphs.json");

/// A circle as laid out in a scenario
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioCircle {
    #[serde(flatten)]
    pub circle: Circle,
    /// Normalized layout position, both axes in [0, 1]
    pub position: [f32; 2],
    #[serde(default)]
    pub effects: EffectOptions,
}

/// A named graph the host can load into its document
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub circles: Vec<ScenarioCircle>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

#[derive(Debug, Deserialize)]
struct LibraryJson {
    scenarios: Vec<Scenario>,
}

/// Resource containing every bundled scenario
#[derive(Resource, Debug)]
pub struct GraphLibrary {
    scenarios: Vec<Scenario>,
}

impl GraphLibrary {
    /// Load the library from embedded JSON data
    pub fn load() -> Result<Self, String> {
        Self::from_json(GRAPHS_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let data: LibraryJson =
            serde_json::from_str(json).map_err(|e| format!("Parse error: {}", e))?;

        if data.scenarios.is_empty() {
            return Err("No scenarios loaded from JSON".to_string());
        }

        let mut names = HashSet::new();
        for scenario in &data.scenarios {
            if !names.insert(scenario.name.as_str()) {
                return Err(format!("Scenario '{}' is defined twice", scenario.name));
            }
            validate_scenario(scenario)?;
        }

        Ok(GraphLibrary {
            scenarios: data.scenarios,
        })
    }

    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// Scenario names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scenarios.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn random_scenario<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Scenario> {
        self.scenarios.choose(rng)
    }

    /// A random scenario other than `current`, for cycling through the library
    pub fn random_scenario_except<R: Rng + ?Sized>(
        &self,
        current: &str,
        rng: &mut R,
    ) -> Option<&Scenario> {
        let others: Vec<&Scenario> = self
            .scenarios
            .iter()
            .filter(|s| s.name != current)
            .collect();

        others.choose(rng).copied()
    }
}

fn validate_scenario(scenario: &Scenario) -> Result<(), String> {
    let name = &scenario.name;

    if scenario.circles.is_empty() {
        return Err(format!("Scenario '{}' has no circles", name));
    }

    let mut circle_ids: HashSet<CircleId> = HashSet::new();
    for placed in &scenario.circles {
        if !circle_ids.insert(placed.circle.id) {
            return Err(format!(
                "Scenario '{}': circle {} is defined twice",
                name, placed.circle.id
            ));
        }

        let [x, y] = placed.position;
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return Err(format!(
                "Scenario '{}': circle {} is positioned outside [0, 1]",
                name, placed.circle.id
            ));
        }
    }

    let mut connection_ids: HashSet<ConnectionId> = HashSet::new();
    for connection in &scenario.connections {
        if !connection_ids.insert(connection.id) {
            return Err(format!(
                "Scenario '{}': connection {} is defined twice",
                name, connection.id
            ));
        }

        for endpoint in [connection.entity1_id, connection.entity2_id] {
            if !circle_ids.contains(&endpoint) {
                return Err(format!(
                    "Scenario '{}': connection {} references unknown circle {}",
                    name, connection.id, endpoint
                ));
            }
        }
    }

    Ok(())
}

/// System to load the scenario library
/// This should run in Startup, before the document is created
pub fn setup_graph_library(mut commands: Commands) {
    match GraphLibrary::load() {
        Ok(library) => {
            info!("✓ Graph library loaded: {} scenarios", library.len());
            for name in library.names() {
                if let Some(scenario) = library.scenario(name) {
                    info!(
                        "  - {}: {} circles, {} connections",
                        name,
                        scenario.circles.len(),
                        scenario.connections.len()
                    );
                }
            }

            commands.insert_resource(library);
        }
        Err(e) => {
            error!("Failed to load graph library: {}", e);
            panic!("Cannot continue without graph data");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Activation, Directionality, EnergyTypes};
    use crate::visual::shinyness::CircleType;
    use rand::rngs::StdRng;

    const TEST_JSON: &str = r#"{
        "scenarios": [
            {
                "name": "pair",
                "circles": [
                    {"id": 0, "activation": "activated", "energy_types": ["exciter"], "position": [0.25, 0.5]},
                    {"id": 1, "position": [0.75, 0.5], "effects": {"circle_type": "emoji"}}
                ],
                "connections": [
                    {"id": 0, "entity1_id": 0, "entity2_id": 1, "directionality": "out"}
                ]
            },
            {
                "name": "lonely",
                "circles": [{"id": 3, "position": [0.5, 0.5]}]
            },
            {
                "name": "chain",
                "circles": [
                    {"id": 0, "position": [0.1, 0.5]},
                    {"id": 1, "position": [0.9, 0.5]}
                ],
                "connections": [
                    {"id": 0, "entity1_id": 0, "entity2_id": 1, "connection_energy_types": ["dampener"]}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_load_from_json() {
        let library = GraphLibrary::from_json(TEST_JSON).unwrap();

        assert_eq!(library.len(), 3);
        assert_eq!(library.names(), vec!["chain", "lonely", "pair"]);

        let pair = library.scenario("pair").unwrap();
        assert_eq!(pair.circles[0].circle.activation, Activation::Activated);
        assert_eq!(pair.circles[0].circle.energy_types, EnergyTypes::EXCITER);
        assert_eq!(pair.circles[1].circle.activation, Activation::Inactive);
        assert_eq!(pair.circles[1].effects.circle_type, CircleType::Emoji);
        assert_eq!(pair.connections[0].directionality, Directionality::Out);

        let chain = library.scenario("chain").unwrap();
        assert_eq!(
            chain.connections[0].connection_energy_types,
            Some(EnergyTypes::DAMPENER)
        );
    }

    #[test]
    fn test_embedded_library_is_valid() {
        let library = GraphLibrary::load().unwrap();

        assert!(library.len() > 0);
        let mut rng = StdRng::seed_from_u64(1);
        let scenario = library.random_scenario(&mut rng).unwrap();
        assert!(library.names().contains(&scenario.name.as_str()));
    }

    #[test]
    fn test_random_scenario_except_never_repeats() {
        let library = GraphLibrary::from_json(TEST_JSON).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let next = library.random_scenario_except("pair", &mut rng).unwrap();
            assert_ne!(next.name, "pair");
        }
        assert!(library.random_scenario(&mut rng).is_some());
    }

    #[test]
    fn test_single_scenario_has_no_alternative() {
        let json = r#"{"scenarios": [{"name": "solo", "circles": [{"id": 0, "position": [0, 0]}]}]}"#;
        let library = GraphLibrary::from_json(json).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        assert!(library.random_scenario_except("solo", &mut rng).is_none());
    }

    #[test]
    fn test_dangling_connection_is_rejected() {
        let json = r#"{"scenarios": [{
            "name": "broken",
            "circles": [{"id": 0, "position": [0.5, 0.5]}],
            "connections": [{"id": 0, "entity1_id": 0, "entity2_id": 4}]
        }]}"#;

        let err = GraphLibrary::from_json(json).unwrap_err();
        assert!(err.contains("unknown circle c4"), "{}", err);
    }

    #[test]
    fn test_invalid_libraries() {
        assert!(GraphLibrary::from_json(r#"{"scenarios": []}"#).is_err());
        assert!(GraphLibrary::from_json("").is_err());

        let duplicate_circle = r#"{"scenarios": [{"name": "dup", "circles": [
            {"id": 0, "position": [0.1, 0.1]}, {"id": 0, "position": [0.2, 0.2]}
        ]}]}"#;
        assert!(GraphLibrary::from_json(duplicate_circle).is_err());

        let off_canvas = r#"{"scenarios": [{"name": "far", "circles": [{"id": 0, "position": [1.5, 0.1]}]}]}"#;
        assert!(GraphLibrary::from_json(off_canvas).is_err());

        let duplicate_name = r#"{"scenarios": [
            {"name": "x", "circles": [{"id": 0, "position": [0.1, 0.1]}]},
            {"name": "x", "circles": [{"id": 0, "position": [0.1, 0.1]}]}
        ]}"#;
        assert!(GraphLibrary::from_json(duplicate_name).is_err());
    }
}
