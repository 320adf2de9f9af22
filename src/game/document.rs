// game/document.rs

use crate::game::library::Scenario;
use crate::graph::{Activation, Circle, CircleId, Connection};
use crate::visual::shinyness::EffectOptions;

use bevy::math::Vec2;
use bevy::prelude::Resource;
use std::collections::HashMap;

/// The graph being shown - owns the circles and connections the automaton reads
#[derive(Debug, Clone, Resource)]
pub struct GraphDocument {
    scenario_name: String,
    circles: Vec<Circle>,
    connections: Vec<Connection>,
    /// Normalized layout positions
    layout: HashMap<CircleId, Vec2>,
    effect_options: HashMap<CircleId, EffectOptions>,
    /// Bumped whenever the whole graph is replaced (the scene must be rebuilt)
    layout_revision: u64,
}

impl GraphDocument {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let mut document = GraphDocument {
            scenario_name: String::new(),
            circles: Vec::new(),
            connections: Vec::new(),
            layout: HashMap::new(),
            effect_options: HashMap::new(),
            layout_revision: 0,
        };
        document.load_scenario(scenario);
        document
    }

    // === Query Methods ===

    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn circle(&self, id: CircleId) -> Option<&Circle> {
        self.circles.iter().find(|c| c.id == id)
    }

    pub fn position(&self, id: CircleId) -> Option<Vec2> {
        self.layout.get(&id).copied()
    }

    pub fn effect_options(&self) -> &HashMap<CircleId, EffectOptions> {
        &self.effect_options
    }

    pub fn layout_revision(&self) -> u64 {
        self.layout_revision
    }

    /// Closest circle within `radius` of a normalized point
    pub fn circle_at(&self, point: Vec2, radius: f32) -> Option<CircleId> {
        self.layout
            .iter()
            .map(|(&id, position)| (id, position.distance(point)))
            .filter(|&(_, distance)| distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    // === Mutation Methods ===

    /// Replace the whole graph with a scenario
    pub fn load_scenario(&mut self, scenario: &Scenario) {
        self.scenario_name = scenario.name.clone();
        self.circles = scenario.circles.iter().map(|p| p.circle.clone()).collect();
        self.connections = scenario.connections.clone();
        self.layout = scenario
            .circles
            .iter()
            .map(|p| (p.circle.id, Vec2::from_array(p.position)))
            .collect();
        self.effect_options = scenario
            .circles
            .iter()
            .map(|p| (p.circle.id, p.effects))
            .collect();
        self.layout_revision += 1;
    }

    /// Cycle a circle's activation, returning the new value
    pub fn cycle_activation(&mut self, id: CircleId) -> Option<Activation> {
        let circle = self.circles.iter_mut().find(|c| c.id == id)?;
        circle.activation = circle.activation.cycled();
        Some(circle.activation)
    }
}
