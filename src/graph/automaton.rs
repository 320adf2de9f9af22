//! The energy-propagation automaton.
//!
//! Iterations alternate between a circle phase and a connection phase. Each
//! phase proposes new states against the currently applied ones and queues
//! only the real deltas. In auto mode a timer runs one phase per tick and the
//! deltas are applied straight away; in manual mode the deltas wait in the
//! batch until the user applies them.

use super::circle::{Circle, CircleId};
use super::connection::{Connection, ConnectionId};
use super::energy;
use super::schedule::IterationTimer;
use super::state::{
    BatchedChange, CascadeMode, ChangeView, CircleState, ConnectionState, Energized, Phase,
    StateSnapshot,
};

use bevy::prelude::Resource;
use log::{debug, info, trace};
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

/// Delay between automatic iterations
pub const DEFAULT_ITERATION_DELAY: Duration = Duration::from_millis(1000);

/// Called with a full copy of the state after every applied change set.
/// Must not call back into the automaton.
pub type StateListener = Box<dyn FnMut(&StateSnapshot) + Send + Sync>;

#[derive(Resource)]
pub struct CellularAutomaton {
    /// Host's circles as of the last start/update
    circles: Vec<Circle>,
    /// Host's connections as of the last start/update
    connections: Vec<Connection>,

    circle_states: HashMap<CircleId, CircleState>,
    connection_states: HashMap<ConnectionId, ConnectionState>,

    /// Proposed changes in computation order (FIFO)
    batched_changes: VecDeque<BatchedChange>,

    running: bool,
    cascade_mode: CascadeMode,
    current_phase: Phase,

    iteration_delay: Duration,
    /// The one scheduled automatic iteration, if any
    pending: Option<IterationTimer>,

    listener: Option<StateListener>,
}

impl Default for CellularAutomaton {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATION_DELAY, CascadeMode::Auto)
    }
}

impl CellularAutomaton {
    pub fn new(iteration_delay: Duration, cascade_mode: CascadeMode) -> Self {
        CellularAutomaton {
            circles: Vec::new(),
            connections: Vec::new(),
            circle_states: HashMap::new(),
            connection_states: HashMap::new(),
            batched_changes: VecDeque::new(),
            running: false,
            cascade_mode,
            current_phase: Phase::Circle,
            iteration_delay,
            pending: None,
            listener: None,
        }
    }

    // === Control ===

    /// Start propagating over the given graph. No-op if already running.
    pub fn start<F>(&mut self, circles: Vec<Circle>, connections: Vec<Connection>, listener: F) -> bool
    where
        F: FnMut(&StateSnapshot) + Send + Sync + 'static,
    {
        if self.running {
            debug!("automaton already running, ignoring start");
            return false;
        }

        self.circles = circles;
        self.connections = connections;
        self.listener = Some(Box::new(listener));
        self.running = true;
        self.current_phase = Phase::Circle;
        self.batched_changes.clear();

        self.circle_states = self
            .circles
            .iter()
            .map(|circle| (circle.id, CircleState::default()))
            .collect();
        self.connection_states = self
            .connections
            .iter()
            .map(|connection| (connection.id, ConnectionState::default()))
            .collect();

        // Initial circle phase so the first render is already consistent
        self.run_circle_phase();
        self.current_phase = Phase::Connection;
        if self.cascade_mode == CascadeMode::Auto {
            self.commit_all();
        }
        self.notify();
        self.schedule_next();

        info!(
            "automaton started: {} circles, {} connections, {} mode",
            self.circles.len(),
            self.connections.len(),
            self.cascade_mode
        );
        true
    }

    /// Stop and discard every pending change. No-op if already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.running = false;
        self.pending = None;
        let discarded = self.batched_changes.len();
        self.batched_changes.clear();

        info!("automaton stopped, discarded {} pending changes", discarded);
        true
    }

    pub fn set_cascade_mode(&mut self, mode: CascadeMode) -> bool {
        if mode == self.cascade_mode {
            return false;
        }

        self.cascade_mode = mode;
        match mode {
            CascadeMode::Auto => {
                self.apply_all_batched_changes();
                self.schedule_next();
            }
            CascadeMode::Manual => {
                // Pending changes survive the switch
                self.pending = None;
            }
        }

        info!("cascade mode set to {}", mode);
        true
    }

    pub fn set_iteration_delay(&mut self, delay: Duration) {
        self.iteration_delay = delay;
    }

    /// Advance the scheduled iteration by one frame.
    /// Returns true if an iteration ran.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(timer) = self.pending.as_mut() else {
            return false;
        };

        if !timer.tick(delta) {
            return false;
        }

        self.pending = None;
        self.perform_iteration();
        self.schedule_next();
        true
    }

    /// Run an iteration now instead of waiting for the timer
    pub fn trigger_immediate_iteration(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.pending = None;
        self.perform_iteration();
        self.schedule_next();
        true
    }

    /// Manual single step: apply the oldest pending change, or compute a
    /// fresh batch when nothing is pending
    pub fn step_manual(&mut self) -> bool {
        if !self.can_step() {
            return false;
        }

        self.perform_iteration();
        true
    }

    /// Replace the graph used by the next iteration. Does not recompute.
    pub fn update_data(&mut self, circles: Vec<Circle>, connections: Vec<Connection>) -> bool {
        if !self.running {
            return false;
        }

        self.circles = circles;
        self.connections = connections;

        let circle_ids: HashSet<CircleId> = self.circles.iter().map(|c| c.id).collect();
        let connection_ids: HashSet<ConnectionId> =
            self.connections.iter().map(|c| c.id).collect();

        self.circle_states.retain(|id, _| circle_ids.contains(id));
        for circle in &self.circles {
            self.circle_states.entry(circle.id).or_default();
        }

        self.connection_states
            .retain(|id, _| connection_ids.contains(id));
        for connection in &self.connections {
            self.connection_states.entry(connection.id).or_default();
        }

        self.batched_changes.retain(|change| match change {
            BatchedChange::Circle { id, .. } => circle_ids.contains(id),
            BatchedChange::Connection { id, .. } => connection_ids.contains(id),
        });

        debug!(
            "automaton data updated: {} circles, {} connections",
            circle_ids.len(),
            connection_ids.len()
        );
        true
    }

    // === Batched changes ===

    /// Apply the oldest pending change.
    /// In manual mode the rest of the batch is stale afterwards and gets recomputed.
    pub fn apply_next_batched_change(&mut self) -> bool {
        let Some(change) = self.batched_changes.pop_front() else {
            return false;
        };

        self.commit(change);
        self.after_single_apply();
        true
    }

    pub fn apply_batched_change_by_index(&mut self, index: usize) -> bool {
        let Some(change) = self.batched_changes.remove(index) else {
            return false;
        };

        self.commit(change);
        self.after_single_apply();
        true
    }

    /// Apply every pending change in order, then notify once
    pub fn apply_all_batched_changes(&mut self) -> bool {
        if self.batched_changes.is_empty() {
            return false;
        }

        self.commit_all();
        self.notify();
        true
    }

    // === Queries ===

    pub fn circle_state(&self, id: CircleId) -> CircleState {
        self.circle_states.get(&id).copied().unwrap_or_default()
    }

    pub fn connection_state(&self, id: ConnectionId) -> ConnectionState {
        self.connection_states.get(&id).copied().unwrap_or_default()
    }

    pub fn circle_shininess_numeric(&self, id: CircleId) -> Option<f32> {
        energy::shinyness_to_numeric(self.circle_state(id).shinyness)
    }

    pub fn all_circle_shininess_numeric(&self) -> HashMap<CircleId, Option<f32>> {
        self.circle_states
            .iter()
            .map(|(&id, state)| (id, energy::shinyness_to_numeric(state.shinyness)))
            .collect()
    }

    pub fn batched_change_count(&self) -> usize {
        self.batched_changes.len()
    }

    /// Pending changes in application order, each with only its differing fields
    pub fn batched_changes(&self) -> Vec<ChangeView> {
        self.batched_changes
            .iter()
            .map(|&change| match change {
                BatchedChange::Circle { id, state } => {
                    ChangeView::for_circle(change, &self.circle_state(id), &state)
                }
                BatchedChange::Connection { id, state } => {
                    ChangeView::for_connection(change, &self.connection_state(id), &state)
                }
            })
            .collect()
    }

    pub fn can_step(&self) -> bool {
        self.running && self.cascade_mode == CascadeMode::Manual
    }

    /// Display hint for a connection
    pub fn connection_energy_classes(&self, id: ConnectionId) -> &'static [&'static str] {
        match self.connection_state(id).energized {
            Energized::Excited => &["exciter-connection"],
            Energized::Dampened => &["dampener-connection"],
            Energized::Unenergized => &[],
        }
    }

    pub fn is_active(&self) -> bool {
        self.running
    }

    pub fn current_phase(&self) -> Phase {
        self.current_phase
    }

    pub fn cascade_mode(&self) -> CascadeMode {
        self.cascade_mode
    }

    pub fn iteration_delay(&self) -> Duration {
        self.iteration_delay
    }

    /// Time left until the next automatic iteration
    pub fn time_until_next_iteration(&self) -> Option<Duration> {
        self.pending.map(|timer| timer.remaining())
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            circle_states: self.circle_states.clone(),
            connection_states: self.connection_states.clone(),
            phase: self.current_phase,
        }
    }

    // === Internals ===

    pub(crate) fn perform_iteration(&mut self) {
        if !self.running {
            return;
        }

        match self.cascade_mode {
            CascadeMode::Auto => {
                let phase = self.current_phase;
                match phase {
                    Phase::Circle => self.run_circle_phase(),
                    Phase::Connection => self.run_connection_phase(),
                }
                self.current_phase = phase.flipped();
                let applied = self.commit_all();
                debug!("{} phase applied {} changes", phase, applied);
                self.notify();
            }
            CascadeMode::Manual => {
                // Pending work goes first; only an empty batch is recomputed
                if self.apply_next_batched_change() {
                    return;
                }
                self.recompute_batch();
                self.notify();
            }
        }
    }

    fn schedule_next(&mut self) {
        if self.running && self.cascade_mode == CascadeMode::Auto {
            self.pending = Some(IterationTimer::new(self.iteration_delay));
        }
    }

    /// Throw away the batch and compute both phases against the applied state
    fn recompute_batch(&mut self) {
        self.batched_changes.clear();
        self.run_circle_phase();
        self.run_connection_phase();
        debug!("batch recomputed: {} changes", self.batched_changes.len());
    }

    fn run_circle_phase(&mut self) {
        for circle in &self.circles {
            let next = energy::circle_state(circle, &self.connections, &self.connection_states);
            let current = self.circle_states.get(&circle.id).copied().unwrap_or_default();
            if next != current {
                self.batched_changes.push_back(BatchedChange::Circle {
                    id: circle.id,
                    state: next,
                });
            }
        }
    }

    fn run_connection_phase(&mut self) {
        let circles_by_id: HashMap<CircleId, &Circle> =
            self.circles.iter().map(|circle| (circle.id, circle)).collect();

        for connection in &self.connections {
            let next = ConnectionState {
                energized: energy::connection_energized(
                    connection,
                    &circles_by_id,
                    &self.circle_states,
                ),
            };
            let current = self
                .connection_states
                .get(&connection.id)
                .copied()
                .unwrap_or_default();
            if next != current {
                self.batched_changes.push_back(BatchedChange::Connection {
                    id: connection.id,
                    state: next,
                });
            }
        }
    }

    fn commit(&mut self, change: BatchedChange) {
        match change {
            BatchedChange::Circle { id, state } => {
                if let Some(slot) = self.circle_states.get_mut(&id) {
                    trace!("circle {} -> {:?}", id, state);
                    *slot = state;
                }
            }
            BatchedChange::Connection { id, state } => {
                if let Some(slot) = self.connection_states.get_mut(&id) {
                    trace!("connection {} -> {:?}", id, state);
                    *slot = state;
                }
            }
        }
    }

    fn commit_all(&mut self) -> usize {
        let mut applied = 0;
        while let Some(change) = self.batched_changes.pop_front() {
            self.commit(change);
            applied += 1;
        }
        applied
    }

    fn after_single_apply(&mut self) {
        if self.cascade_mode == CascadeMode::Manual {
            self.recompute_batch();
        }
        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        if let Some(listener) = self.listener.as_mut() {
            listener(&snapshot);
        }
    }
}
