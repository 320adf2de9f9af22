use super::circle::CircleId;
use super::connection::ConnectionId;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Energy carried by a circle or connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Energized {
    #[default]
    Unenergized,
    Excited,
    Dampened,
}

impl Energized {
    pub fn as_str(&self) -> &'static str {
        match self {
            Energized::Unenergized => "unenergized",
            Energized::Excited => "excited",
            Energized::Dampened => "dampened",
        }
    }
}

/// How a circle presents its energy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shinyness {
    #[default]
    Default,
    Dull,
    Shiny,
}

impl Shinyness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shinyness::Default => "default",
            Shinyness::Dull => "dull",
            Shinyness::Shiny => "shiny",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CircleState {
    pub energized: Energized,
    pub shinyness: Shinyness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionState {
    pub energized: Energized,
}

/// Which half of the iteration runs next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Circle,
    Connection,
}

impl Phase {
    pub fn flipped(self) -> Self {
        match self {
            Phase::Circle => Phase::Connection,
            Phase::Connection => Phase::Circle,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Circle => write!(f, "circle"),
            Phase::Connection => write!(f, "connection"),
        }
    }
}

/// Scheduling policy of the automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CascadeMode {
    /// Timer-driven, one phase per tick, changes applied immediately
    #[default]
    Auto,
    /// Changes are batched and applied by the user
    Manual,
}

impl fmt::Display for CascadeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CascadeMode::Auto => write!(f, "auto"),
            CascadeMode::Manual => write!(f, "manual"),
        }
    }
}

/// A proposed state, computed but not yet committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchedChange {
    Circle { id: CircleId, state: CircleState },
    Connection { id: ConnectionId, state: ConnectionState },
}

impl fmt::Display for BatchedChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchedChange::Circle { id, .. } => write!(f, "circle {}", id),
            BatchedChange::Connection { id, .. } => write!(f, "connection {}", id),
        }
    }
}

/// One field that differs between the applied and the proposed state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyChange {
    pub property: &'static str,
    pub old_value: &'static str,
    pub new_value: &'static str,
}

/// Display-friendly diff for one batched change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeView {
    pub change: BatchedChange,
    pub changes: Vec<PropertyChange>,
}

impl ChangeView {
    pub fn for_circle(change: BatchedChange, old: &CircleState, new: &CircleState) -> Self {
        let mut changes = Vec::new();
        if old.energized != new.energized {
            changes.push(PropertyChange {
                property: "energized",
                old_value: old.energized.as_str(),
                new_value: new.energized.as_str(),
            });
        }
        if old.shinyness != new.shinyness {
            changes.push(PropertyChange {
                property: "shinyness",
                old_value: old.shinyness.as_str(),
                new_value: new.shinyness.as_str(),
            });
        }
        ChangeView { change, changes }
    }

    pub fn for_connection(
        change: BatchedChange,
        old: &ConnectionState,
        new: &ConnectionState,
    ) -> Self {
        let mut changes = Vec::new();
        if old.energized != new.energized {
            changes.push(PropertyChange {
                property: "energized",
                old_value: old.energized.as_str(),
                new_value: new.energized.as_str(),
            });
        }
        ChangeView { change, changes }
    }
}

/// Full copy of the automaton state handed to the listener
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    pub circle_states: HashMap<CircleId, CircleState>,
    pub connection_states: HashMap<ConnectionId, ConnectionState>,
    pub phase: Phase,
}

impl StateSnapshot {
    pub fn circle_state(&self, id: CircleId) -> CircleState {
        self.circle_states.get(&id).copied().unwrap_or_default()
    }

    /// Number of circles currently excited
    pub fn excited_circles(&self) -> usize {
        self.circle_states
            .values()
            .filter(|s| s.energized == Energized::Excited)
            .count()
    }
}
