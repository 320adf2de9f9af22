use super::circle::{CircleId, EnergyType, EnergyTypes};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection identifier, unique within the active graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub usize);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k{}", self.0)
    }
}

/// Direction energy may flow along a connection
/// `None` and `Both` behave identically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directionality {
    #[default]
    None,
    /// entity2 -> entity1
    In,
    /// entity1 -> entity2
    Out,
    Both,
}

/// Read-only view of a connection owned by the host's entity store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub entity1_id: CircleId,
    pub entity2_id: CircleId,
    #[serde(default)]
    pub directionality: Directionality,
    /// Energy the connection may carry; `None` or empty carries everything
    #[serde(default)]
    pub connection_energy_types: Option<EnergyTypes>,
}

impl Connection {
    pub fn new(id: usize, entity1: usize, entity2: usize, directionality: Directionality) -> Self {
        Connection {
            id: ConnectionId(id),
            entity1_id: CircleId(entity1),
            entity2_id: CircleId(entity2),
            directionality,
            connection_energy_types: None,
        }
    }

    /// Restrict the energy types this connection carries
    #[cfg(test)]
    pub fn carrying(mut self, energy_types: EnergyTypes) -> Self {
        self.connection_energy_types = Some(energy_types);
        self
    }

    /// Check if this connection touches a given circle
    pub fn contains_circle(&self, circle: CircleId) -> bool {
        self.entity1_id == circle || self.entity2_id == circle
    }

    /// Does energy flow along this connection *into* the given circle?
    pub fn is_inbound_to(&self, circle: CircleId) -> bool {
        if !self.contains_circle(circle) {
            return false;
        }

        match self.directionality {
            Directionality::None | Directionality::Both => true,
            Directionality::Out => self.entity2_id == circle,
            Directionality::In => self.entity1_id == circle,
        }
    }

    /// Circles whose energy feeds into this connection
    pub fn inbound_circles(&self) -> Vec<CircleId> {
        match self.directionality {
            Directionality::None | Directionality::Both => vec![self.entity1_id, self.entity2_id],
            Directionality::Out => vec![self.entity1_id],
            Directionality::In => vec![self.entity2_id],
        }
    }

    pub fn carries(&self, energy_type: EnergyType) -> bool {
        match &self.connection_energy_types {
            Some(types) if !types.is_empty() => types.contains(energy_type),
            _ => true,
        }
    }
}
