use serde::{Deserialize, Serialize};
use std::fmt;

/// Circle identifier, unique within the active graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircleId(pub usize);

impl fmt::Display for CircleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Whether a circle can originate or dampen energy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Activated,
    #[default]
    Inactive,
    Inert,
}

impl Activation {
    /// Next activation in the editing cycle: inactive -> activated -> inert -> inactive
    pub fn cycled(self) -> Self {
        match self {
            Activation::Inactive => Activation::Activated,
            Activation::Activated => Activation::Inert,
            Activation::Inert => Activation::Inactive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Activation::Activated => "activated",
            Activation::Inactive => "inactive",
            Activation::Inert => "inert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyType {
    Exciter,
    Dampener,
}

/// A small set of energy types (zero, one or both may be present)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<EnergyType>", into = "Vec<EnergyType>")]
pub struct EnergyTypes {
    exciter: bool,
    dampener: bool,
}

impl EnergyTypes {
    pub const NONE: EnergyTypes = EnergyTypes {
        exciter: false,
        dampener: false,
    };
    pub const EXCITER: EnergyTypes = EnergyTypes {
        exciter: true,
        dampener: false,
    };
    pub const DAMPENER: EnergyTypes = EnergyTypes {
        exciter: false,
        dampener: true,
    };
    pub const BOTH: EnergyTypes = EnergyTypes {
        exciter: true,
        dampener: true,
    };

    pub fn contains(&self, energy_type: EnergyType) -> bool {
        match energy_type {
            EnergyType::Exciter => self.exciter,
            EnergyType::Dampener => self.dampener,
        }
    }

    pub fn insert(&mut self, energy_type: EnergyType) {
        match energy_type {
            EnergyType::Exciter => self.exciter = true,
            EnergyType::Dampener => self.dampener = true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.exciter && !self.dampener
    }
}

impl From<Vec<EnergyType>> for EnergyTypes {
    fn from(types: Vec<EnergyType>) -> Self {
        let mut set = EnergyTypes::NONE;
        for energy_type in types {
            set.insert(energy_type);
        }
        set
    }
}

impl From<EnergyTypes> for Vec<EnergyType> {
    fn from(set: EnergyTypes) -> Self {
        [EnergyType::Exciter, EnergyType::Dampener]
            .into_iter()
            .filter(|&t| set.contains(t))
            .collect()
    }
}

/// Read-only view of a circle owned by the host's entity store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub id: CircleId,
    #[serde(default)]
    pub activation: Activation,
    #[serde(default)]
    pub energy_types: EnergyTypes,
}

impl Circle {
    pub fn new(id: usize, activation: Activation, energy_types: EnergyTypes) -> Self {
        Circle {
            id: CircleId(id),
            activation,
            energy_types,
        }
    }
}
