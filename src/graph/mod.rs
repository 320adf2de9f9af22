mod automaton;
mod circle;
mod connection;
mod energy;
mod schedule;
mod state;

pub use automaton::CellularAutomaton;
pub use circle::{Activation, Circle, CircleId, EnergyTypes};
pub use connection::{Connection, ConnectionId, Directionality};
pub use state::{CascadeMode, Energized, StateSnapshot};
