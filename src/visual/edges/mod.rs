pub mod links;

pub use links::{ConnectionLink, link_color, update_connection_visuals};
