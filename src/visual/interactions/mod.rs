pub mod pointer;

pub use pointer::toggle_clicked_circle;
