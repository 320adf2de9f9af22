pub mod control;
pub mod document;
pub mod inbox;
pub mod library;
