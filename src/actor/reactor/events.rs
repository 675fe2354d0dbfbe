pub mod command;
pub mod drag;
pub mod group;
pub mod window;
