pub mod geometry;
pub mod hotkey;
