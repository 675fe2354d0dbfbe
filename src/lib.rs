//! A desktop-style window manager for a single browser viewport: window
//! lifecycle, layout templates, edge snapping, window groups and pointer
//! interaction, driven through one event entry point.

pub mod actor;
pub mod common;
pub mod layout_engine;
pub mod model;
pub mod sys;
pub mod ui;
