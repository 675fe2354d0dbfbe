//! Layout templates and the snap engine.
//!
//! Everything in here is pure geometry over window ids: the caller reads the
//! registry, asks for frames, and commits them back.

mod engine;
pub mod snap;
pub mod systems;
pub mod utils;

pub use engine::{LayoutEngine, LayoutResult, parse_template};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
pub use systems::{LayoutSystem, LayoutSystemKind};

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum LayoutTemplate {
    Grid,
    Cascade,
    Vertical,
    Horizontal,
    MasterStack,
    Mosaic,
    Focus,
}

impl LayoutTemplate {
    pub const ALL: [LayoutTemplate; 7] = [
        LayoutTemplate::Grid,
        LayoutTemplate::Cascade,
        LayoutTemplate::Vertical,
        LayoutTemplate::Horizontal,
        LayoutTemplate::MasterStack,
        LayoutTemplate::Mosaic,
        LayoutTemplate::Focus,
    ];

    /// Tiling templates keep governing geometry after they are applied;
    /// cascade only places windows once and leaves them floating.
    pub fn is_tiling(self) -> bool { self != LayoutTemplate::Cascade }
}

/// Axis along which a linear layout divides the area.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Side by side, left to right.
    Horizontal,
    /// Stacked, top to bottom.
    Vertical,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn template_names_are_camel_case() {
        assert_eq!(LayoutTemplate::from_str("masterStack"), Ok(LayoutTemplate::MasterStack));
        assert_eq!(LayoutTemplate::MasterStack.to_string(), "masterStack");
        assert_eq!(LayoutTemplate::from_str("grid"), Ok(LayoutTemplate::Grid));
        assert!(LayoutTemplate::from_str("spiral").is_err());
    }

    #[test]
    fn only_cascade_floats() {
        let floating: Vec<_> = LayoutTemplate::ALL.into_iter().filter(|t| !t.is_tiling()).collect();
        assert_eq!(floating, vec![LayoutTemplate::Cascade]);
    }
}
