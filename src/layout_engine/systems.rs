//! One layout system per template. Every system is a pure function of the
//! window order, the desktop area and the gap; none of them hold window
//! state, so applying the same template twice gives the same frames.

mod cascade;
mod focus;
mod grid;
mod linear;
mod master_stack;
mod mosaic;

pub use cascade::CascadeLayoutSystem;
use enum_dispatch::enum_dispatch;
pub use focus::FocusLayoutSystem;
pub use grid::GridLayoutSystem;
pub use linear::LinearLayoutSystem;
pub use master_stack::MasterStackLayoutSystem;
pub use mosaic::MosaicLayoutSystem;

use crate::common::config::LayoutSettings;
use crate::layout_engine::{LayoutTemplate, Orientation};
use crate::model::window::WindowId;
use crate::sys::geometry::Rect;

#[enum_dispatch]
pub trait LayoutSystem {
    /// Frames for `windows`, in the order given. `area` is the whole desktop
    /// area; systems apply the gap themselves.
    fn calculate_layout(
        &self,
        windows: &[WindowId],
        area: Rect,
        gap: f64,
        focused: Option<WindowId>,
    ) -> Vec<(WindowId, Rect)>;

    /// Windows to render dimmed under this layout.
    fn dimmed_windows(&self, _windows: &[WindowId], _focused: Option<WindowId>) -> Vec<WindowId> {
        Vec::new()
    }
}

#[enum_dispatch(LayoutSystem)]
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutSystemKind {
    Grid(GridLayoutSystem),
    Cascade(CascadeLayoutSystem),
    Linear(LinearLayoutSystem),
    MasterStack(MasterStackLayoutSystem),
    Mosaic(MosaicLayoutSystem),
    Focus(FocusLayoutSystem),
}

impl LayoutSystemKind {
    pub fn for_template(template: LayoutTemplate, settings: &LayoutSettings) -> Self {
        match template {
            LayoutTemplate::Grid => GridLayoutSystem.into(),
            LayoutTemplate::Cascade => CascadeLayoutSystem::new(settings).into(),
            LayoutTemplate::Vertical => LinearLayoutSystem::new(Orientation::Vertical).into(),
            LayoutTemplate::Horizontal => LinearLayoutSystem::new(Orientation::Horizontal).into(),
            LayoutTemplate::MasterStack => MasterStackLayoutSystem::new(settings).into(),
            LayoutTemplate::Mosaic => MosaicLayoutSystem::new(settings).into(),
            LayoutTemplate::Focus => FocusLayoutSystem::new(settings).into(),
        }
    }
}
