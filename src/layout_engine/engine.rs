use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{LayoutSystem, LayoutSystemKind, LayoutTemplate};
use crate::common::config::LayoutSettings;
use crate::model::window::WindowId;
use crate::sys::geometry::Rect;

/// Frames computed by one template application. Nothing is committed until
/// the caller hands this to the registry.
#[must_use]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    pub template: Option<LayoutTemplate>,
    pub frames: Vec<(WindowId, Rect)>,
    pub dimmed: Vec<WindowId>,
}

impl LayoutResult {
    pub fn is_empty(&self) -> bool { self.frames.is_empty() }
}

/// Picks the layout system for a template and remembers which tiling
/// template, if any, currently governs the desktop.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    settings: LayoutSettings,
    active_template: Option<LayoutTemplate>,
}

impl LayoutEngine {
    pub fn new(settings: LayoutSettings) -> Self {
        LayoutEngine { settings, active_template: None }
    }

    pub fn settings(&self) -> &LayoutSettings { &self.settings }

    pub fn update_settings(&mut self, settings: LayoutSettings) { self.settings = settings; }

    /// The tiling template that is re-applied on structural changes.
    pub fn active_template(&self) -> Option<LayoutTemplate> { self.active_template }

    pub fn is_tiling(&self) -> bool { self.active_template.is_some() }

    /// Records `template` as the governing layout. Cascade does not govern:
    /// it places windows once and leaves the desktop floating.
    pub fn set_active_template(&mut self, template: Option<LayoutTemplate>) {
        self.active_template = template.filter(|t| t.is_tiling());
    }

    pub fn system(&self, template: LayoutTemplate) -> LayoutSystemKind {
        LayoutSystemKind::for_template(template, &self.settings)
    }

    /// Computes frames for `windows` in the order given. Pure: the engine's
    /// own state is not consulted beyond its settings.
    pub fn apply(
        &self,
        template: LayoutTemplate,
        windows: &[WindowId],
        area: Rect,
        gap: f64,
        focused: Option<WindowId>,
    ) -> LayoutResult {
        let system = self.system(template);
        let frames = system.calculate_layout(windows, area, gap, focused);
        let dimmed = system.dimmed_windows(windows, focused);
        debug!(%template, windows = windows.len(), ?area, "layout calculated");
        LayoutResult {
            template: Some(template),
            frames,
            dimmed,
        }
    }

    /// Like [`LayoutEngine::apply`] but takes a template name. Unknown names
    /// produce `None` and leave every frame where it was.
    pub fn apply_named(
        &self,
        name: &str,
        windows: &[WindowId],
        area: Rect,
        gap: f64,
        focused: Option<WindowId>,
    ) -> Option<LayoutResult> {
        let template = parse_template(name)?;
        Some(self.apply(template, windows, area, gap, focused))
    }
}

/// Parses a template name such as `"masterStack"`, logging unknown names.
pub fn parse_template(name: &str) -> Option<LayoutTemplate> {
    match name.parse::<LayoutTemplate>() {
        Ok(template) => Some(template),
        Err(_) => {
            warn!(name, "unknown layout template");
            None
        }
    }
}
