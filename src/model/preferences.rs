//! The persisted layout schema:
//! `{ activeTemplate, snapEnabled, snapThreshold, customLayouts }`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common::collections::{BTreeMap, HashSet};
use crate::common::config::SnapSettings;
use crate::layout_engine::LayoutTemplate;
use crate::model::registry::WindowRegistry;
use crate::model::store::{LayoutStore, StoreError};
use crate::model::window::{PlacementState, WindowId};
use crate::sys::geometry::Rect;

/// Store key holding the serialized [`LayoutPreferences`].
pub const PREFERENCES_KEY: &str = "desk.layout";

/// Smallest usable snap threshold in px. NaN also maps here.
pub fn floor_snap_threshold(threshold: f64) -> f64 {
    if threshold >= 1.0 { threshold } else { 1.0 }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutPreferences {
    pub active_template: Option<LayoutTemplate>,
    pub snap_enabled: bool,
    pub snap_threshold: f64,
    pub custom_layouts: BTreeMap<String, LayoutSnapshot>,
}

impl Default for LayoutPreferences {
    fn default() -> Self { LayoutPreferences::from_settings(&SnapSettings::default()) }
}

/// A named custom layout. Windows are matched by title on load because ids
/// only live for one session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LayoutSnapshot {
    pub windows: Vec<SnapshotEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SnapshotEntry {
    pub fn frame(&self) -> Rect { Rect::new(self.x, self.y, self.width, self.height) }
}

impl LayoutPreferences {
    pub fn from_settings(snap: &SnapSettings) -> Self {
        LayoutPreferences {
            active_template: None,
            snap_enabled: snap.enabled,
            snap_threshold: snap.threshold,
            custom_layouts: BTreeMap::new(),
        }
    }

    /// Reads preferences from `store`. Missing, unreadable or corrupted
    /// entries fall back to `defaults`; opening a session never fails here.
    pub fn load(store: &dyn LayoutStore, defaults: LayoutPreferences) -> LayoutPreferences {
        let raw = match store.get(PREFERENCES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return defaults,
            Err(e) => {
                warn!(error = %e, "could not read layout preferences; using defaults");
                return defaults;
            }
        };
        match serde_json::from_str::<LayoutPreferences>(&raw) {
            Ok(mut prefs) => {
                let threshold = floor_snap_threshold(prefs.snap_threshold);
                if threshold != prefs.snap_threshold {
                    warn!(stored = prefs.snap_threshold, "stored snap threshold below 1px; using 1");
                    prefs.snap_threshold = threshold;
                }
                debug!(layouts = prefs.custom_layouts.len(), "layout preferences loaded");
                prefs
            }
            Err(source) => {
                let e = StoreError::Malformed { key: PREFERENCES_KEY.to_string(), source };
                warn!(error = %e, "discarding stored layout preferences");
                defaults
            }
        }
    }

    pub fn save(&self, store: &mut dyn LayoutStore) -> Result<(), StoreError> {
        let raw = serde_json::to_string(self).map_err(|source| StoreError::Malformed {
            key: PREFERENCES_KEY.to_string(),
            source,
        })?;
        store.set(PREFERENCES_KEY, &raw)
    }
}

impl LayoutSnapshot {
    /// Geometry of every window in the registry, in creation order.
    pub fn capture(registry: &WindowRegistry) -> LayoutSnapshot {
        let windows = registry
            .iter()
            .map(|w| SnapshotEntry {
                title: w.title.clone(),
                x: w.frame.x,
                y: w.frame.y,
                width: w.frame.width,
                height: w.frame.height,
            })
            .collect();
        LayoutSnapshot { windows }
    }

    /// Pairs each entry with the first not yet matched window of the same
    /// title, in creation order. Entries without a window are skipped.
    pub fn matches(&self, registry: &WindowRegistry) -> Vec<(WindowId, Rect)> {
        let mut taken: HashSet<WindowId> = HashSet::default();
        let mut frames = Vec::with_capacity(self.windows.len());
        for entry in &self.windows {
            let found = registry.iter().find(|w| w.title == entry.title && !taken.contains(&w.id));
            if let Some(window) = found {
                taken.insert(window.id);
                frames.push((window.id, entry.frame()));
            }
        }
        frames
    }

    /// Moves matched windows back to their saved frames and leaves them
    /// floating. Returns how many windows were placed.
    pub fn restore(&self, registry: &mut WindowRegistry) -> usize {
        let frames = self.matches(registry);
        registry.commit_layout(&frames, PlacementState::Free);
        frames.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::registry::RegistrySettings;
    use crate::model::store::MemoryStore;
    use crate::model::window::ContentRef;

    fn registry() -> WindowRegistry {
        WindowRegistry::new(Rect::new(0.0, 0.0, 1200.0, 800.0), RegistrySettings::default())
    }

    #[test]
    fn schema_uses_camel_case_keys() {
        let mut prefs = LayoutPreferences::default();
        prefs.active_template = Some(LayoutTemplate::MasterStack);
        prefs.custom_layouts.insert(
            "work".into(),
            LayoutSnapshot {
                windows: vec![SnapshotEntry {
                    title: "Notes".into(),
                    x: 8.0,
                    y: 8.0,
                    width: 400.0,
                    height: 300.0,
                }],
            },
        );
        let value = serde_json::to_value(&prefs).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "activeTemplate": "masterStack",
                "snapEnabled": true,
                "snapThreshold": 20.0,
                "customLayouts": {
                    "work": { "windows": [
                        { "title": "Notes", "x": 8.0, "y": 8.0, "width": 400.0, "height": 300.0 }
                    ] }
                }
            })
        );
    }

    #[test_log::test]
    fn corrupted_preferences_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(PREFERENCES_KEY, "{not json").unwrap();
        let prefs = LayoutPreferences::load(&store, LayoutPreferences::default());
        assert_eq!(prefs, LayoutPreferences::default());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let mut store = MemoryStore::new();
        store.set(PREFERENCES_KEY, r#"{"snapThreshold": 32}"#).unwrap();
        let prefs = LayoutPreferences::load(&store, LayoutPreferences::default());
        assert_eq!(prefs.snap_threshold, 32.0);
        assert!(prefs.snap_enabled);
        assert!(prefs.custom_layouts.is_empty());
    }

    #[test_log::test]
    fn stored_threshold_gets_the_same_floor() {
        let mut store = MemoryStore::new();
        for raw in [r#"{"snapThreshold": 0}"#, r#"{"snapThreshold": -15.5}"#] {
            store.set(PREFERENCES_KEY, raw).unwrap();
            let prefs = LayoutPreferences::load(&store, LayoutPreferences::default());
            assert_eq!(prefs.snap_threshold, 1.0, "{raw}");
        }
        store.set(PREFERENCES_KEY, r#"{"snapThreshold": 1.5}"#).unwrap();
        let prefs = LayoutPreferences::load(&store, LayoutPreferences::default());
        assert_eq!(prefs.snap_threshold, 1.5);
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = MemoryStore::new();
        let mut prefs = LayoutPreferences::default();
        prefs.snap_enabled = false;
        prefs.save(&mut store).unwrap();
        assert_eq!(LayoutPreferences::load(&store, LayoutPreferences::default()), prefs);
    }

    #[test]
    fn snapshot_matches_duplicate_titles_in_creation_order() {
        let mut reg = registry();
        let a = reg.create("Term", ContentRef::default());
        let b = reg.create("Term", ContentRef::default());
        reg.set_frame(a, Rect::new(10.0, 10.0, 400.0, 300.0));
        reg.set_frame(b, Rect::new(500.0, 300.0, 400.0, 300.0));
        let snapshot = LayoutSnapshot::capture(&reg);

        reg.set_frame(a, Rect::new(100.0, 100.0, 640.0, 480.0));
        reg.set_frame(b, Rect::new(100.0, 100.0, 640.0, 480.0));
        assert_eq!(snapshot.restore(&mut reg), 2);
        assert_eq!(reg.get(a).unwrap().frame, Rect::new(10.0, 10.0, 400.0, 300.0));
        assert_eq!(reg.get(b).unwrap().frame, Rect::new(500.0, 300.0, 400.0, 300.0));
    }

    #[test]
    fn snapshot_skips_titles_without_windows() {
        let mut reg = registry();
        let a = reg.create("Files", ContentRef::default());
        let snapshot = LayoutSnapshot {
            windows: vec![SnapshotEntry {
                title: "Gone".into(),
                x: 0.0,
                y: 0.0,
                width: 300.0,
                height: 200.0,
            }],
        };
        let before = reg.get(a).unwrap().frame;
        assert_eq!(snapshot.restore(&mut reg), 0);
        assert_eq!(reg.get(a).unwrap().frame, before);
    }
}
