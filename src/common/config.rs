use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use tracing::warn;

use crate::common::collections::BTreeMap;
use crate::layout_engine::LayoutTemplate;
use crate::model::reactor::Command;
use crate::sys::geometry::Size;

pub fn config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("desk").join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> { dirs::data_dir().map(|dir| dir.join("desk")) }

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub settings: Settings,
    /// Chord string (e.g. `"Ctrl+Alt+G"`) to command.
    pub hotkeys: BTreeMap<String, Command>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Margin between windows and between windows and the desktop edge.
    pub gap: f64,
    /// Fixed chrome above the desktop area, excluded from placement.
    pub top_bar_height: f64,
    pub min_window_size: Size,
    pub default_window_size: Size,
    /// Offset applied per existing window when placing a new one.
    pub stagger: f64,
    pub snap: SnapSettings,
    pub layout: LayoutSettings,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SnapSettings {
    pub enabled: bool,
    pub threshold: f64,
    /// Minimum spacing between snap checks while a drag is in progress.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub check_interval: Duration,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    pub master_ratio: f64,
    pub cascade_offset: f64,
    pub cascade_fraction: f64,
    pub mosaic_primary_ratio: f64,
    pub focus_fraction: f64,
    pub focus_thumbnail: Size,
    pub stack_offset: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            gap: 8.0,
            top_bar_height: 0.0,
            min_window_size: Size::new(300.0, 200.0),
            default_window_size: Size::new(640.0, 480.0),
            stagger: 30.0,
            snap: SnapSettings::default(),
            layout: LayoutSettings::default(),
        }
    }
}

impl Default for SnapSettings {
    fn default() -> Self {
        SnapSettings {
            enabled: true,
            threshold: 20.0,
            check_interval: Duration::from_millis(50),
        }
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings {
            master_ratio: 0.6,
            cascade_offset: 30.0,
            cascade_fraction: 0.6,
            mosaic_primary_ratio: 0.6,
            focus_fraction: 0.5,
            focus_thumbnail: Size::new(300.0, 200.0),
            stack_offset: 30.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            settings: Settings::default(),
            hotkeys: default_hotkeys(),
        }
    }
}

fn default_hotkeys() -> BTreeMap<String, Command> {
    let mut hotkeys = BTreeMap::new();
    for (key, template) in [
        ("G", LayoutTemplate::Grid),
        ("C", LayoutTemplate::Cascade),
        ("V", LayoutTemplate::Vertical),
        ("H", LayoutTemplate::Horizontal),
        ("M", LayoutTemplate::MasterStack),
        ("O", LayoutTemplate::Mosaic),
        ("F", LayoutTemplate::Focus),
    ] {
        hotkeys.insert(format!("Ctrl+Alt+{key}"), Command::ApplyTemplate(template));
    }
    hotkeys.insert("Ctrl+Alt+T".into(), Command::Float);
    hotkeys.insert("Ctrl+Alt+W".into(), Command::CloseFocused);
    hotkeys.insert("Ctrl+Alt+N".into(), Command::MinimizeFocused);
    hotkeys.insert("Ctrl+Alt+ArrowUp".into(), Command::MaximizeFocused);
    hotkeys.insert("Ctrl+Alt+ArrowDown".into(), Command::RestoreFocused);
    hotkeys.insert("Alt+Tab".into(), Command::FocusNext);
    hotkeys.insert("Alt+Shift+Tab".into(), Command::FocusPrev);
    hotkeys.insert("Ctrl+Tab".into(), Command::NextTab);
    hotkeys.insert("Ctrl+Alt+S".into(), Command::ToggleSnap);
    hotkeys
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Config::parse(&buf).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        let mut config: Config = toml::from_str(buf)?;
        config.settings.sanitize();
        Ok(config)
    }

    /// Reads `path` if given, otherwise the default location. A missing
    /// default file is not an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        if let Some(path) = path {
            return Config::read(path);
        }
        match config_file() {
            Some(path) if path.exists() => Config::read(&path),
            _ => Ok(Config::default()),
        }
    }

    pub fn to_toml(&self) -> anyhow::Result<String> { Ok(toml::to_string_pretty(self)?) }
}

impl Settings {
    /// Pulls out-of-range values back to something the layout math can use.
    pub fn sanitize(&mut self) {
        if !(self.gap >= 0.0) {
            warn!(gap = self.gap, "negative gap; using 0");
            self.gap = 0.0;
        }
        if !(self.top_bar_height >= 0.0) {
            self.top_bar_height = 0.0;
        }
        if !(self.snap.threshold >= 1.0) {
            warn!(threshold = self.snap.threshold, "snap threshold below 1px; using 1");
            self.snap.threshold = 1.0;
        }
        let defaults = Settings::default();
        for (name, size, fallback) in [
            ("min_window_size", &mut self.min_window_size, defaults.min_window_size),
            ("default_window_size", &mut self.default_window_size, defaults.default_window_size),
            ("focus_thumbnail", &mut self.layout.focus_thumbnail, defaults.layout.focus_thumbnail),
        ] {
            let clamped = non_negative(*size, fallback);
            if clamped != *size {
                warn!(setting = name, ?size, "negative size; clamping");
                *size = clamped;
            }
        }
        let layout = &mut self.layout;
        if !(0.05..=0.95).contains(&layout.master_ratio) {
            warn!(ratio = layout.master_ratio, "master_ratio out of range; clamping");
            layout.master_ratio = clamp_or(layout.master_ratio, 0.05, 0.95, 0.6);
        }
        layout.mosaic_primary_ratio = clamp_or(layout.mosaic_primary_ratio, 0.05, 0.95, 0.6);
        layout.cascade_fraction = clamp_or(layout.cascade_fraction, 0.1, 1.0, 0.6);
        layout.focus_fraction = clamp_or(layout.focus_fraction, 0.1, 1.0, 0.5);
        layout.cascade_offset = layout.cascade_offset.max(0.0);
        layout.stack_offset = layout.stack_offset.max(0.0);
    }
}

fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() { fallback } else { value.clamp(min, max) }
}

fn non_negative(size: Size, fallback: Size) -> Size {
    let axis = |v: f64, d: f64| if v.is_nan() { d } else { v.max(0.0) };
    Size::new(axis(size.width, fallback.width), axis(size.height, fallback.height))
}
