use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CTRL = 1 << 0;
        const ALT = 1 << 1;
        const SHIFT = 1 << 2;
        const META = 1 << 3;
    }
}

impl Modifiers {
    fn from_token(token: &str) -> Option<Modifiers> {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifiers::CTRL),
            "alt" | "option" | "opt" => Some(Modifiers::ALT),
            "shift" => Some(Modifiers::SHIFT),
            "meta" | "cmd" | "super" | "win" => Some(Modifiers::META),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HotkeyParseError {
    #[error("empty key chord")]
    Empty,
    #[error("key chord {0:?} has no non-modifier key")]
    MissingKey(String),
    #[error("key chord {chord:?} names more than one key ({first:?} and {second:?})")]
    MultipleKeys {
        chord: String,
        first: String,
        second: String,
    },
}

/// A parsed key chord such as `Ctrl+Alt+G`.
///
/// Modifier order and case do not matter: `alt+ctrl+g` and `Ctrl+Alt+G`
/// are the same hotkey. The key itself is normalized to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub modifiers: Modifiers,
    pub key: String,
}

impl Hotkey {
    pub fn new(modifiers: Modifiers, key: impl Into<String>) -> Self {
        Hotkey {
            modifiers,
            key: key.into().to_ascii_uppercase(),
        }
    }
}

impl FromStr for Hotkey {
    type Err = HotkeyParseError;

    fn from_str(chord: &str) -> Result<Self, Self::Err> {
        let chord = chord.trim();
        if chord.is_empty() {
            return Err(HotkeyParseError::Empty);
        }
        let mut modifiers = Modifiers::empty();
        let mut key: Option<&str> = None;
        for token in chord.split('+').map(str::trim).filter(|t| !t.is_empty()) {
            if let Some(m) = Modifiers::from_token(token) {
                modifiers |= m;
                continue;
            }
            if let Some(first) = key {
                return Err(HotkeyParseError::MultipleKeys {
                    chord: chord.to_string(),
                    first: first.to_string(),
                    second: token.to_string(),
                });
            }
            key = Some(token);
        }
        let key = key.ok_or_else(|| HotkeyParseError::MissingKey(chord.to_string()))?;
        Ok(Hotkey::new(modifiers, key))
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "Ctrl"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::META, "Meta"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&self.key)
    }
}

impl Serialize for Hotkey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hotkey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de> {
        let chord = String::deserialize(deserializer)?;
        chord.parse().map_err(serde::de::Error::custom)
    }
}
