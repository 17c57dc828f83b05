use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Which hotkey backend to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotkeyBackendKind {
    /// Register combos with the OS hotkey API.
    #[default]
    Native,
    /// Intercept raw key events and match combos in-process.
    Raw,
}

impl fmt::Display for HotkeyBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HotkeyBackendKind::Native => write!(f, "native"),
            HotkeyBackendKind::Raw => write!(f, "raw"),
        }
    }
}

impl FromStr for HotkeyBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(HotkeyBackendKind::Native),
            "raw" => Ok(HotkeyBackendKind::Raw),
            other => Err(format!("unknown hotkey backend: {:?}", other)),
        }
    }
}

/// Hotkey subsystem configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeysConfig {
    /// Backend used to receive hotkey events.
    #[serde(default)]
    pub backend: HotkeyBackendKind,
}
