use crate::config::{
    default_full_hotkey, default_image_type, default_part_hotkey, default_source_type,
    default_text_hotkey,
};

use serde::{Deserialize, Serialize};

/// Hotkeys and content types. An empty hotkey disables its action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Full-screen capture hotkey.
    #[serde(default = "default_full_hotkey")]
    pub fullhotkey: String,
    /// Region capture hotkey.
    #[serde(default = "default_part_hotkey")]
    pub parthotkey: String,
    /// Code share hotkey.
    #[serde(default = "default_text_hotkey")]
    pub texthotkey: String,
    /// Image upload format (`png` or `jpg`).
    #[serde(default = "default_image_type")]
    pub imagetype: String,
    /// Source text tag (`txt`, `cpp` or `pas`).
    #[serde(default = "default_source_type")]
    pub sourcetype: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            fullhotkey: default_full_hotkey(),
            parthotkey: default_part_hotkey(),
            texthotkey: default_text_hotkey(),
            imagetype: default_image_type(),
            sourcetype: default_source_type(),
        }
    }
}
