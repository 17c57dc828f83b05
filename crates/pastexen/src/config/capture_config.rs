use crate::config::{default_fullscreen_command, default_region_command};

use serde::{Deserialize, Serialize};

/// External screenshot commands.
///
/// Each is an argv list; `{file}` is replaced with the path the command must
/// write the image to. An empty list leaves that capture unconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Command for a full-screen capture.
    #[serde(default = "default_fullscreen_command")]
    pub fullscreen_command: Vec<String>,
    /// Command for an interactive region capture.
    #[serde(default = "default_region_command")]
    pub region_command: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            fullscreen_command: default_fullscreen_command(),
            region_command: default_region_command(),
        }
    }
}
