use std::fmt;

/// Logical purpose of a global shortcut.
///
/// Join key between the registry, the OS event bridge and the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionId {
    /// Capture the whole screen and upload it.
    FullScreenCapture,
    /// Capture a user-selected region and upload it.
    RegionCapture,
    /// Share clipboard source text.
    CodeShare,
}

impl ActionId {
    /// Every action, in registration order.
    pub const ALL: [ActionId; 3] = [
        ActionId::FullScreenCapture,
        ActionId::RegionCapture,
        ActionId::CodeShare,
    ];

    /// Stable lower-case name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionId::FullScreenCapture => "full_screen_capture",
            ActionId::RegionCapture => "region_capture",
            ActionId::CodeShare => "code_share",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
