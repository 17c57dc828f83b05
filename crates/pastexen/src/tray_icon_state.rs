/// Tray icon states corresponding to application workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Waiting for a hotkey.
    Idle,
    /// At least one capture or upload is in flight.
    Uploading,
}
