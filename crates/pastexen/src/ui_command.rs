use crate::TrayIconState;

use pastexen_core::ActionId;

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns `TrayManager` (`TrayIcon` is `!Send`) and the hotkey
/// registry (native hotkey APIs need the message-pumping thread), so tray
/// updates, binding changes and process lifecycle events flow through this enum.
#[derive(Debug, Clone)]
pub enum UiCommand {
    /// Update the tray icon to a new state.
    SetState(TrayIconState),
    /// Replace every hotkey binding with this set; absent actions are disabled.
    ApplyBindings(Vec<(ActionId, String)>),
    /// Release all hotkeys and exit the event loop.
    Shutdown,
}
