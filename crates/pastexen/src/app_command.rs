use pastexen_core::ActionId;

use uuid::Uuid;

/// Commands sent from the hotkey bridge to the main application.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// A hotkey fired for this action.
    Trigger {
        /// Action to run.
        action: ActionId,
        /// Correlates log lines of one capture and upload.
        trigger_id: Uuid,
    },
    /// Request application shutdown.
    Shutdown,
}
