use crate::AppCommand;

use pastexen_core::{ActionDispatcher, ActionId};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};
use uuid::Uuid;

/// Turns fired hotkeys into [`AppCommand::Trigger`]s for the app loop.
///
/// Never blocks the bridge: when the queue is full the trigger is dropped.
pub struct CommandDispatcher {
    command_tx: mpsc::Sender<AppCommand>,
}

impl CommandDispatcher {
    /// Dispatch into `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }
}

impl ActionDispatcher for CommandDispatcher {
    fn invoke(&self, action: ActionId) {
        let trigger_id = Uuid::new_v4();

        match self
            .command_tx
            .try_send(AppCommand::Trigger { action, trigger_id })
        {
            Ok(()) => debug!(action = %action, trigger_id = %trigger_id, "Action queued"),
            Err(TrySendError::Full(_)) => {
                warn!(action = %action, "Command queue full, hotkey dropped")
            }
            Err(TrySendError::Closed(_)) => {
                warn!(action = %action, "App loop gone, hotkey dropped")
            }
        }
    }
}
