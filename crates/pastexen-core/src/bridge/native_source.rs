use crate::{BridgeEvent, NativeId};

use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, trace};

/// Forward native "hotkey fired" events into the bridge channel.
///
/// Runs as one persistent blocking task: `GlobalHotKeyEvent::receiver()` is
/// a crossbeam receiver with a blocking `recv()`, so there is no polling.
/// Only `Pressed` events are forwarded; some platforms also report releases.
///
/// The task ends when the bridge drops its receiver (the next
/// `blocking_send` fails) or when the global channel disconnects. Must be
/// called from within a tokio runtime.
pub fn forward_native_events(events_tx: mpsc::Sender<BridgeEvent>) -> JoinHandle<()> {
    let receiver = GlobalHotKeyEvent::receiver().clone();

    tokio::task::spawn_blocking(move || {
        while let Ok(event) = receiver.recv() {
            if event.state != HotKeyState::Pressed {
                trace!(id = event.id, "Ignoring hotkey release");
                continue;
            }
            if events_tx
                .blocking_send(BridgeEvent::Native(NativeId(event.id)))
                .is_err()
            {
                break;
            }
        }
        debug!("Native hotkey forwarder stopped");
    })
}
