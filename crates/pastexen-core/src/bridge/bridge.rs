//! OS event bridge: hotkey events in, dispatched actions out.
//!
//! Both event sources feed one channel of [`BridgeEvent`]s; events are
//! handled strictly in arrival order. Native events resolve through an
//! id lookup, raw events through the [`KeyComboMatcher`].

use crate::{ActionId, BridgeEvent, KeyComboMatcher, SharedBindings};

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Receiver of resolved actions.
///
/// `invoke` runs on the bridge task and must return quickly; long work
/// belongs in a spawned task or behind a channel.
pub trait ActionDispatcher: Send {
    /// Handle one fired action.
    fn invoke(&self, action: ActionId);
}

/// Resolves hotkey events to actions against the registry's current bindings.
pub struct HotkeyBridge<D: ActionDispatcher> {
    bindings: SharedBindings,
    matcher: KeyComboMatcher,
    dispatcher: D,
}

impl<D: ActionDispatcher> HotkeyBridge<D> {
    /// Create a bridge over a read-only view of the registry.
    pub fn new(bindings: SharedBindings, dispatcher: D) -> Self {
        Self {
            matcher: KeyComboMatcher::new(bindings.clone()),
            bindings,
            dispatcher,
        }
    }

    /// Resolve one event and invoke the dispatcher if it maps to an action.
    ///
    /// A native id that is no longer registered (the binding changed while
    /// the event was queued) is dropped.
    pub fn handle_event(&mut self, event: BridgeEvent) -> Option<ActionId> {
        let action = match event {
            BridgeEvent::Native(id) => {
                let action = self.bindings.resolve(id);
                if action.is_none() {
                    debug!(id = %id, "Hotkey event for unknown id ignored");
                }
                action
            }
            BridgeEvent::Raw(raw) => self.matcher.on_event(raw),
        }?;

        info!(action = %action, "Hotkey fired");
        self.dispatcher.invoke(action);

        Some(action)
    }

    /// Run until shutdown is signalled or every event sender is dropped.
    #[instrument(skip_all)]
    pub async fn run(
        mut self,
        mut events_rx: mpsc::Receiver<BridgeEvent>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        info!("Hotkey bridge running");

        loop {
            tokio::select! {
                // Events already queued win over shutdown.
                biased;

                event = events_rx.recv() => match event {
                    Some(event) => {
                        self.handle_event(event);
                    }
                    None => {
                        warn!("Hotkey event sources closed");
                        break;
                    }
                },
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Hotkey bridge shutting down");
                        break;
                    }
                }
            }
        }
    }
}
