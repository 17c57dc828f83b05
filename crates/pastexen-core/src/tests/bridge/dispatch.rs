use crate::{
    ActionId, BridgeEvent, HotkeyBridge, HotkeyRegistry, Key, Modifier, NativeId, RawKey,
    RawKeyEvent, tests::support::{FakeBackend, RecordingDispatcher},
};

use std::time::Duration;

use tokio::sync::{mpsc, watch};

/// WHAT: A native event for a bound combo invokes its action exactly once
/// WHY: This is the end-to-end hotkey path: register, fire, dispatch
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_registered_ctrl_f9_when_native_event_fires_then_invoked_once() {
    // Given: FullScreenCapture bound to Ctrl+F9 and a running bridge
    let mut registry = HotkeyRegistry::new(FakeBackend::default());
    registry
        .set_binding(ActionId::FullScreenCapture, "Ctrl+F9")
        .unwrap();
    let id = registry.binding(ActionId::FullScreenCapture).unwrap().native_id;

    let dispatcher = RecordingDispatcher::default();
    let bridge = HotkeyBridge::new(registry.shared(), dispatcher.clone());
    let (events_tx, events_rx) = mpsc::channel(8);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(bridge.run(events_rx, shutdown_rx));

    // When: The OS reports that hotkey firing, then the source closes
    events_tx.send(BridgeEvent::Native(id)).await.unwrap();
    drop(events_tx);
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();

    // Then: Exactly one dispatch
    assert_eq!(dispatcher.calls(), vec![ActionId::FullScreenCapture]);
}

/// WHAT: Unknown native ids are dropped
/// WHY: An event queued before a rebind may carry a released id
#[test]
fn given_unknown_native_id_when_handled_then_nothing_dispatched() {
    let registry = HotkeyRegistry::new(FakeBackend::default());
    let dispatcher = RecordingDispatcher::default();
    let mut bridge = HotkeyBridge::new(registry.shared(), dispatcher.clone());

    let action = bridge.handle_event(BridgeEvent::Native(NativeId(999)));

    assert_eq!(action, None);
    assert!(dispatcher.calls().is_empty());
}

/// WHAT: Raw events dispatch through the matcher, in order
/// WHY: Variant B must produce the same dispatches as native hotkeys
#[test]
#[allow(clippy::unwrap_used)]
fn given_raw_events_when_handled_in_order_then_actions_in_order() {
    // Given: Two bindings
    let mut registry = HotkeyRegistry::new(FakeBackend::default());
    registry
        .reload_all(&[
            (ActionId::FullScreenCapture, "Ctrl+F9"),
            (ActionId::CodeShare, "Ctrl+F11"),
        ])
        .unwrap();
    let dispatcher = RecordingDispatcher::default();
    let mut bridge = HotkeyBridge::new(registry.shared(), dispatcher.clone());

    let ctrl = RawKey::Modifier(Modifier::Ctrl);
    let f9 = RawKey::Key(Key::F(9));
    let f11 = RawKey::Key(Key::F(11));

    // When: Ctrl held, F11 tapped, F9 pressed with repeats
    for event in [
        RawKeyEvent::press(ctrl),
        RawKeyEvent::press(f11),
        RawKeyEvent::release(f11),
        RawKeyEvent::press(f9),
        RawKeyEvent::press(f9),
        RawKeyEvent::release(f9),
        RawKeyEvent::release(ctrl),
    ] {
        bridge.handle_event(BridgeEvent::Raw(event));
    }

    // Then: CodeShare then FullScreenCapture, once each
    assert_eq!(
        dispatcher.calls(),
        vec![ActionId::CodeShare, ActionId::FullScreenCapture]
    );
}

/// WHAT: The bridge loop stops on the shutdown signal
/// WHY: The app must be able to stop the bridge while sources stay open
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_running_bridge_when_shutdown_signalled_then_run_returns() {
    let registry = HotkeyRegistry::new(FakeBackend::default());
    let bridge = HotkeyBridge::new(registry.shared(), RecordingDispatcher::default());
    let (_events_tx, events_rx) = mpsc::channel::<BridgeEvent>(8);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(bridge.run(events_rx, shutdown_rx));

    shutdown_tx.send(true).unwrap();

    let joined = tokio::time::timeout(Duration::from_secs(1), handle).await;
    assert!(joined.is_ok());
}
