#[allow(clippy::module_inception)]
mod bridge;
mod event;
mod matcher;
mod native_source;
#[cfg(feature = "raw-listener")]
mod raw_listener;

pub use {
    bridge::{ActionDispatcher, HotkeyBridge},
    event::{BridgeEvent, RawKey, RawKeyEvent},
    matcher::KeyComboMatcher,
    native_source::forward_native_events,
};

#[cfg(feature = "raw-listener")]
pub use raw_listener::spawn_raw_listener;
