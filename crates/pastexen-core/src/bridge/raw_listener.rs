//! Raw key interception through `rdev` (Variant B event source).
//!
//! `rdev::listen` blocks its thread forever and offers no way to stop it,
//! so it gets a dedicated OS thread. Events cross into the async side over
//! the bridge channel.

use crate::{BridgeEvent, HotkeyError, HotkeyResult, Key, Modifier, RawKey, RawKeyEvent};

use std::{panic::Location, thread::JoinHandle};

use error_location::ErrorLocation;
use rdev::{EventType, Key as RdevKey};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Start the listener thread. Events are dropped once the receiver is gone.
#[track_caller]
pub fn spawn_raw_listener(events_tx: mpsc::Sender<BridgeEvent>) -> HotkeyResult<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("pastexen-raw-keys".to_string())
        .spawn(move || {
            info!("Raw key listener started");
            let result = rdev::listen(move |event| {
                let raw = match event.event_type {
                    EventType::KeyPress(key) => RawKeyEvent::press(translate(key)),
                    EventType::KeyRelease(key) => RawKeyEvent::release(translate(key)),
                    _ => return,
                };
                // Receiver gone means shutdown; rdev cannot be stopped, so just drop.
                let _ = events_tx.blocking_send(BridgeEvent::Raw(raw));
            });
            if let Err(e) = result {
                error!(error = ?e, "Raw key listener failed");
            }
        })
        .map_err(|e| HotkeyError::Backend {
            reason: format!("Failed to spawn raw key listener: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
}

fn translate(key: RdevKey) -> RawKey {
    use RdevKey::*;

    let letter = |c: char| RawKey::Key(Key::Letter(c));
    let digit = |d: u8| RawKey::Key(Key::Digit(d));

    match key {
        ControlLeft => RawKey::Modifier(Modifier::Ctrl),
        ControlRight => RawKey::RightModifier(Modifier::Ctrl),
        Alt => RawKey::Modifier(Modifier::Alt),
        AltGr => RawKey::Modifier(Modifier::AltGr),
        ShiftLeft => RawKey::Modifier(Modifier::Shift),
        ShiftRight => RawKey::RightModifier(Modifier::Shift),
        MetaLeft => RawKey::Modifier(Modifier::Meta),
        MetaRight => RawKey::RightModifier(Modifier::Meta),
        F1 => RawKey::Key(Key::F(1)),
        F2 => RawKey::Key(Key::F(2)),
        F3 => RawKey::Key(Key::F(3)),
        F4 => RawKey::Key(Key::F(4)),
        F5 => RawKey::Key(Key::F(5)),
        F6 => RawKey::Key(Key::F(6)),
        F7 => RawKey::Key(Key::F(7)),
        F8 => RawKey::Key(Key::F(8)),
        F9 => RawKey::Key(Key::F(9)),
        F10 => RawKey::Key(Key::F(10)),
        F11 => RawKey::Key(Key::F(11)),
        F12 => RawKey::Key(Key::F(12)),
        KeyA => letter('A'),
        KeyB => letter('B'),
        KeyC => letter('C'),
        KeyD => letter('D'),
        KeyE => letter('E'),
        KeyF => letter('F'),
        KeyG => letter('G'),
        KeyH => letter('H'),
        KeyI => letter('I'),
        KeyJ => letter('J'),
        KeyK => letter('K'),
        KeyL => letter('L'),
        KeyM => letter('M'),
        KeyN => letter('N'),
        KeyO => letter('O'),
        KeyP => letter('P'),
        KeyQ => letter('Q'),
        KeyR => letter('R'),
        KeyS => letter('S'),
        KeyT => letter('T'),
        KeyU => letter('U'),
        KeyV => letter('V'),
        KeyW => letter('W'),
        KeyX => letter('X'),
        KeyY => letter('Y'),
        KeyZ => letter('Z'),
        Num0 => digit(0),
        Num1 => digit(1),
        Num2 => digit(2),
        Num3 => digit(3),
        Num4 => digit(4),
        Num5 => digit(5),
        Num6 => digit(6),
        Num7 => digit(7),
        Num8 => digit(8),
        Num9 => digit(9),
        PrintScreen => RawKey::Key(Key::Print),
        Space => RawKey::Key(Key::Space),
        Insert => RawKey::Key(Key::Insert),
        Delete => RawKey::Key(Key::Delete),
        Home => RawKey::Key(Key::Home),
        End => RawKey::Key(Key::End),
        PageUp => RawKey::Key(Key::PageUp),
        PageDown => RawKey::Key(Key::PageDown),
        Unknown(code) => RawKey::Other(code),
        other => RawKey::Other(other_code(other)),
    }
}

// Stable placeholder code for keys outside the table; only equality matters.
fn other_code(key: RdevKey) -> u32 {
    use std::hash::{DefaultHasher, Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    format!("{:?}", key).hash(&mut hasher);
    hasher.finish() as u32
}
