//! Variant A backend: OS-filtered global hotkeys through `global-hotkey`.
//!
//! The OS matches the combination itself and reports a discrete "hotkey
//! fired" event carrying the id returned by [`HotKey::id`].

use crate::{
    HotkeyBackend, HotkeyError, HotkeyResult, Key, KeyCombo, Modifier, Modifiers, NativeId,
};

use std::panic::Location;

use error_location::ErrorLocation;
use global_hotkey::{
    Error as GlobalHotkeyError, GlobalHotKeyManager,
    hotkey::{Code, HotKey, Modifiers as NativeModifiers},
};
use tracing::{debug, info, instrument};

/// Translate a portable combo into a `global-hotkey` [`HotKey`].
///
/// # Errors
///
/// `UnsupportedModifier` for modifiers the native API cannot express
/// (AltGr); `UnsupportedKey` for keys outside the native code table.
#[track_caller]
pub fn to_native(combo: &KeyCombo) -> HotkeyResult<HotKey> {
    let mut mods = NativeModifiers::empty();
    for modifier in combo.modifiers.iter() {
        let native = match modifier {
            Modifier::Ctrl => NativeModifiers::CONTROL,
            Modifier::Alt => NativeModifiers::ALT,
            Modifier::Shift => NativeModifiers::SHIFT,
            Modifier::Meta => NativeModifiers::META,
            Modifier::AltGr => {
                return Err(HotkeyError::UnsupportedModifier {
                    modifier: modifier.as_str().to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };
        mods |= native;
    }

    let code = key_to_code(combo.key).ok_or_else(|| HotkeyError::UnsupportedKey {
        key: combo.key.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let mods = (!mods.is_empty()).then_some(mods);
    Ok(HotKey::new(mods, code))
}

/// Translate a `global-hotkey` [`HotKey`] back into a portable combo.
///
/// # Errors
///
/// `UnsupportedKey` when the native code is outside the key table.
#[track_caller]
pub fn from_native(hotkey: &HotKey) -> HotkeyResult<KeyCombo> {
    let mut modifiers = Modifiers::empty();
    if hotkey.mods.contains(NativeModifiers::CONTROL) {
        modifiers.insert(Modifier::Ctrl);
    }
    if hotkey.mods.contains(NativeModifiers::ALT) {
        modifiers.insert(Modifier::Alt);
    }
    if hotkey.mods.contains(NativeModifiers::SHIFT) {
        modifiers.insert(Modifier::Shift);
    }
    if hotkey.mods.intersects(NativeModifiers::META | NativeModifiers::SUPER) {
        modifiers.insert(Modifier::Meta);
    }

    let key = code_to_key(hotkey.key).ok_or_else(|| HotkeyError::UnsupportedKey {
        key: format!("{:?}", hotkey.key),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(KeyCombo::new(modifiers, key))
}

const FUNCTION_CODES: [Code; 12] = [
    Code::F1,
    Code::F2,
    Code::F3,
    Code::F4,
    Code::F5,
    Code::F6,
    Code::F7,
    Code::F8,
    Code::F9,
    Code::F10,
    Code::F11,
    Code::F12,
];

const LETTER_CODES: [Code; 26] = [
    Code::KeyA,
    Code::KeyB,
    Code::KeyC,
    Code::KeyD,
    Code::KeyE,
    Code::KeyF,
    Code::KeyG,
    Code::KeyH,
    Code::KeyI,
    Code::KeyJ,
    Code::KeyK,
    Code::KeyL,
    Code::KeyM,
    Code::KeyN,
    Code::KeyO,
    Code::KeyP,
    Code::KeyQ,
    Code::KeyR,
    Code::KeyS,
    Code::KeyT,
    Code::KeyU,
    Code::KeyV,
    Code::KeyW,
    Code::KeyX,
    Code::KeyY,
    Code::KeyZ,
];

const DIGIT_CODES: [Code; 10] = [
    Code::Digit0,
    Code::Digit1,
    Code::Digit2,
    Code::Digit3,
    Code::Digit4,
    Code::Digit5,
    Code::Digit6,
    Code::Digit7,
    Code::Digit8,
    Code::Digit9,
];

fn key_to_code(key: Key) -> Option<Code> {
    match key {
        Key::F(n) => FUNCTION_CODES.get(usize::from(n).checked_sub(1)?).copied(),
        Key::Letter(c) if c.is_ascii_uppercase() => {
            LETTER_CODES.get(usize::from(c as u8 - b'A')).copied()
        }
        Key::Letter(_) => None,
        Key::Digit(d) => DIGIT_CODES.get(usize::from(d)).copied(),
        Key::Print => Some(Code::PrintScreen),
        Key::Space => Some(Code::Space),
        Key::Insert => Some(Code::Insert),
        Key::Delete => Some(Code::Delete),
        Key::Home => Some(Code::Home),
        Key::End => Some(Code::End),
        Key::PageUp => Some(Code::PageUp),
        Key::PageDown => Some(Code::PageDown),
    }
}

fn code_to_key(code: Code) -> Option<Key> {
    if let Some(i) = FUNCTION_CODES.iter().position(|c| *c == code) {
        return Some(Key::F(i as u8 + 1));
    }
    if let Some(i) = LETTER_CODES.iter().position(|c| *c == code) {
        return Some(Key::Letter(char::from(b'A' + i as u8)));
    }
    if let Some(i) = DIGIT_CODES.iter().position(|c| *c == code) {
        return Some(Key::Digit(i as u8));
    }
    match code {
        Code::PrintScreen => Some(Key::Print),
        Code::Space => Some(Key::Space),
        Code::Insert => Some(Key::Insert),
        Code::Delete => Some(Key::Delete),
        Code::Home => Some(Key::Home),
        Code::End => Some(Key::End),
        Code::PageUp => Some(Key::PageUp),
        Code::PageDown => Some(Key::PageDown),
        _ => None,
    }
}

/// Native hotkey backend.
///
/// Must be created and used on a thread with a message pump (e.g. the main
/// thread running a `tao` event loop) so that `WM_HOTKEY` messages are
/// dispatched on Windows.
pub struct NativeBackend {
    manager: GlobalHotKeyManager,
}

impl NativeBackend {
    /// Create the platform hotkey manager.
    #[track_caller]
    #[instrument]
    pub fn new() -> HotkeyResult<Self> {
        let manager = GlobalHotKeyManager::new().map_err(|e| HotkeyError::Backend {
            reason: format!("Failed to create manager: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!("Native hotkey backend initialized");

        Ok(Self { manager })
    }
}

impl HotkeyBackend for NativeBackend {
    #[track_caller]
    fn register(&mut self, combo: &KeyCombo) -> HotkeyResult<NativeId> {
        let hotkey = to_native(combo)?;

        self.manager.register(hotkey).map_err(|e| match e {
            GlobalHotkeyError::AlreadyRegistered(_) => HotkeyError::Conflict {
                combo: combo.to_string(),
                reason: "already registered".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            GlobalHotkeyError::FailedToRegister(msg) => HotkeyError::Conflict {
                combo: combo.to_string(),
                reason: format!("system rejected hotkey: {}", msg),
                location: ErrorLocation::from(Location::caller()),
            },
            other => HotkeyError::Backend {
                reason: format!("Failed to register {}: {}", combo, other),
                location: ErrorLocation::from(Location::caller()),
            },
        })?;

        debug!(combo = %combo, id = hotkey.id(), "Native hotkey registered");

        Ok(NativeId(hotkey.id()))
    }

    #[track_caller]
    fn unregister(&mut self, id: NativeId, combo: &KeyCombo) -> HotkeyResult<()> {
        let hotkey = to_native(combo)?;

        self.manager
            .unregister(hotkey)
            .map_err(|e| HotkeyError::Backend {
                reason: format!("Failed to unregister {} (id {}): {}", combo, id, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(combo = %combo, id = %id, "Native hotkey unregistered");

        Ok(())
    }

    fn name(&self) -> &'static str {
        "native"
    }
}
