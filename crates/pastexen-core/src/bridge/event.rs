use crate::{Key, Modifier, NativeId};

/// A key as seen by raw interception.
///
/// The two physical copies of a modifier stay distinct so that releasing one
/// side does not clear a modifier still held on the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawKey {
    /// A left-hand or single modifier key.
    Modifier(Modifier),
    /// The right-hand copy of a modifier.
    RightModifier(Modifier),
    /// A key from the portable key table.
    Key(Key),
    /// Anything else, by platform scan code.
    Other(u32),
}

/// One press or release from a raw key source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    /// The key.
    pub key: RawKey,
    /// `true` on press (including auto-repeat), `false` on release.
    pub pressed: bool,
}

impl RawKeyEvent {
    /// A key-down event.
    pub fn press(key: RawKey) -> Self {
        Self { key, pressed: true }
    }

    /// A key-up event.
    pub fn release(key: RawKey) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

/// Events delivered to the [`HotkeyBridge`](crate::HotkeyBridge).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeEvent {
    /// The OS reported that the hotkey with this id fired.
    Native(NativeId),
    /// A raw key event that still has to be matched against the bindings.
    Raw(RawKeyEvent),
}
