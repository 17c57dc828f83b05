use crate::{HotkeyResult, KeyCombo};

use std::fmt;

/// Handle returned by a backend when a combination is registered.
///
/// For the native backend this is the `global-hotkey` id (a hash of the
/// modifiers and key code); for the grab backend a small counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeId(pub u32);

impl fmt::Display for NativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability interface over a platform hotkey API.
///
/// Only [`HotkeyRegistry`](crate::HotkeyRegistry) calls these methods.
pub trait HotkeyBackend {
    /// Register `combo` with the platform and return its handle.
    fn register(&mut self, combo: &KeyCombo) -> HotkeyResult<NativeId>;

    /// Release a handle previously returned by [`HotkeyBackend::register`].
    fn unregister(&mut self, id: NativeId, combo: &KeyCombo) -> HotkeyResult<()>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

impl<B: HotkeyBackend + ?Sized> HotkeyBackend for Box<B> {
    fn register(&mut self, combo: &KeyCombo) -> HotkeyResult<NativeId> {
        (**self).register(combo)
    }

    fn unregister(&mut self, id: NativeId, combo: &KeyCombo) -> HotkeyResult<()> {
        (**self).unregister(id, combo)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
