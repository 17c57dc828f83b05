mod action;
mod backend;
mod combo;
mod grab;
mod native;
mod registry;

pub use {
    action::ActionId,
    backend::{HotkeyBackend, NativeId},
    combo::{Key, KeyCombo, Modifier, Modifiers},
    grab::GrabBackend,
    native::{NativeBackend, from_native, to_native},
    registry::{BindingSnapshot, HotkeyBinding, HotkeyRegistry, SharedBindings},
};
