//! Combo matching for raw key interception (Variant B).
//!
//! The raw source reports every key press in the session, so this side has
//! to do what the OS does for native hotkeys: track which modifiers are
//! held, suppress auto-repeat, and compare the full chord against the
//! registered combos.

use crate::{ActionId, KeyCombo, Modifiers, RawKey, RawKeyEvent, SharedBindings};

use std::collections::HashSet;

use tracing::trace;

/// Stateful matcher from raw key events to actions.
///
/// A modifier counts as held while either of its physical keys is down.
pub struct KeyComboMatcher {
    bindings: SharedBindings,
    modifier_keys: HashSet<RawKey>,
    held: HashSet<RawKey>,
}

impl KeyComboMatcher {
    /// Create a matcher reading from the registry's shared bindings.
    pub fn new(bindings: SharedBindings) -> Self {
        Self {
            bindings,
            modifier_keys: HashSet::new(),
            held: HashSet::new(),
        }
    }

    /// Feed one event; returns the action when it completes a registered combo.
    ///
    /// A combo fires once per physical press: repeats of a key that is
    /// already down are ignored until it is released. The chord must match
    /// exactly: extra modifiers or a second held key prevent a match.
    pub fn on_event(&mut self, event: RawKeyEvent) -> Option<ActionId> {
        match (event.key, event.pressed) {
            (key @ (RawKey::Modifier(_) | RawKey::RightModifier(_)), true) => {
                self.modifier_keys.insert(key);
                None
            }
            (key @ (RawKey::Modifier(_) | RawKey::RightModifier(_)), false) => {
                self.modifier_keys.remove(&key);
                None
            }
            (key, false) => {
                self.held.remove(&key);
                None
            }
            (key, true) => {
                let others_held = !self.held.is_empty();
                if !self.held.insert(key) {
                    trace!(key = ?key, "Ignoring auto-repeat");
                    return None;
                }

                let RawKey::Key(terminal) = key else {
                    return None;
                };
                if others_held {
                    return None;
                }

                let combo = KeyCombo::new(self.held_modifiers(), terminal);
                self.bindings.snapshot().action_for_combo(&combo)
            }
        }
    }

    /// Forget all held keys and modifiers.
    pub fn reset(&mut self) {
        self.modifier_keys.clear();
        self.held.clear();
    }

    /// Modifiers currently held on either side.
    pub fn held_modifiers(&self) -> Modifiers {
        let mut modifiers = Modifiers::empty();
        for key in &self.modifier_keys {
            if let RawKey::Modifier(modifier) | RawKey::RightModifier(modifier) = key {
                modifiers.insert(*modifier);
            }
        }
        modifiers
    }
}
