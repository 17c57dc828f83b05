use crate::{
    ActionId, GrabBackend, HotkeyRegistry, Key, KeyComboMatcher, Modifier, RawKey, RawKeyEvent,
};

fn ctrl() -> RawKey {
    RawKey::Modifier(Modifier::Ctrl)
}

fn right_ctrl() -> RawKey {
    RawKey::RightModifier(Modifier::Ctrl)
}

fn shift() -> RawKey {
    RawKey::Modifier(Modifier::Shift)
}

fn f(n: u8) -> RawKey {
    RawKey::Key(Key::F(n))
}

#[allow(clippy::unwrap_used)]
fn registry_with(bindings: &[(ActionId, &str)]) -> HotkeyRegistry<GrabBackend> {
    let mut registry = HotkeyRegistry::new(GrabBackend::new());
    registry.reload_all(bindings).unwrap();
    registry
}

/// WHAT: Holding Ctrl then pressing F9 fires the bound action
/// WHY: Raw interception has to rebuild the chord from single key events
#[test]
fn given_ctrl_f9_binding_when_chord_pressed_then_action_matched() {
    // Given: Ctrl+F9 bound to FullScreenCapture
    let registry = registry_with(&[(ActionId::FullScreenCapture, "Ctrl+F9")]);
    let mut matcher = KeyComboMatcher::new(registry.shared());

    // When: Ctrl down, F9 down
    let first = matcher.on_event(RawKeyEvent::press(ctrl()));
    let second = matcher.on_event(RawKeyEvent::press(f(9)));

    // Then: Only the terminal key completes the match
    assert_eq!(first, None);
    assert_eq!(second, Some(ActionId::FullScreenCapture));
}

/// WHAT: Auto-repeat of a held key does not fire again
/// WHY: Holding the chord must not start a burst of uploads
#[test]
fn given_held_chord_when_key_repeats_then_fires_once() {
    let registry = registry_with(&[(ActionId::FullScreenCapture, "Ctrl+F9")]);
    let mut matcher = KeyComboMatcher::new(registry.shared());

    matcher.on_event(RawKeyEvent::press(ctrl()));
    let fired: Vec<_> = (0..5)
        .filter_map(|_| matcher.on_event(RawKeyEvent::press(f(9))))
        .collect();

    assert_eq!(fired, vec![ActionId::FullScreenCapture]);

    // Releasing and pressing again is a new press
    matcher.on_event(RawKeyEvent::release(f(9)));
    assert_eq!(
        matcher.on_event(RawKeyEvent::press(f(9))),
        Some(ActionId::FullScreenCapture)
    );
}

/// WHAT: Modifier sets must match exactly
/// WHY: Ctrl+Shift+F9 and Ctrl+F9 are different shortcuts
#[test]
fn given_overlapping_combos_when_pressing_each_then_correct_action() {
    let registry = registry_with(&[
        (ActionId::FullScreenCapture, "Ctrl+F9"),
        (ActionId::RegionCapture, "Ctrl+Shift+F9"),
    ]);
    let mut matcher = KeyComboMatcher::new(registry.shared());

    matcher.on_event(RawKeyEvent::press(ctrl()));
    matcher.on_event(RawKeyEvent::press(shift()));
    assert_eq!(
        matcher.on_event(RawKeyEvent::press(f(9))),
        Some(ActionId::RegionCapture)
    );
    matcher.on_event(RawKeyEvent::release(f(9)));
    matcher.on_event(RawKeyEvent::release(shift()));

    assert_eq!(
        matcher.on_event(RawKeyEvent::press(f(9))),
        Some(ActionId::FullScreenCapture)
    );
}

/// WHAT: A bare key or a key with the wrong modifiers does not match
/// WHY: Typing F9 in an editor must not trigger a capture
#[test]
fn given_ctrl_f9_binding_when_f9_alone_or_with_shift_then_no_match() {
    let registry = registry_with(&[(ActionId::FullScreenCapture, "Ctrl+F9")]);
    let mut matcher = KeyComboMatcher::new(registry.shared());

    assert_eq!(matcher.on_event(RawKeyEvent::press(f(9))), None);
    matcher.on_event(RawKeyEvent::release(f(9)));

    matcher.on_event(RawKeyEvent::press(shift()));
    assert_eq!(matcher.on_event(RawKeyEvent::press(f(9))), None);
}

/// WHAT: Another held key blocks the match
/// WHY: A chord has exactly one non-modifier key
#[test]
fn given_other_key_held_when_pressing_chord_then_no_match() {
    let registry = registry_with(&[(ActionId::CodeShare, "Ctrl+F11")]);
    let mut matcher = KeyComboMatcher::new(registry.shared());

    matcher.on_event(RawKeyEvent::press(ctrl()));
    matcher.on_event(RawKeyEvent::press(RawKey::Other(42)));

    assert_eq!(matcher.on_event(RawKeyEvent::press(f(11))), None);
}

/// WHAT: The matcher sees rebinds immediately
/// WHY: It reads the registry's latest snapshot on every press
#[test]
#[allow(clippy::unwrap_used)]
fn given_rebind_when_pressing_new_chord_then_matched() {
    let mut registry = registry_with(&[(ActionId::CodeShare, "Ctrl+F11")]);
    let mut matcher = KeyComboMatcher::new(registry.shared());

    registry.set_binding(ActionId::CodeShare, "Shift+F11").unwrap();

    matcher.on_event(RawKeyEvent::press(shift()));
    assert_eq!(
        matcher.on_event(RawKeyEvent::press(f(11))),
        Some(ActionId::CodeShare)
    );
}

/// WHAT: reset clears held modifiers
/// WHY: Callers that lose track of key state need a clean slate
#[test]
fn given_held_modifier_when_reset_then_cleared() {
    let registry = registry_with(&[]);
    let mut matcher = KeyComboMatcher::new(registry.shared());
    matcher.on_event(RawKeyEvent::press(ctrl()));

    matcher.reset();

    assert!(matcher.held_modifiers().is_empty());
}

/// WHAT: Releasing one Ctrl key keeps the modifier held while the other is down
/// WHY: Both physical copies can be held at once; either alone still counts as Ctrl
#[test]
fn given_both_ctrl_keys_held_when_right_released_then_chord_still_matches() {
    // Given: Left and right Ctrl held, then right Ctrl released
    let registry = registry_with(&[(ActionId::FullScreenCapture, "Ctrl+F9")]);
    let mut matcher = KeyComboMatcher::new(registry.shared());
    matcher.on_event(RawKeyEvent::press(ctrl()));
    matcher.on_event(RawKeyEvent::press(right_ctrl()));
    matcher.on_event(RawKeyEvent::release(right_ctrl()));

    // When: Pressing F9
    let action = matcher.on_event(RawKeyEvent::press(f(9)));

    // Then: Left Ctrl still counts
    assert_eq!(action, Some(ActionId::FullScreenCapture));
}

/// WHAT: The right-hand modifier alone completes a chord
/// WHY: Bindings name a modifier, not a side
#[test]
fn given_right_ctrl_held_when_pressing_f9_then_matched() {
    let registry = registry_with(&[(ActionId::FullScreenCapture, "Ctrl+F9")]);
    let mut matcher = KeyComboMatcher::new(registry.shared());

    matcher.on_event(RawKeyEvent::press(right_ctrl()));

    assert_eq!(
        matcher.on_event(RawKeyEvent::press(f(9))),
        Some(ActionId::FullScreenCapture)
    );
}

/// WHAT: Releasing the last held copy of a modifier clears it
/// WHY: A chord must not match on a modifier that is no longer down
#[test]
fn given_both_ctrl_keys_released_when_pressing_f9_then_no_match() {
    let registry = registry_with(&[(ActionId::FullScreenCapture, "Ctrl+F9")]);
    let mut matcher = KeyComboMatcher::new(registry.shared());
    matcher.on_event(RawKeyEvent::press(ctrl()));
    matcher.on_event(RawKeyEvent::press(right_ctrl()));

    matcher.on_event(RawKeyEvent::release(ctrl()));
    matcher.on_event(RawKeyEvent::release(right_ctrl()));

    assert!(matcher.held_modifiers().is_empty());
    assert_eq!(matcher.on_event(RawKeyEvent::press(f(9))), None);
}
