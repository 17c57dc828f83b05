use crate::{HotkeyError, Key, KeyCombo, Modifier};

/// WHAT: Canonical rendering re-parses to the same combo
/// WHY: Settings store persists the rendered form, reload must be lossless
#[test]
#[allow(clippy::unwrap_used)]
fn given_accepted_combos_when_rendered_and_reparsed_then_round_trip_is_stable() {
    // Given: Combos written with aliases, odd case and whitespace
    let inputs = [
        "Ctrl+F9",
        "control + shift + f10",
        "alt+CTRL+p",
        "Super+Print",
        "win+shift+3",
        "AltGr+PgDn",
        "F11",
        "cmd+option+Space",
    ];

    for input in inputs {
        // When: Parsing, rendering and parsing again
        let parsed = KeyCombo::parse(input).unwrap();
        let rendered = parsed.to_string();
        let reparsed = KeyCombo::parse(&rendered).unwrap();

        // Then: Both parses agree and the rendering is a fixed point
        assert_eq!(parsed, reparsed, "round trip changed {input}");
        assert_eq!(rendered, reparsed.to_string());
    }
}

/// WHAT: Modifiers render in a fixed order regardless of input order
/// WHY: Two spellings of one shortcut must persist identically
#[test]
#[allow(clippy::unwrap_used)]
fn given_modifiers_in_any_order_when_rendering_then_canonical_order_used() {
    // Given: The same chord typed two ways
    let a = KeyCombo::parse("shift+ctrl+alt+f9").unwrap();
    let b = KeyCombo::parse("Alt+Shift+Ctrl+F9").unwrap();

    // Then: Both render as Ctrl+Alt+Shift+F9
    assert_eq!(a.to_string(), "Ctrl+Alt+Shift+F9");
    assert_eq!(a, b);
}

/// WHAT: Repeated modifiers collapse
/// WHY: Duplicates carry no meaning and must not fail registration
#[test]
#[allow(clippy::unwrap_used)]
fn given_duplicate_modifier_when_parsing_then_collapsed() {
    let combo = KeyCombo::parse("Ctrl+Control+F9").unwrap();

    assert_eq!(combo.to_string(), "Ctrl+F9");
    assert!(combo.modifiers.contains(Modifier::Ctrl));
    assert_eq!(combo.key, Key::F(9));
}

/// WHAT: A combo of only modifiers is rejected
/// WHY: A combo needs exactly one non-modifier key before registration
#[test]
fn given_modifier_only_combo_when_parsing_then_invalid_combo() {
    let result = KeyCombo::parse("Ctrl+Shift");

    assert!(matches!(result, Err(HotkeyError::InvalidCombo { .. })));
}

/// WHAT: Structural mistakes are InvalidCombo
/// WHY: Empty strings, dangling '+' and two terminal keys are unparseable
#[test]
fn given_malformed_strings_when_parsing_then_invalid_combo() {
    for input in ["", "   ", "Ctrl+", "+F9", "Ctrl++F9", "F9+F10", "Hyper+F9"] {
        let result = KeyCombo::parse(input);
        assert!(
            matches!(result, Err(HotkeyError::InvalidCombo { .. })),
            "expected InvalidCombo for {input:?}"
        );
    }
}

/// WHAT: A terminal key outside the key table is UnsupportedKey
/// WHY: Unknown keys must fail, never fall back to some default key
#[test]
fn given_unknown_terminal_key_when_parsing_then_unsupported_key() {
    for input in ["Ctrl+F13", "Ctrl+Escape", "Alt+Tab", "Ctrl+é"] {
        let result = KeyCombo::parse(input);
        assert!(
            matches!(result, Err(HotkeyError::UnsupportedKey { .. })),
            "expected UnsupportedKey for {input:?}"
        );
    }
}

/// WHAT: Key table covers letters, digits and named keys
/// WHY: Terminal key parsing is the table's only entry point
#[test]
fn given_table_keys_when_parsing_names_then_expected_keys() {
    assert_eq!(Key::from_name("f1"), Some(Key::F(1)));
    assert_eq!(Key::from_name("F12"), Some(Key::F(12)));
    assert_eq!(Key::from_name("F0"), None);
    assert_eq!(Key::from_name("f"), Some(Key::Letter('F')));
    assert_eq!(Key::from_name("7"), Some(Key::Digit(7)));
    assert_eq!(Key::from_name("PrtSc"), Some(Key::Print));
    assert_eq!(Key::from_name("pgup"), Some(Key::PageUp));
    assert_eq!(Key::from_name("Tab"), None);
}
