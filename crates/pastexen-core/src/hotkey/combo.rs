//! Portable key-combination representation.
//!
//! A [`KeyCombo`] is a set of modifiers plus exactly one terminal key. Its
//! canonical string form (`"Ctrl+Shift+F9"`) is what the settings store
//! persists and what the UI displays.

use crate::{HotkeyError, HotkeyResult};

use std::{fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// A modifier key.
///
/// Declaration order is the canonical rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    /// Control.
    Ctrl,
    /// Alt (Option on macOS).
    Alt,
    /// Shift.
    Shift,
    /// Super / Windows / Command.
    Meta,
    /// Right Alt on ISO layouts. Only raw key interception can see it.
    AltGr,
}

impl Modifier {
    /// Every modifier in canonical order.
    pub const ALL: [Modifier; 5] = [
        Modifier::Ctrl,
        Modifier::Alt,
        Modifier::Shift,
        Modifier::Meta,
        Modifier::AltGr,
    ];

    /// Canonical token.
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::Meta => "Meta",
            Modifier::AltGr => "AltGr",
        }
    }

    /// Parse a modifier token, accepting common aliases (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifier::Ctrl),
            "alt" | "option" => Some(Modifier::Alt),
            "shift" => Some(Modifier::Shift),
            "meta" | "super" | "win" | "cmd" | "command" => Some(Modifier::Meta),
            "altgr" => Some(Modifier::AltGr),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifiers.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Add a modifier. Adding one twice is a no-op.
    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    /// Remove a modifier.
    pub fn remove(&mut self, modifier: Modifier) {
        self.0 &= !modifier.bit();
    }

    /// Whether `modifier` is in the set.
    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    /// Whether the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Modifiers in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut set = Modifiers::empty();
        for modifier in iter {
            set.insert(modifier);
        }
        set
    }
}

/// A terminal (non-modifier) key.
///
/// This is the closed key table. New keys are added here, in
/// [`Key::from_name`], in `Display`, and in each backend translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Function key `F1`..=`F12`.
    F(u8),
    /// Letter `A`..=`Z` (stored upper-case).
    Letter(char),
    /// Top-row digit `0`..=`9`.
    Digit(u8),
    /// Print Screen.
    Print,
    /// Space bar.
    Space,
    /// Insert.
    Insert,
    /// Delete.
    Delete,
    /// Home.
    Home,
    /// End.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
}

impl Key {
    /// Parse a key token (case-insensitive). Returns `None` for keys outside the table.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();

        if let Some(number) = lower.strip_prefix('f') {
            if let Ok(n) = number.parse::<u8>() {
                return (1..=12).contains(&n).then_some(Key::F(n));
            }
        }

        let mut chars = lower.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_lowercase() {
                return Some(Key::Letter(c.to_ascii_uppercase()));
            }
            if let Some(d) = c.to_digit(10) {
                return Some(Key::Digit(d as u8));
            }
            return None;
        }

        match lower.as_str() {
            "print" | "printscreen" | "prtsc" => Some(Key::Print),
            "space" => Some(Key::Space),
            "insert" | "ins" => Some(Key::Insert),
            "delete" | "del" => Some(Key::Delete),
            "home" => Some(Key::Home),
            "end" => Some(Key::End),
            "pageup" | "pgup" => Some(Key::PageUp),
            "pagedown" | "pgdown" | "pgdn" => Some(Key::PageDown),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::F(n) => write!(f, "F{}", n),
            Key::Letter(c) => write!(f, "{}", c),
            Key::Digit(d) => write!(f, "{}", d),
            Key::Print => f.write_str("Print"),
            Key::Space => f.write_str("Space"),
            Key::Insert => f.write_str("Insert"),
            Key::Delete => f.write_str("Delete"),
            Key::Home => f.write_str("Home"),
            Key::End => f.write_str("End"),
            Key::PageUp => f.write_str("PageUp"),
            Key::PageDown => f.write_str("PageDown"),
        }
    }
}

/// Modifiers plus exactly one terminal key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// The terminal key.
    pub key: Key,
}

impl KeyCombo {
    /// Build a combo from parts.
    pub fn new(modifiers: Modifiers, key: Key) -> Self {
        Self { modifiers, key }
    }

    /// Parse a shortcut string such as `"ctrl + shift + f9"`.
    ///
    /// # Errors
    ///
    /// `InvalidCombo` when the string is empty, has an empty token, has no
    /// terminal key or more than one; `UnsupportedKey` when the terminal
    /// key is outside the key table.
    #[track_caller]
    pub fn parse(input: &str) -> HotkeyResult<Self> {
        let invalid = |reason: &str| HotkeyError::InvalidCombo {
            combo: input.to_string(),
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty shortcut"));
        }

        let tokens: Vec<&str> = trimmed.split('+').map(str::trim).collect();
        if tokens.iter().any(|t| t.is_empty()) {
            return Err(invalid("empty key name"));
        }

        let Some((last, leading)) = tokens.split_last() else {
            return Err(invalid("empty shortcut"));
        };

        let mut modifiers = Modifiers::empty();
        for token in leading {
            match Modifier::from_name(token) {
                Some(modifier) => modifiers.insert(modifier),
                None if Key::from_name(token).is_some() => {
                    return Err(invalid("more than one non-modifier key"));
                }
                None => return Err(invalid(&format!("unknown modifier {:?}", token))),
            }
        }

        if Modifier::from_name(last).is_some() {
            return Err(invalid("no non-modifier key"));
        }

        let key = Key::from_name(last).ok_or_else(|| HotkeyError::UnsupportedKey {
            key: last.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in self.modifiers.iter() {
            write!(f, "{}+", modifier.as_str())?;
        }
        write!(f, "{}", self.key)
    }
}

impl FromStr for KeyCombo {
    type Err = HotkeyError;

    #[track_caller]
    fn from_str(s: &str) -> HotkeyResult<Self> {
        Self::parse(s)
    }
}
