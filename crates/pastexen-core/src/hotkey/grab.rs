//! Variant B backend: in-process bookkeeping for raw key interception.
//!
//! No OS call is made. The raw listener sees every key event and the
//! [`KeyComboMatcher`](crate::KeyComboMatcher) filters them against the
//! registry snapshot, so registration only has to hand out ids and keep
//! combos unique.

use crate::{HotkeyBackend, HotkeyError, HotkeyResult, KeyCombo, NativeId};

use std::{collections::HashMap, panic::Location};

use error_location::ErrorLocation;
use tracing::debug;

/// Software hotkey backend with small integer ids starting at 1.
#[derive(Debug, Default)]
pub struct GrabBackend {
    next_id: u32,
    claimed: HashMap<NativeId, KeyCombo>,
}

impl GrabBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of combos currently claimed.
    pub fn active_count(&self) -> usize {
        self.claimed.len()
    }
}

impl HotkeyBackend for GrabBackend {
    #[track_caller]
    fn register(&mut self, combo: &KeyCombo) -> HotkeyResult<NativeId> {
        if self.claimed.values().any(|c| c == combo) {
            return Err(HotkeyError::Conflict {
                combo: combo.to_string(),
                reason: "already grabbed by this process".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.next_id = self.next_id.checked_add(1).ok_or_else(|| HotkeyError::Backend {
            reason: "hotkey id space exhausted".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let id = NativeId(self.next_id);
        self.claimed.insert(id, *combo);

        debug!(combo = %combo, id = %id, "Grab hotkey registered");

        Ok(id)
    }

    #[track_caller]
    fn unregister(&mut self, id: NativeId, combo: &KeyCombo) -> HotkeyResult<()> {
        match self.claimed.remove(&id) {
            Some(_) => {
                debug!(combo = %combo, id = %id, "Grab hotkey unregistered");
                Ok(())
            }
            None => Err(HotkeyError::Backend {
                reason: format!("No grab registered for {} (id {})", combo, id),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "grab"
    }
}
