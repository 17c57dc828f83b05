use crate::{
    ActionDispatcher, ActionId, HotkeyBackend, HotkeyError, HotkeyResult, KeyCombo, NativeId,
};

use std::{
    collections::HashMap,
    panic::Location,
    sync::{Arc, Mutex},
};

use error_location::ErrorLocation;

/// Backend double that records live registrations and can refuse combos.
#[derive(Default)]
pub(crate) struct FakeBackend {
    next_id: u32,
    pub(crate) active: HashMap<NativeId, KeyCombo>,
    pub(crate) refused: Vec<KeyCombo>,
    pub(crate) register_calls: usize,
}

impl FakeBackend {
    pub(crate) fn refusing(combo: &str) -> Self {
        let mut backend = Self::default();
        if let Ok(combo) = KeyCombo::parse(combo) {
            backend.refused.push(combo);
        }
        backend
    }
}

impl HotkeyBackend for FakeBackend {
    fn register(&mut self, combo: &KeyCombo) -> HotkeyResult<NativeId> {
        self.register_calls += 1;
        if self.refused.contains(combo) {
            return Err(HotkeyError::Conflict {
                combo: combo.to_string(),
                reason: "claimed by another application".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.next_id += 1;
        let id = NativeId(self.next_id);
        self.active.insert(id, *combo);
        Ok(id)
    }

    fn unregister(&mut self, id: NativeId, _combo: &KeyCombo) -> HotkeyResult<()> {
        self.active.remove(&id);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Dispatcher double that records every invoked action.
#[derive(Clone, Default)]
pub(crate) struct RecordingDispatcher {
    pub(crate) invoked: Arc<Mutex<Vec<ActionId>>>,
}

impl RecordingDispatcher {
    pub(crate) fn calls(&self) -> Vec<ActionId> {
        self.invoked.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ActionDispatcher for RecordingDispatcher {
    fn invoke(&self, action: ActionId) {
        self.invoked
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(action);
    }
}
