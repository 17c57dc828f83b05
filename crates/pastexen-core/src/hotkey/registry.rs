//! Ownership of every active global shortcut.
//!
//! The registry is the only component allowed to call the backend's
//! register/unregister operations. After every mutation it publishes an
//! immutable [`BindingSnapshot`] through [`SharedBindings`], which the event
//! bridge reads from another thread without ever seeing a half-updated map.

use crate::{ActionId, HotkeyBackend, HotkeyError, HotkeyResult, KeyCombo, NativeId};

use std::{
    collections::{BTreeMap, HashMap},
    panic::Location,
    sync::{Arc, RwLock},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// One active registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyBinding {
    /// Action fired by the combo.
    pub action: ActionId,
    /// The registered combination.
    pub combo: KeyCombo,
    /// Backend handle needed to unregister.
    pub native_id: NativeId,
}

/// Immutable view of the bindings at one point in time.
#[derive(Debug, Default)]
pub struct BindingSnapshot {
    by_id: HashMap<NativeId, ActionId>,
    combos: Vec<(KeyCombo, ActionId)>,
}

impl BindingSnapshot {
    fn from_bindings<'a>(bindings: impl Iterator<Item = &'a HotkeyBinding>) -> Self {
        let mut snapshot = Self::default();
        for binding in bindings {
            snapshot.by_id.insert(binding.native_id, binding.action);
            snapshot.combos.push((binding.combo, binding.action));
        }
        snapshot
    }

    /// Action registered under a backend id.
    pub fn action_for_id(&self, id: NativeId) -> Option<ActionId> {
        self.by_id.get(&id).copied()
    }

    /// Action registered for an exact combo.
    pub fn action_for_combo(&self, combo: &KeyCombo) -> Option<ActionId> {
        self.combos
            .iter()
            .find(|(c, _)| c == combo)
            .map(|(_, action)| *action)
    }

    /// All registered combos.
    pub fn combos(&self) -> &[(KeyCombo, ActionId)] {
        &self.combos
    }

    /// Number of active bindings.
    pub fn len(&self) -> usize {
        self.combos.len()
    }

    /// Whether no binding is active.
    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }
}

/// Read-only, thread-safe handle on the registry's current bindings.
///
/// Cloning is cheap. Readers get a whole snapshot; the registry swaps in a
/// new one after each change.
#[derive(Debug, Clone, Default)]
pub struct SharedBindings {
    inner: Arc<RwLock<Arc<BindingSnapshot>>>,
}

impl SharedBindings {
    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<BindingSnapshot> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Resolve a backend id against the current snapshot.
    pub fn resolve(&self, id: NativeId) -> Option<ActionId> {
        self.snapshot().action_for_id(id)
    }

    fn publish(&self, snapshot: BindingSnapshot) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(snapshot);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegistryState {
    Active,
    ShutDown,
}

/// Owns the [`HotkeyBinding`]s and the backend they are registered with.
pub struct HotkeyRegistry<B: HotkeyBackend> {
    backend: B,
    bindings: BTreeMap<ActionId, HotkeyBinding>,
    shared: SharedBindings,
    state: RegistryState,
}

impl<B: HotkeyBackend> HotkeyRegistry<B> {
    /// Create an active registry with no bindings.
    pub fn new(backend: B) -> Self {
        info!(backend = backend.name(), "Hotkey registry created");

        Self {
            backend,
            bindings: BTreeMap::new(),
            shared: SharedBindings::default(),
            state: RegistryState::Active,
        }
    }

    /// Read-only view for the event bridge.
    pub fn shared(&self) -> SharedBindings {
        self.shared.clone()
    }

    /// Current binding for `action`, if any.
    pub fn binding(&self, action: ActionId) -> Option<&HotkeyBinding> {
        self.bindings.get(&action)
    }

    /// All current bindings in action order.
    pub fn bindings(&self) -> impl Iterator<Item = &HotkeyBinding> {
        self.bindings.values()
    }

    /// Access the backend, e.g. to inspect a test double.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether [`HotkeyRegistry::shutdown`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.state == RegistryState::ShutDown
    }

    /// Replace the combo bound to `action`.
    ///
    /// The old registration is released first and is **not** restored if the
    /// new one fails: on error, `action` has no active hotkey.
    ///
    /// # Errors
    ///
    /// Parse/translation errors, `Conflict` when another action already owns
    /// the combo or the OS refuses it, `Inactive` after shutdown.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn set_binding(&mut self, action: ActionId, combo: &str) -> HotkeyResult<()> {
        self.ensure_active()?;

        self.release(action);
        let result = self.register(action, combo);
        self.publish();

        result
    }

    /// Remove any hotkey for `action`.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn clear_binding(&mut self, action: ActionId) -> HotkeyResult<()> {
        self.ensure_active()?;

        self.release(action);
        self.publish();

        Ok(())
    }

    /// Drop every binding, then register each supplied combo independently.
    ///
    /// One bad combo does not stop the others; every failure is returned
    /// with the action it belongs to, in action order.
    #[instrument(skip(self, bindings))]
    pub fn reload_all<S: AsRef<str>>(
        &mut self,
        bindings: &[(ActionId, S)],
    ) -> Result<(), Vec<(ActionId, HotkeyError)>> {
        if self.is_shut_down() {
            return Err(bindings
                .iter()
                .map(|(action, _)| {
                    let error = HotkeyError::Inactive {
                        location: ErrorLocation::from(Location::caller()),
                    };
                    (*action, error)
                })
                .collect());
        }

        self.release_all();

        let ordered: BTreeMap<ActionId, &str> = bindings
            .iter()
            .map(|(action, combo)| (*action, combo.as_ref()))
            .collect();

        let mut errors = Vec::new();
        for (action, combo) in ordered {
            if let Err(e) = self.register(action, combo) {
                warn!(action = %action, combo, error = %e, "Hotkey registration failed");
                errors.push((action, e));
            }
        }

        self.publish();

        info!(
            registered = self.bindings.len(),
            failed = errors.len(),
            "Hotkeys reloaded"
        );

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Unregister everything and deactivate the registry. Safe to call twice.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        if self.state == RegistryState::ShutDown {
            return;
        }

        self.release_all();
        self.publish();
        self.state = RegistryState::ShutDown;

        info!("Hotkey registry shut down");
    }

    #[track_caller]
    fn ensure_active(&self) -> HotkeyResult<()> {
        match self.state {
            RegistryState::Active => Ok(()),
            RegistryState::ShutDown => Err(HotkeyError::Inactive {
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    #[track_caller]
    fn register(&mut self, action: ActionId, combo: &str) -> HotkeyResult<()> {
        let combo = KeyCombo::parse(combo)?;

        if let Some(owner) = self
            .bindings
            .values()
            .find(|b| b.combo == combo && b.action != action)
        {
            return Err(HotkeyError::Conflict {
                combo: combo.to_string(),
                reason: format!("already bound to {}", owner.action),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let native_id = self.backend.register(&combo)?;
        self.bindings.insert(
            action,
            HotkeyBinding {
                action,
                combo,
                native_id,
            },
        );

        info!(action = %action, combo = %combo, id = %native_id, "Hotkey bound");

        Ok(())
    }

    fn release(&mut self, action: ActionId) {
        if let Some(binding) = self.bindings.remove(&action) {
            // Forgotten even if the backend refuses to unregister.
            if let Err(e) = self.backend.unregister(binding.native_id, &binding.combo) {
                warn!(action = %action, error = %e, "Failed to unregister hotkey");
            } else {
                debug!(action = %action, combo = %binding.combo, "Hotkey released");
            }
        }
    }

    fn release_all(&mut self) {
        let actions: Vec<ActionId> = self.bindings.keys().copied().collect();
        for action in actions {
            self.release(action);
        }
    }

    fn publish(&self) {
        self.shared
            .publish(BindingSnapshot::from_bindings(self.bindings.values()));
    }
}

impl<B: HotkeyBackend> Drop for HotkeyRegistry<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
