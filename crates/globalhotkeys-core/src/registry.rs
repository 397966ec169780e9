// Globalhotkeys Registry
// Binding storage and the arm/disarm re-trigger guard

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use smallvec::SmallVec;

use crate::modifier::keys_match;
use crate::state::PressedKeys;
use crate::{Combination, HotkeyCallback, Stroke, VirtualKey};

/// Prefix for generated binding ids
pub const AUTO_ID_PREFIX: &str = "hk_";

/// A registered binding as reported to callers (the callback stays inside)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HotkeyBinding {
    pub id: String,
    pub combination: Combination,
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.combination)
    }
}

/// A callback the matcher decided to run
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub id: String,
    pub callback: HotkeyCallback,
}

#[derive(Debug)]
struct RegistryEntry {
    combination: Combination,
    callback: HotkeyCallback,
}

type ArmedKeys = SmallVec<[VirtualKey; 4]>;

/// Concurrent binding registry.
///
/// Bindings live behind a read-mostly lock and are replaced whole on every
/// mutation, so the match pass only ever sees complete entries. The armed
/// set has its own exclusive section, which is also the section the match
/// pass runs under: events are evaluated one at a time with respect to
/// arming, and `unregister` cannot interleave with an arming decision.
///
/// Readers share a `parking_lot::RwLock` instead of reading lock-free.
/// A match pass never waits on another reader, only on a mutator's brief
/// write while it swaps one `Arc` entry.
///
/// Lock order is armed, then bindings. Mutators never hold both.
#[derive(Debug, Default)]
pub struct HotkeyRegistry {
    bindings: RwLock<IndexMap<String, Arc<RegistryEntry>>>,
    armed: Mutex<HashMap<String, ArmedKeys>>,
    next_id: AtomicU32,
}

impl HotkeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding and return its id.
    ///
    /// Without an id, one is generated as `"hk_<n>"` from a monotonically
    /// increasing counter. Registering an id that already exists replaces
    /// its combination and callback.
    pub fn register(
        &self,
        id: Option<&str>,
        combination: Combination,
        callback: HotkeyCallback,
    ) -> String {
        let entry = Arc::new(RegistryEntry {
            combination,
            callback,
        });

        let mut bindings = self.bindings.write();
        let id = match id {
            Some(id) => id.to_string(),
            None => self.generate_id(&bindings),
        };
        log::debug!("register hotkey {}: {}", id, entry.combination);
        bindings.insert(id.clone(), entry);
        id
    }

    fn generate_id(&self, bindings: &IndexMap<String, Arc<RegistryEntry>>) -> String {
        loop {
            let n = self.next_id.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
            let id = format!("{}{}", AUTO_ID_PREFIX, n);
            if !bindings.contains_key(&id) {
                return id;
            }
        }
    }

    /// Remove a binding and any armed state for it. Unknown ids are ignored.
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.bindings.write().shift_remove(id).is_some();
        self.armed.lock().remove(id);
        if removed {
            log::debug!("unregister hotkey {}", id);
        }
        removed
    }

    /// Replace the combination of an existing binding, keeping its callback
    pub fn change_combination(&self, id: &str, combination: Combination) -> bool {
        let mut bindings = self.bindings.write();
        let Some(entry) = bindings.get_mut(id) else {
            return false;
        };
        log::debug!("change hotkey {}: {} -> {}", id, entry.combination, combination);
        *entry = Arc::new(RegistryEntry {
            combination,
            callback: entry.callback.clone(),
        });
        true
    }

    /// Replace the callback of an existing binding, keeping its combination
    pub fn change_callback(&self, id: &str, callback: HotkeyCallback) -> bool {
        let mut bindings = self.bindings.write();
        let Some(entry) = bindings.get_mut(id) else {
            return false;
        };
        log::debug!("change hotkey {} callback", id);
        *entry = Arc::new(RegistryEntry {
            combination: entry.combination.clone(),
            callback,
        });
        true
    }

    /// Copy of all bindings in registration order
    pub fn bindings(&self) -> Vec<HotkeyBinding> {
        self.bindings
            .read()
            .iter()
            .map(|(id, entry)| HotkeyBinding {
                id: id.clone(),
                combination: entry.combination.clone(),
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<HotkeyBinding> {
        self.bindings.read().get(id).map(|entry| HotkeyBinding {
            id: id.to_string(),
            combination: entry.combination.clone(),
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.bindings.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// True while a binding has fired and is waiting for its keys to be released
    pub fn is_armed(&self, id: &str) -> bool {
        self.armed.lock().contains_key(id)
    }

    pub fn armed_count(&self) -> usize {
        self.armed.lock().len()
    }

    /// Drop all armed state
    pub fn reset_armed(&self) {
        self.armed.lock().clear();
    }

    /// Run one match pass for a hook event.
    ///
    /// On a release, every armed binding holding a key equivalent to the
    /// released one is disarmed first, whether or not it is release-triggered.
    /// Then each unarmed binding whose combination matches is armed with its
    /// key set and returned for dispatch. The caller runs the returned
    /// callbacks; nothing here awaits them.
    pub fn process(&self, stroke: Stroke, pressed: &PressedKeys) -> Vec<Dispatch> {
        let mut armed = self.armed.lock();

        if stroke.action.is_up() {
            armed.retain(|id, keys| {
                let released = keys.iter().any(|key| keys_match(*key, stroke.key));
                if released {
                    log::trace!("disarm hotkey {} on {}", id, stroke);
                }
                !released
            });
        }

        let bindings = self.bindings.read();
        let mut fired = Vec::new();
        for (id, entry) in bindings.iter() {
            if armed.contains_key(id) || !entry.combination.matches(stroke, pressed) {
                continue;
            }
            log::debug!("hotkey {} triggered by {}", id, stroke);
            armed.insert(id.clone(), entry.combination.keys());
            fired.push(Dispatch {
                id: id.clone(),
                callback: entry.callback.clone(),
            });
        }
        fired
    }
}
