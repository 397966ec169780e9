// Globalhotkeys Input State Tracker
// Currently-pressed keys, fed in hook delivery order

use std::collections::HashSet;

use smallvec::SmallVec;

use crate::modifier::keys_match;
use crate::{KeyAction, Stroke, VirtualKey};

/// Immutable copy of the pressed-key set at one instant.
///
/// Handed by value to the matcher so that matching never observes the live
/// set. Sorted by key code; SmallVec avoids a heap allocation for the usual
/// handful of held keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressedKeys {
    keys: SmallVec<[VirtualKey; 8]>,
}

impl PressedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Exact membership test
    pub fn contains(&self, key: VirtualKey) -> bool {
        self.keys.binary_search(&key).is_ok()
    }

    /// Membership test honouring modifier equivalence: a generic modifier is
    /// held when either of its physical variants is.
    pub fn contains_equivalent(&self, key: VirtualKey) -> bool {
        self.contains(key) || self.keys.iter().any(|held| keys_match(key, *held))
    }

    pub fn iter(&self) -> impl Iterator<Item = &VirtualKey> {
        self.keys.iter()
    }
}

impl FromIterator<VirtualKey> for PressedKeys {
    fn from_iter<I: IntoIterator<Item = VirtualKey>>(iter: I) -> Self {
        let mut keys: SmallVec<[VirtualKey; 8]> = iter.into_iter().collect();
        keys.sort();
        keys.dedup();
        Self { keys }
    }
}

/// Live set of currently pressed keys.
///
/// Only the hook delivery path mutates this; everything else sees
/// [`PressedKeys`] snapshots returned from [`InputTracker::apply`].
#[derive(Debug, Default)]
pub struct InputTracker {
    pressed: HashSet<VirtualKey>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one hook event and return the resulting snapshot.
    ///
    /// `Up` removes the key; `Down` and `Press` add it. Repeated downs for a
    /// held key are idempotent.
    pub fn apply(&mut self, stroke: Stroke) -> PressedKeys {
        if stroke.key.is_none() {
            return self.snapshot();
        }
        match stroke.action {
            KeyAction::Up => {
                self.pressed.remove(&stroke.key);
            }
            KeyAction::Down | KeyAction::Press => {
                self.pressed.insert(stroke.key);
            }
        }
        self.snapshot()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> PressedKeys {
        self.pressed.iter().copied().collect()
    }

    pub fn is_pressed(&self, key: VirtualKey) -> bool {
        self.pressed.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.pressed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }

    /// Forget every held key (used when hooks stop delivering events)
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}
