// Charshift Live Keys
// Currently held keys, as seen by handlers when an event is resolved

use indexmap::IndexMap;
use smallvec::{Array, SmallVec};

use crate::event::KeyAddr;
use crate::Key;

/// Read access to the set of currently held keys.
///
/// The engine only ever asks whether any held key acts as shift.
pub trait ModifierState {
    /// Iterate over every held key
    fn held_keys(&self) -> impl Iterator<Item = Key> + '_;

    /// Check whether any held key is a shift modifier
    fn shift_held(&self) -> bool {
        self.held_keys().any(Key::is_keyboard_shift)
    }
}

impl ModifierState for [Key] {
    fn held_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.iter().copied()
    }
}

impl ModifierState for Vec<Key> {
    fn held_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.iter().copied()
    }
}

impl<A: Array<Item = Key>> ModifierState for SmallVec<A> {
    fn held_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.iter().copied()
    }
}

impl<T: ModifierState + ?Sized> ModifierState for &T {
    fn held_keys(&self) -> impl Iterator<Item = Key> + '_ {
        (**self).held_keys()
    }
}

/// Keys held on each switch, plus held keys that have no switch
///
/// Iteration follows press order, so reports assembled from the live keys
/// list keys in the order they went down.
#[derive(Debug, Clone, Default)]
pub struct LiveKeys {
    /// Map from switch address to the (already resolved) key it holds
    by_addr: IndexMap<KeyAddr, Key>,
    /// Held keys injected without an address
    injected: SmallVec<[Key; 4]>,
}

impl LiveKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key currently held on a switch
    pub fn get(&self, addr: KeyAddr) -> Option<Key> {
        self.by_addr.get(&addr).copied()
    }

    /// Record the key held on a switch, replacing any earlier value
    pub fn activate(&mut self, addr: KeyAddr, key: Key) {
        // Re-insert so iteration order tracks the latest press
        self.by_addr.shift_remove(&addr);
        self.by_addr.insert(addr, key);
    }

    /// Clear a switch, returning the key it held
    pub fn clear(&mut self, addr: KeyAddr) -> Option<Key> {
        self.by_addr.shift_remove(&addr)
    }

    /// Hold a key that has no switch address
    pub fn activate_injected(&mut self, key: Key) {
        if !self.injected.contains(&key) {
            self.injected.push(key);
        }
    }

    /// Release a key that has no switch address
    pub fn clear_injected(&mut self, key: Key) {
        self.injected.retain(|held| *held != key);
    }

    /// All held keys: addressed keys first, then injected ones
    pub fn all(&self) -> impl Iterator<Item = Key> + '_ {
        self.by_addr
            .values()
            .copied()
            .chain(self.injected.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.by_addr.len() + self.injected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_addr.is_empty() && self.injected.is_empty()
    }

    /// Release everything
    pub fn reset(&mut self) {
        self.by_addr.clear();
        self.injected.clear();
    }
}

impl ModifierState for LiveKeys {
    fn held_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.all()
    }
}
