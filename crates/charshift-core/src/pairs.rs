// Charshift Key Pairs
// The shift-dependent output pairs and the storage they are read from

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::Key;

/// The two possible outputs of one virtual slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPair {
    /// Sent when no shift is held
    pub lower: Key,
    /// Sent while a shift is held
    pub upper: Key,
}

impl KeyPair {
    /// Pair returned for slots that have no entry
    pub const NO_KEY: KeyPair = KeyPair {
        lower: Key::NO_KEY,
        upper: Key::NO_KEY,
    };

    pub const fn new(lower: Key, upper: Key) -> Self {
        Self { lower, upper }
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.lower, self.upper)
    }
}

/// Read access to a key-pair table.
///
/// Both operations must be O(1) and must not change during a cycle.
pub trait KeyPairSource {
    /// Number of configured pairs
    fn count(&self) -> usize;

    /// Pair at `index`, or `None` past the end
    fn read_at(&self, index: usize) -> Option<KeyPair>;

    /// Most pairs the source can ever hold.
    ///
    /// Fixed tables never grow, so this defaults to `count`.
    fn capacity(&self) -> usize {
        self.count()
    }
}

impl KeyPairSource for [KeyPair] {
    fn count(&self) -> usize {
        self.len()
    }

    fn read_at(&self, index: usize) -> Option<KeyPair> {
        self.get(index).copied()
    }
}

impl<const N: usize> KeyPairSource for [KeyPair; N] {
    fn count(&self) -> usize {
        N
    }

    fn read_at(&self, index: usize) -> Option<KeyPair> {
        self.get(index).copied()
    }
}

impl KeyPairSource for Vec<KeyPair> {
    fn count(&self) -> usize {
        self.len()
    }

    fn read_at(&self, index: usize) -> Option<KeyPair> {
        self.get(index).copied()
    }
}

impl<T: KeyPairSource + ?Sized> KeyPairSource for &T {
    fn count(&self) -> usize {
        (**self).count()
    }

    fn read_at(&self, index: usize) -> Option<KeyPair> {
        (**self).read_at(index)
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }
}

impl<T: KeyPairSource + ?Sized> KeyPairSource for Arc<T> {
    fn count(&self) -> usize {
        (**self).count()
    }

    fn read_at(&self, index: usize) -> Option<KeyPair> {
        (**self).read_at(index)
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }
}

/// Errors from mutating a [`KeyPairStore`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("pair index {index} out of range (store holds {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("store capacity of {capacity} pairs exceeded")]
    CapacityExceeded { capacity: usize },
}

/// A key-pair table that can be edited at runtime.
///
/// Reads take a shared lock, so edits from another thread are safe, but
/// the host should only apply them between cycles: the engine assumes a
/// stable table while a cycle is in flight.
#[derive(Debug)]
pub struct KeyPairStore {
    pairs: RwLock<Vec<KeyPair>>,
    capacity: usize,
}

impl KeyPairStore {
    /// Create an empty store holding at most `capacity` pairs
    pub fn new(capacity: usize) -> Self {
        Self {
            pairs: RwLock::new(Vec::new()),
            capacity,
        }
    }

    /// Create a store pre-filled with `pairs`
    pub fn with_pairs(capacity: usize, pairs: Vec<KeyPair>) -> Result<Self, StoreError> {
        if pairs.len() > capacity {
            return Err(StoreError::CapacityExceeded { capacity });
        }
        Ok(Self {
            pairs: RwLock::new(pairs),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Overwrite the pair at an existing index
    pub fn set(&self, index: usize, pair: KeyPair) -> Result<(), StoreError> {
        let mut pairs = self.pairs.write();
        let count = pairs.len();
        let slot = pairs
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, count })?;
        *slot = pair;
        Ok(())
    }

    /// Append a pair, returning its index
    pub fn push(&self, pair: KeyPair) -> Result<usize, StoreError> {
        let mut pairs = self.pairs.write();
        if pairs.len() >= self.capacity {
            return Err(StoreError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        pairs.push(pair);
        Ok(pairs.len() - 1)
    }

    /// Replace the whole table at once
    pub fn replace_all(&self, new_pairs: Vec<KeyPair>) -> Result<(), StoreError> {
        if new_pairs.len() > self.capacity {
            return Err(StoreError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        *self.pairs.write() = new_pairs;
        Ok(())
    }

    /// Copy out the current table
    pub fn snapshot(&self) -> Vec<KeyPair> {
        self.pairs.read().clone()
    }
}

impl KeyPairSource for KeyPairStore {
    fn count(&self) -> usize {
        self.pairs.read().len()
    }

    fn read_at(&self, index: usize) -> Option<KeyPair> {
        self.pairs.read().get(index).copied()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
