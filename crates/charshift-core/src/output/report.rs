// Charshift Keyboard Report
// The outgoing boot-protocol keyboard report, assembled once per cycle

use smallvec::SmallVec;

use crate::modifier::{Modifier, ModifierSet};
use crate::Key;

/// Number of non-modifier key slots in a boot-protocol report
pub const REPORT_KEY_SLOTS: usize = 6;

/// A keyboard HID report under assembly.
///
/// Tracks pressed codes with set semantics: pressing twice or releasing
/// an absent key leaves the report unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardReport {
    modifiers: ModifierSet,
    keys: SmallVec<[u8; REPORT_KEY_SLOTS]>,
}

impl KeyboardReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key to the report.
    ///
    /// Only keyboard keys are reported. Modifier keys set their modifier
    /// bit, other keys take a key slot, and `*_HELD` flags add the
    /// modifiers they imply.
    pub fn press_key(&mut self, key: Key) {
        if !key.is_keyboard_key() {
            return;
        }
        self.modifiers.insert_held_flags(key.flags());

        if let Some(modifier) = Modifier::from_key(key) {
            self.modifiers.insert(modifier);
            return;
        }

        let code = key.code();
        if code == Key::NO_KEY.code() || self.keys.contains(&code) {
            return;
        }
        if self.keys.len() >= REPORT_KEY_SLOTS {
            log::trace!("report full, dropping {}", key);
            return;
        }
        self.keys.push(code);
    }

    /// Remove a key from the report. Flags on `key` are ignored.
    pub fn release_key(&mut self, key: Key) {
        if let Some(modifier) = Modifier::from_key(key) {
            self.modifiers.remove(modifier);
            return;
        }
        let code = key.code();
        self.keys.retain(|held| *held != code);
    }

    /// Check if a key code is present (avoids flag comparisons)
    pub fn is_key_pressed(&self, key: Key) -> bool {
        match Modifier::from_key(key) {
            Some(modifier) => self.modifiers.contains(modifier),
            None => self.keys.contains(&key.code()),
        }
    }

    /// Get the modifier byte
    pub fn modifiers(&self) -> ModifierSet {
        self.modifiers
    }

    /// Get the pressed non-modifier codes, in press order
    pub fn keys(&self) -> &[u8] {
        &self.keys
    }

    /// Clear the report
    pub fn clear(&mut self) {
        self.modifiers = ModifierSet::new();
        self.keys.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty() && self.keys.is_empty()
    }

    /// Boot-protocol wire layout: modifiers, reserved byte, six key slots
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut bytes = [0u8; 8];
        bytes[0] = self.modifiers.bits();
        for (slot, code) in bytes[2..].iter_mut().zip(self.keys.iter()) {
            *slot = *code;
        }
        bytes
    }
}
