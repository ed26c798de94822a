// Charshift Modifier System
// The eight HID keyboard modifiers and the modifier byte of a report

use std::fmt;

use strum::IntoEnumIterator;
use strum_macros::{EnumIter, IntoStaticStr};

use crate::key::flags;
use crate::Key;

/// One of the eight HID keyboard modifiers, in report bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr)]
#[repr(u8)]
pub enum Modifier {
    #[strum(serialize = "L_CONTROL")]
    LeftCtrl = 0,
    #[strum(serialize = "L_SHIFT")]
    LeftShift = 1,
    #[strum(serialize = "L_ALT")]
    LeftAlt = 2,
    #[strum(serialize = "L_GUI")]
    LeftGui = 3,
    #[strum(serialize = "R_CONTROL")]
    RightCtrl = 4,
    #[strum(serialize = "R_SHIFT")]
    RightShift = 5,
    #[strum(serialize = "R_ALT")]
    RightAlt = 6,
    #[strum(serialize = "R_GUI")]
    RightGui = 7,
}

/// Alias table for combo prefixes. Aliases are case-sensitive; generic
/// names resolve to the left-hand modifier.
const MODIFIER_ALIASES: &[(&str, Modifier)] = &[
    ("Ctrl", Modifier::LeftCtrl),
    ("C", Modifier::LeftCtrl),
    ("LCtrl", Modifier::LeftCtrl),
    ("LC", Modifier::LeftCtrl),
    ("RCtrl", Modifier::RightCtrl),
    ("RC", Modifier::RightCtrl),
    ("Shift", Modifier::LeftShift),
    ("S", Modifier::LeftShift),
    ("LShift", Modifier::LeftShift),
    ("RShift", Modifier::RightShift),
    ("Alt", Modifier::LeftAlt),
    ("A", Modifier::LeftAlt),
    ("LAlt", Modifier::LeftAlt),
    ("Opt", Modifier::LeftAlt),
    ("RAlt", Modifier::RightAlt),
    ("RA", Modifier::RightAlt),
    ("AltGr", Modifier::RightAlt),
    ("Gui", Modifier::LeftGui),
    ("G", Modifier::LeftGui),
    ("Super", Modifier::LeftGui),
    ("Win", Modifier::LeftGui),
    ("Cmd", Modifier::LeftGui),
    ("Meta", Modifier::LeftGui),
    ("RGui", Modifier::RightGui),
    ("RSuper", Modifier::RightGui),
    ("RCmd", Modifier::RightGui),
];

impl Modifier {
    /// The modifier key itself
    pub const fn key(self) -> Key {
        Key::keyboard(0xE0 + self as u8)
    }

    /// Bit in the report modifier byte
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Get the modifier for a keyboard modifier key
    pub fn from_key(key: Key) -> Option<Modifier> {
        if !key.is_keyboard_modifier() {
            return None;
        }
        Modifier::iter().find(|m| m.key().code() == key.code())
    }

    /// Look up a modifier by combo alias (e.g. `"S"`, `"Ctrl"`, `"RAlt"`)
    pub fn from_alias(alias: &str) -> Option<Modifier> {
        MODIFIER_ALIASES
            .iter()
            .find(|(a, _)| *a == alias)
            .map(|(_, m)| *m)
    }

    /// The key flag that makes a key imply this modifier, if any
    pub const fn held_flag(self) -> Option<u8> {
        match self {
            Modifier::LeftCtrl => Some(flags::CTRL_HELD),
            Modifier::LeftShift => Some(flags::SHIFT_HELD),
            Modifier::LeftAlt => Some(flags::LALT_HELD),
            Modifier::RightAlt => Some(flags::RALT_HELD),
            Modifier::LeftGui => Some(flags::GUI_HELD),
            Modifier::RightCtrl | Modifier::RightShift | Modifier::RightGui => None,
        }
    }

    /// Check if this is one of the two shift modifiers
    pub const fn is_shift(self) -> bool {
        matches!(self, Modifier::LeftShift | Modifier::RightShift)
    }

    /// Get the modifier name
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The modifier byte of a keyboard report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ModifierSet(u8);

impl ModifierSet {
    /// Create an empty set
    pub const fn new() -> Self {
        Self(0)
    }

    /// Create a set from a raw modifier byte
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Get the raw modifier byte
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    /// Remove a modifier; removing an absent modifier is a no-op
    pub fn remove(&mut self, modifier: Modifier) {
        self.0 &= !modifier.bit();
    }

    pub const fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check whether either shift is in the set
    pub const fn has_shift(self) -> bool {
        self.contains(Modifier::LeftShift) || self.contains(Modifier::RightShift)
    }

    /// Add the modifiers implied by a key's `*_HELD` flags
    pub fn insert_held_flags(&mut self, key_flags: u8) {
        for modifier in Modifier::iter() {
            if let Some(flag) = modifier.held_flag() {
                if key_flags & flag != 0 {
                    self.insert(modifier);
                }
            }
        }
    }

    /// Iterate over the modifiers in the set, in bit order
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut set = ModifierSet::new();
        for modifier in iter {
            set.insert(modifier);
        }
        set
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Modifier::name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_from_key() {
        assert_eq!(Modifier::from_key(Key::LEFT_SHIFT), Some(Modifier::LeftShift));
        assert_eq!(Modifier::from_key(Key::RIGHT_GUI), Some(Modifier::RightGui));
        assert_eq!(Modifier::from_key(Key::A), None);
    }

    #[test]
    fn test_modifier_key_roundtrip() {
        for modifier in Modifier::iter() {
            assert_eq!(Modifier::from_key(modifier.key()), Some(modifier));
        }
    }

    #[test]
    fn test_modifier_from_alias() {
        assert_eq!(Modifier::from_alias("S"), Some(Modifier::LeftShift));
        assert_eq!(Modifier::from_alias("RShift"), Some(Modifier::RightShift));
        assert_eq!(Modifier::from_alias("AltGr"), Some(Modifier::RightAlt));
        // Aliases are case-sensitive
        assert_eq!(Modifier::from_alias("shift"), None);
    }

    #[test]
    fn test_modifier_set_insert_remove() {
        let mut set = ModifierSet::new();
        set.insert(Modifier::LeftShift);
        set.insert(Modifier::RightCtrl);
        assert_eq!(set.bits(), 0b0001_0010);
        assert!(set.has_shift());

        set.remove(Modifier::LeftShift);
        set.remove(Modifier::LeftShift);
        assert!(!set.has_shift());
        assert!(set.contains(Modifier::RightCtrl));
    }

    #[test]
    fn test_modifier_set_held_flags() {
        let mut set = ModifierSet::new();
        set.insert_held_flags(flags::SHIFT_HELD | flags::RALT_HELD);
        let collected: Vec<Modifier> = set.iter().collect();
        assert_eq!(collected, vec![Modifier::LeftShift, Modifier::RightAlt]);
    }

    #[test]
    fn test_modifier_set_display() {
        let set: ModifierSet = [Modifier::LeftCtrl, Modifier::RightShift]
            .into_iter()
            .collect();
        assert_eq!(set.to_string(), "[L_CONTROL, R_SHIFT]");
    }
}
