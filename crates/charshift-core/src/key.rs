// Charshift Key Type
// A 16-bit key value: a flag byte on top of a HID keyboard usage byte

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{parse_key_string, KeyParseError};

/// Key flag bits (the high byte of a [`Key`])
pub mod flags {
    /// Key is sent together with left control
    pub const CTRL_HELD: u8 = 0b0000_0001;
    /// Key is sent together with left shift (inherently shifted)
    pub const SHIFT_HELD: u8 = 0b0000_0010;
    /// Key is sent together with left alt
    pub const LALT_HELD: u8 = 0b0000_0100;
    /// Key is sent together with right alt (AltGr)
    pub const RALT_HELD: u8 = 0b0000_1000;
    /// Key is sent together with left gui
    pub const GUI_HELD: u8 = 0b0001_0000;
    /// Not a keyboard key: consumer, system or other synthetic action
    pub const SYNTHETIC: u8 = 0b0100_0000;
    /// Reserved band used for plugin and virtual codes
    pub const RESERVED: u8 = 0b1000_0000;

    /// All "sent together with a modifier" bits
    pub const MODIFIER_HELD: u8 = CTRL_HELD | SHIFT_HELD | LALT_HELD | RALT_HELD | GUI_HELD;
}

/// Represents a single key value.
///
/// The low byte is the key code (a HID keyboard usage for keyboard keys),
/// the high byte holds [`flags`]. Keys order by their raw value, which is
/// what range classification relies on.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Key(pub u16);

impl Key {
    /// The no-op key: occupies a slot but sends nothing
    pub const NO_KEY: Key = Key(0);

    pub const A: Key = Key::keyboard(0x04);
    pub const B: Key = Key::keyboard(0x05);
    pub const C: Key = Key::keyboard(0x06);
    pub const D: Key = Key::keyboard(0x07);
    pub const E: Key = Key::keyboard(0x08);
    pub const F: Key = Key::keyboard(0x09);
    pub const G: Key = Key::keyboard(0x0A);
    pub const H: Key = Key::keyboard(0x0B);
    pub const I: Key = Key::keyboard(0x0C);
    pub const J: Key = Key::keyboard(0x0D);
    pub const K: Key = Key::keyboard(0x0E);
    pub const L: Key = Key::keyboard(0x0F);
    pub const M: Key = Key::keyboard(0x10);
    pub const N: Key = Key::keyboard(0x11);
    pub const O: Key = Key::keyboard(0x12);
    pub const P: Key = Key::keyboard(0x13);
    pub const Q: Key = Key::keyboard(0x14);
    pub const R: Key = Key::keyboard(0x15);
    pub const S: Key = Key::keyboard(0x16);
    pub const T: Key = Key::keyboard(0x17);
    pub const U: Key = Key::keyboard(0x18);
    pub const V: Key = Key::keyboard(0x19);
    pub const W: Key = Key::keyboard(0x1A);
    pub const X: Key = Key::keyboard(0x1B);
    pub const Y: Key = Key::keyboard(0x1C);
    pub const Z: Key = Key::keyboard(0x1D);

    pub const KEY_1: Key = Key::keyboard(0x1E);
    pub const KEY_2: Key = Key::keyboard(0x1F);
    pub const KEY_3: Key = Key::keyboard(0x20);
    pub const KEY_4: Key = Key::keyboard(0x21);
    pub const KEY_5: Key = Key::keyboard(0x22);
    pub const KEY_6: Key = Key::keyboard(0x23);
    pub const KEY_7: Key = Key::keyboard(0x24);
    pub const KEY_8: Key = Key::keyboard(0x25);
    pub const KEY_9: Key = Key::keyboard(0x26);
    pub const KEY_0: Key = Key::keyboard(0x27);

    pub const ENTER: Key = Key::keyboard(0x28);
    pub const ESCAPE: Key = Key::keyboard(0x29);
    pub const BACKSPACE: Key = Key::keyboard(0x2A);
    pub const TAB: Key = Key::keyboard(0x2B);
    pub const SPACE: Key = Key::keyboard(0x2C);
    pub const MINUS: Key = Key::keyboard(0x2D);
    pub const EQUAL: Key = Key::keyboard(0x2E);
    pub const LEFT_BRACE: Key = Key::keyboard(0x2F);
    pub const RIGHT_BRACE: Key = Key::keyboard(0x30);
    pub const BACKSLASH: Key = Key::keyboard(0x31);
    pub const SEMICOLON: Key = Key::keyboard(0x33);
    pub const APOSTROPHE: Key = Key::keyboard(0x34);
    pub const GRAVE: Key = Key::keyboard(0x35);
    pub const COMMA: Key = Key::keyboard(0x36);
    pub const DOT: Key = Key::keyboard(0x37);
    pub const SLASH: Key = Key::keyboard(0x38);
    pub const CAPSLOCK: Key = Key::keyboard(0x39);

    pub const LEFT_CTRL: Key = Key::keyboard(0xE0);
    pub const LEFT_SHIFT: Key = Key::keyboard(0xE1);
    pub const LEFT_ALT: Key = Key::keyboard(0xE2);
    pub const LEFT_GUI: Key = Key::keyboard(0xE3);
    pub const RIGHT_CTRL: Key = Key::keyboard(0xE4);
    pub const RIGHT_SHIFT: Key = Key::keyboard(0xE5);
    pub const RIGHT_ALT: Key = Key::keyboard(0xE6);
    pub const RIGHT_GUI: Key = Key::keyboard(0xE7);

    /// Build a key from a code byte and a flag byte
    pub const fn new(code: u8, flags: u8) -> Self {
        Key(((flags as u16) << 8) | code as u16)
    }

    /// Build a plain keyboard key (no flags)
    pub const fn keyboard(code: u8) -> Self {
        Key(code as u16)
    }

    /// Get the raw 16-bit value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Get the key code byte
    pub const fn code(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// Get the flag byte
    pub const fn flags(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Return a copy of this key with `extra` flags added
    pub const fn with_flags(self, extra: u8) -> Self {
        Key::new(self.code(), self.flags() | extra)
    }

    /// Check whether all bits of `flag` are set
    pub const fn has_flag(self, flag: u8) -> bool {
        self.flags() & flag == flag
    }

    /// True for keys that end up in the keyboard HID report
    pub const fn is_keyboard_key(self) -> bool {
        self.flags() & (flags::SYNTHETIC | flags::RESERVED) == 0
    }

    /// True for keyboard keys whose code is one of the eight HID modifiers
    pub const fn is_keyboard_modifier(self) -> bool {
        self.is_keyboard_key() && self.code() >= 0xE0 && self.code() <= 0xE7
    }

    /// True for a modifier key that acts as shift.
    ///
    /// That is left or right shift, or any other modifier carrying the
    /// shift flag (e.g. a "Ctrl+Shift" modifier key).
    pub const fn is_keyboard_shift(self) -> bool {
        self.is_keyboard_modifier()
            && (self.code() == Key::LEFT_SHIFT.code()
                || self.code() == Key::RIGHT_SHIFT.code()
                || self.has_flag(flags::SHIFT_HELD))
    }

    /// True if the host already sees this key as shifted when it is sent
    pub const fn is_inherently_shifted(self) -> bool {
        self.has_flag(flags::SHIFT_HELD)
    }

    /// Get the name of the key code, ignoring flags
    pub fn name(self) -> &'static str {
        if self.is_keyboard_key() {
            usage_name(self.code())
        } else {
            "UNKNOWN"
        }
    }
}

/// The inherently shifted variant of a keyboard key
pub const fn lshift(key: Key) -> Key {
    key.with_flags(flags::SHIFT_HELD)
}

impl From<u16> for Key {
    fn from(raw: u16) -> Self {
        Key(raw)
    }
}

impl From<Key> for u16 {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_keyboard_key() || usage_name(self.code()) == "UNKNOWN" && self.0 != 0 {
            return write!(f, "{:#06X}", self.0);
        }
        for (flag, prefix) in FLAG_PREFIXES {
            if self.has_flag(*flag) {
                write!(f, "{}-", prefix)?;
            }
        }
        write!(f, "{}", usage_name(self.code()))
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_string(s)
    }
}

/// Combo-style prefixes used when displaying flagged keys
pub(crate) const FLAG_PREFIXES: &[(u8, &str)] = &[
    (flags::CTRL_HELD, "C"),
    (flags::LALT_HELD, "A"),
    (flags::RALT_HELD, "RA"),
    (flags::GUI_HELD, "G"),
    (flags::SHIFT_HELD, "S"),
];

/// HID keyboard usage names. The first entry for a code is its canonical
/// name; later entries are accepted aliases.
const USAGE_NAMES: &[(&str, u8)] = &[
    ("NO_KEY", 0x00),
    ("XXX", 0x00),
    ("A", 0x04),
    ("B", 0x05),
    ("C", 0x06),
    ("D", 0x07),
    ("E", 0x08),
    ("F", 0x09),
    ("G", 0x0A),
    ("H", 0x0B),
    ("I", 0x0C),
    ("J", 0x0D),
    ("K", 0x0E),
    ("L", 0x0F),
    ("M", 0x10),
    ("N", 0x11),
    ("O", 0x12),
    ("P", 0x13),
    ("Q", 0x14),
    ("R", 0x15),
    ("S", 0x16),
    ("T", 0x17),
    ("U", 0x18),
    ("V", 0x19),
    ("W", 0x1A),
    ("X", 0x1B),
    ("Y", 0x1C),
    ("Z", 0x1D),
    ("KEY_1", 0x1E),
    ("1", 0x1E),
    ("KEY_2", 0x1F),
    ("2", 0x1F),
    ("KEY_3", 0x20),
    ("3", 0x20),
    ("KEY_4", 0x21),
    ("4", 0x21),
    ("KEY_5", 0x22),
    ("5", 0x22),
    ("KEY_6", 0x23),
    ("6", 0x23),
    ("KEY_7", 0x24),
    ("7", 0x24),
    ("KEY_8", 0x25),
    ("8", 0x25),
    ("KEY_9", 0x26),
    ("9", 0x26),
    ("KEY_0", 0x27),
    ("0", 0x27),
    ("ENTER", 0x28),
    ("ESCAPE", 0x29),
    ("ESC", 0x29),
    ("BACKSPACE", 0x2A),
    ("TAB", 0x2B),
    ("SPACE", 0x2C),
    ("MINUS", 0x2D),
    ("EQUAL", 0x2E),
    ("LEFT_BRACE", 0x2F),
    ("LEFT_BRACKET", 0x2F),
    ("RIGHT_BRACE", 0x30),
    ("RIGHT_BRACKET", 0x30),
    ("BACKSLASH", 0x31),
    ("NON_US_POUND", 0x32),
    ("SEMICOLON", 0x33),
    ("APOSTROPHE", 0x34),
    ("QUOTE", 0x34),
    ("GRAVE", 0x35),
    ("BACKTICK", 0x35),
    ("COMMA", 0x36),
    ("DOT", 0x37),
    ("PERIOD", 0x37),
    ("SLASH", 0x38),
    ("CAPSLOCK", 0x39),
    ("F1", 0x3A),
    ("F2", 0x3B),
    ("F3", 0x3C),
    ("F4", 0x3D),
    ("F5", 0x3E),
    ("F6", 0x3F),
    ("F7", 0x40),
    ("F8", 0x41),
    ("F9", 0x42),
    ("F10", 0x43),
    ("F11", 0x44),
    ("F12", 0x45),
    ("PRINT", 0x46),
    ("PRTSCR", 0x46),
    ("SCROLLLOCK", 0x47),
    ("PAUSE", 0x48),
    ("INSERT", 0x49),
    ("HOME", 0x4A),
    ("PAGE_UP", 0x4B),
    ("DELETE", 0x4C),
    ("END", 0x4D),
    ("PAGE_DOWN", 0x4E),
    ("RIGHT", 0x4F),
    ("LEFT", 0x50),
    ("DOWN", 0x51),
    ("UP", 0x52),
    ("NUMLOCK", 0x53),
    ("NON_US_BACKSLASH", 0x64),
    ("MENU", 0x65),
    ("LEFT_CTRL", 0xE0),
    ("LEFT_SHIFT", 0xE1),
    ("LEFT_ALT", 0xE2),
    ("LEFT_GUI", 0xE3),
    ("LEFT_META", 0xE3),
    ("RIGHT_CTRL", 0xE4),
    ("RIGHT_SHIFT", 0xE5),
    ("RIGHT_ALT", 0xE6),
    ("RIGHT_GUI", 0xE7),
    ("RIGHT_META", 0xE7),
];

/// Names for punctuation that is typed with shift on a US layout
const SHIFTED_NAMES: &[(&str, Key)] = &[
    ("EXCLAMATION", lshift(Key::KEY_1)),
    ("AT", lshift(Key::KEY_2)),
    ("POUND", lshift(Key::KEY_3)),
    ("HASH", lshift(Key::KEY_3)),
    ("DOLLAR", lshift(Key::KEY_4)),
    ("PERCENT", lshift(Key::KEY_5)),
    ("CARET", lshift(Key::KEY_6)),
    ("AMPERSAND", lshift(Key::KEY_7)),
    ("ASTERISK", lshift(Key::KEY_8)),
    ("LEFT_PAREN", lshift(Key::KEY_9)),
    ("RIGHT_PAREN", lshift(Key::KEY_0)),
    ("UNDERSCORE", lshift(Key::MINUS)),
    ("PLUS", lshift(Key::EQUAL)),
    ("LEFT_CURLY", lshift(Key::LEFT_BRACE)),
    ("RIGHT_CURLY", lshift(Key::RIGHT_BRACE)),
    ("PIPE", lshift(Key::BACKSLASH)),
    ("COLON", lshift(Key::SEMICOLON)),
    ("DOUBLE_QUOTE", lshift(Key::APOSTROPHE)),
    ("DBLQUOTE", lshift(Key::APOSTROPHE)),
    ("TILDE", lshift(Key::GRAVE)),
    ("LESS_THAN", lshift(Key::COMMA)),
    ("GREATER_THAN", lshift(Key::DOT)),
    ("QUESTION", lshift(Key::SLASH)),
];

/// Display name for a HID keyboard usage code
pub fn usage_name(code: u8) -> &'static str {
    USAGE_NAMES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
        .unwrap_or("UNKNOWN")
}

/// Try to parse a key name (case-insensitive) to a key.
///
/// Shifted punctuation names such as `EXCLAMATION` resolve to the
/// inherently shifted key.
pub fn key_from_name(name: &str) -> Option<Key> {
    let name_upper = name.to_uppercase();
    USAGE_NAMES
        .iter()
        .find(|(n, _)| *n == name_upper)
        .map(|(_, code)| Key::keyboard(*code))
        .or_else(|| {
            SHIFTED_NAMES
                .iter()
                .find(|(n, _)| *n == name_upper)
                .map(|(_, key)| *key)
        })
}

/// ASCII character to key mapping (US layout).
///
/// Letters map to their plain usage in either case; shifted punctuation
/// carries the shift flag.
pub fn ascii_to_key(c: char) -> Option<Key> {
    let key = match c {
        'a'..='z' | 'A'..='Z' => {
            let offset = c.to_ascii_lowercase() as u8 - b'a';
            Key::keyboard(Key::A.code() + offset)
        }
        '1'..='9' => Key::keyboard(Key::KEY_1.code() + (c as u8 - b'1')),
        '0' => Key::KEY_0,
        ' ' => Key::SPACE,
        '-' => Key::MINUS,
        '=' => Key::EQUAL,
        '[' => Key::LEFT_BRACE,
        ']' => Key::RIGHT_BRACE,
        '\\' => Key::BACKSLASH,
        ';' => Key::SEMICOLON,
        '\'' => Key::APOSTROPHE,
        '`' => Key::GRAVE,
        ',' => Key::COMMA,
        '.' => Key::DOT,
        '/' => Key::SLASH,
        '!' => lshift(Key::KEY_1),
        '@' => lshift(Key::KEY_2),
        '#' => lshift(Key::KEY_3),
        '$' => lshift(Key::KEY_4),
        '%' => lshift(Key::KEY_5),
        '^' => lshift(Key::KEY_6),
        '&' => lshift(Key::KEY_7),
        '*' => lshift(Key::KEY_8),
        '(' => lshift(Key::KEY_9),
        ')' => lshift(Key::KEY_0),
        '_' => lshift(Key::MINUS),
        '+' => lshift(Key::EQUAL),
        '{' => lshift(Key::LEFT_BRACE),
        '}' => lshift(Key::RIGHT_BRACE),
        '|' => lshift(Key::BACKSLASH),
        ':' => lshift(Key::SEMICOLON),
        '"' => lshift(Key::APOSTROPHE),
        '~' => lshift(Key::GRAVE),
        '<' => lshift(Key::COMMA),
        '>' => lshift(Key::DOT),
        '?' => lshift(Key::SLASH),
        _ => return None,
    };
    Some(key)
}
