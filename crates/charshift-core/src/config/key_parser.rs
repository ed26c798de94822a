// Charshift Config - Key String Parser
// Parses key strings like "S-1", "EXCLAMATION", "!" or "0xC003" into keys

use crate::key::{ascii_to_key, key_from_name};
use crate::{Key, Modifier};

/// Errors that can occur during key string parsing
#[derive(Debug, Clone, PartialEq)]
pub enum KeyParseError {
    /// Empty input string
    EmptyInput,
    /// Key name not recognized
    UnknownKey(String),
    /// Modifier alias not recognized
    UnknownModifier(String),
    /// Modifier has no key flag (right ctrl, right shift, right gui)
    UnsupportedModifier(String),
    /// Input ends with hyphen (e.g., "S-")
    TrailingHyphen,
    /// Malformed raw value (e.g., "0xZZ")
    InvalidRaw(String),
}

impl std::fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyParseError::EmptyInput => write!(f, "key string cannot be empty"),
            KeyParseError::UnknownKey(name) => write!(f, "unknown key name: '{}'", name),
            KeyParseError::UnknownModifier(name) => write!(f, "unknown modifier: '{}'", name),
            KeyParseError::UnsupportedModifier(name) => {
                write!(f, "modifier '{}' cannot be attached to a key", name)
            }
            KeyParseError::TrailingHyphen => write!(f, "key string cannot end with hyphen"),
            KeyParseError::InvalidRaw(raw) => write!(f, "invalid raw key value: '{}'", raw),
        }
    }
}

impl std::error::Error for KeyParseError {}

/// Parse a key string into a key
///
/// Accepts, in order of precedence:
/// * a single printable character (`"!"`, `"a"`, `"-"`)
/// * a raw hex value (`"0xC003"`), used for virtual keys
/// * a key name (`"ENTER"`, `"KEY_1"`, `"EXCLAMATION"`)
/// * combo prefixes on any of the above (`"S-1"`, `"C-A-DELETE"`)
///
/// # Examples
/// ```
/// use charshift_core::config::parse_key_string;
/// use charshift_core::Key;
/// let key = parse_key_string("S-1").unwrap();
/// assert_eq!(key.code(), Key::KEY_1.code());
/// assert!(key.is_inherently_shifted());
/// ```
pub fn parse_key_string(exp: &str) -> Result<Key, KeyParseError> {
    let trimmed = exp.trim();
    if trimmed.is_empty() {
        return Err(KeyParseError::EmptyInput);
    }

    if let Some(key) = parse_single(trimmed)? {
        return Ok(key);
    }

    if trimmed.ends_with('-') {
        return Err(KeyParseError::TrailingHyphen);
    }

    // The last part is always the key
    let (prefixes, key_str) = match trimmed.rsplit_once('-') {
        Some((prefixes, key_str)) => (Some(prefixes), key_str),
        None => (None, trimmed),
    };
    let mut key =
        parse_single(key_str)?.ok_or_else(|| KeyParseError::UnknownKey(key_str.to_string()))?;

    // Everything before the key is a modifier alias
    for alias in prefixes.into_iter().flat_map(|p| p.split('-')) {
        let modifier = Modifier::from_alias(alias)
            .ok_or_else(|| KeyParseError::UnknownModifier(alias.to_string()))?;
        let flag = modifier
            .held_flag()
            .ok_or_else(|| KeyParseError::UnsupportedModifier(alias.to_string()))?;
        key = key.with_flags(flag);
    }

    Ok(key)
}

/// Parse a string with no combo prefixes
fn parse_single(s: &str) -> Result<Option<Key>, KeyParseError> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(ascii_to_key(c));
    }

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u16::from_str_radix(hex, 16)
            .map(|raw| Some(Key(raw)))
            .map_err(|_| KeyParseError::InvalidRaw(s.to_string()));
    }

    Ok(key_from_name(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{flags, lshift};

    #[test]
    fn test_parse_single_char() {
        assert_eq!(parse_key_string("a"), Ok(Key::A));
        assert_eq!(parse_key_string("A"), Ok(Key::A));
        assert_eq!(parse_key_string("1"), Ok(Key::KEY_1));
        assert_eq!(parse_key_string("!"), Ok(lshift(Key::KEY_1)));
        assert_eq!(parse_key_string("-"), Ok(Key::MINUS));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(parse_key_string("ENTER"), Ok(Key::ENTER));
        assert_eq!(parse_key_string("key_1"), Ok(Key::KEY_1));
        assert_eq!(parse_key_string("EXCLAMATION"), Ok(lshift(Key::KEY_1)));
        assert_eq!(parse_key_string("NO_KEY"), Ok(Key::NO_KEY));
    }

    #[test]
    fn test_parse_with_modifier_prefix() {
        assert_eq!(parse_key_string("S-1"), Ok(lshift(Key::KEY_1)));
        assert_eq!(parse_key_string("Shift-SEMICOLON"), Ok(lshift(Key::SEMICOLON)));
        assert_eq!(
            parse_key_string("C-A-DELETE"),
            Ok(Key::keyboard(0x4C).with_flags(flags::CTRL_HELD | flags::LALT_HELD))
        );
        assert_eq!(
            parse_key_string("RA-e"),
            Ok(Key::E.with_flags(flags::RALT_HELD))
        );
    }

    #[test]
    fn test_parse_raw() {
        assert_eq!(parse_key_string("0xC003"), Ok(Key(0xC003)));
        assert_eq!(parse_key_string("0x04"), Ok(Key::A));
        assert!(matches!(
            parse_key_string("0xZZ"),
            Err(KeyParseError::InvalidRaw(_))
        ));
    }

    #[test]
    fn test_parse_with_whitespace() {
        assert_eq!(parse_key_string("  S-a  "), Ok(lshift(Key::A)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_key_string(""), Err(KeyParseError::EmptyInput));
        assert_eq!(parse_key_string("   "), Err(KeyParseError::EmptyInput));
        assert_eq!(parse_key_string("S-"), Err(KeyParseError::TrailingHyphen));
        assert!(matches!(
            parse_key_string("NotARealKey"),
            Err(KeyParseError::UnknownKey(_))
        ));
        assert!(matches!(
            parse_key_string("Hyper-a"),
            Err(KeyParseError::UnknownModifier(_))
        ));
        assert!(matches!(
            parse_key_string("RShift-a"),
            Err(KeyParseError::UnsupportedModifier(_))
        ));
    }

    #[test]
    fn test_from_str() {
        let key: Key = "S-SLASH".parse().unwrap();
        assert_eq!(key, lshift(Key::SLASH));
    }
}
