// Charshift Key Events
// A single key transition as it travels through the event pipeline

use std::fmt;

use crate::{Action, Key};

/// Physical key switch index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyAddr(pub u8);

impl fmt::Display for KeyAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A key transition.
///
/// Handlers may rewrite `key` in place before dispatch continues. Events
/// without an address were injected by firmware rather than read from the
/// switch matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub addr: Option<KeyAddr>,
    pub key: Key,
    pub action: Action,
}

impl KeyEvent {
    pub fn new(addr: Option<KeyAddr>, key: Key, action: Action) -> Self {
        Self { addr, key, action }
    }

    /// A toggle-on event from a physical switch
    pub fn press(addr: KeyAddr, key: Key) -> Self {
        Self::new(Some(addr), key, Action::Press)
    }

    /// A toggle-off event from a physical switch
    pub fn release(addr: KeyAddr, key: Key) -> Self {
        Self::new(Some(addr), key, Action::Release)
    }

    /// An injected event with no switch address
    pub fn injected(key: Key, action: Action) -> Self {
        Self::new(None, key, action)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.addr {
            Some(addr) => write!(f, "{} {} {}", addr, self.key, self.action),
            None => write!(f, "injected {} {}", self.key, self.action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_constructors() {
        let press = KeyEvent::press(KeyAddr(3), Key::A);
        assert_eq!(press.addr, Some(KeyAddr(3)));
        assert!(press.action.toggled_on());

        let release = KeyEvent::release(KeyAddr(3), Key::A);
        assert!(release.action.toggled_off());

        let injected = KeyEvent::injected(Key::B, Action::Press);
        assert_eq!(injected.addr, None);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(KeyEvent::press(KeyAddr(3), Key::A).to_string(), "#3 A press");
        assert_eq!(
            KeyEvent::injected(Key::B, Action::Release).to_string(),
            "injected B release"
        );
    }
}
