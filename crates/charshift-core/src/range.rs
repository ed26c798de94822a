// Charshift Remap Range
// The reserved band of virtual key codes that stand for a key pair

use std::fmt;

use crate::Key;

/// Errors that can occur when configuring a remap range
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("range start {start:#06X} is after range end {end:#06X}")]
    Inverted { start: u16, end: u16 },
}

/// An inclusive range of raw key values, `start..=end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemapRange {
    start: u16,
    end: u16,
}

impl RemapRange {
    /// 256 slots at the bottom of the reserved band
    pub const DEFAULT: RemapRange = RemapRange {
        start: 0xC000,
        end: 0xC0FF,
    };

    pub fn new(start: u16, end: u16) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Number of slots in the range
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// Check if a key falls inside the range
    #[inline]
    pub fn contains(&self, key: Key) -> bool {
        self.start <= key.raw() && key.raw() <= self.end
    }

    /// Slot offset of `key` from the start of the range.
    ///
    /// Only keys below the start yield `None`; the caller bounds the upper
    /// side against its table.
    #[inline]
    pub fn index_of(&self, key: Key) -> Option<usize> {
        key.raw().checked_sub(self.start).map(usize::from)
    }

    /// The virtual key for slot `index`
    pub fn key_at(&self, index: usize) -> Option<Key> {
        if index >= self.len() {
            return None;
        }
        Some(Key(self.start + index as u16))
    }
}

impl Default for RemapRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for RemapRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}..={:#06X}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_contains_bounds() {
        let range = RemapRange::new(0xC000, 0xC00F).unwrap();
        assert!(!range.contains(Key(0xBFFF)));
        assert!(range.contains(Key(0xC000)));
        assert!(range.contains(Key(0xC007)));
        assert!(range.contains(Key(0xC00F)));
        assert!(!range.contains(Key(0xC010)));
        assert!(!range.contains(Key::A));
    }

    #[test]
    fn test_range_contains_matches_definition() {
        let range = RemapRange::new(100, 200).unwrap();
        for raw in (0..=u16::MAX).step_by(7) {
            assert_eq!(range.contains(Key(raw)), (100..=200).contains(&raw));
        }
    }

    #[test]
    fn test_range_inverted() {
        assert_eq!(
            RemapRange::new(10, 9),
            Err(RangeError::Inverted { start: 10, end: 9 })
        );
    }

    #[test]
    fn test_range_single_slot() {
        let range = RemapRange::new(0xC000, 0xC000).unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range.key_at(0), Some(Key(0xC000)));
        assert_eq!(range.key_at(1), None);
    }

    #[test]
    fn test_range_index_of() {
        let range = RemapRange::DEFAULT;
        assert_eq!(range.index_of(Key(0xC000)), Some(0));
        assert_eq!(range.index_of(Key(0xC005)), Some(5));
        assert_eq!(range.index_of(Key::A), None);
        assert_eq!(range.len(), 256);
    }

    #[test]
    fn test_range_full_width() {
        let range = RemapRange::new(0, u16::MAX).unwrap();
        assert_eq!(range.len(), 65536);
        assert!(range.contains(Key(u16::MAX)));
    }
}
