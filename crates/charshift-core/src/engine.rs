// Charshift Engine
// Shift-dependent key pairs for a reserved range of virtual keys
//
// A virtual key resolves to the lower half of its pair, or to the upper half
// while a shift is held. When the upper half is a plain key (one the host
// would not see as shifted on its own) the physical shift has to be kept out
// of the outgoing report. Resolution and report assembly happen at different
// points of the cycle, so the decision is carried from one to the other as a
// SuppressionFlag value owned by the caller.

use strum_macros::Display;

use crate::event::KeyEvent;
use crate::output::KeyboardReport;
use crate::pairs::{KeyPair, KeyPairSource};
use crate::range::RemapRange;
use crate::state::ModifierState;
use crate::Key;

/// Whether shift must be removed from the report being assembled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SuppressionFlag {
    #[default]
    Clear,
    Suppress,
}

impl SuppressionFlag {
    pub fn is_suppress(self) -> bool {
        self == SuppressionFlag::Suppress
    }
}

/// Errors that can occur when building an engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("table holds {count} pairs but range {range} only has {slots} slots")]
    TableTooLarge {
        count: usize,
        slots: usize,
        range: RemapRange,
    },

    #[error("table can grow to {capacity} pairs but range {range} only has {slots} slots")]
    CapacityTooLarge {
        capacity: usize,
        slots: usize,
        range: RemapRange,
    },
}

/// The remap engine.
///
/// Holds no per-cycle state; both steps take `&self`.
#[derive(Debug, Clone)]
pub struct CharShift<S> {
    range: RemapRange,
    pairs: S,
}

impl<S: KeyPairSource> CharShift<S> {
    /// Identifier reported to diagnostic tooling
    pub const NAME: &'static str = "NamedCharShift";

    /// Create an engine for `range`, reading pairs from `pairs`.
    ///
    /// Every pair the source holds now or can hold later must have a slot.
    pub fn new(range: RemapRange, pairs: S) -> Result<Self, EngineError> {
        let slots = range.len();
        let count = pairs.count();
        if count > slots {
            return Err(EngineError::TableTooLarge {
                count,
                slots,
                range,
            });
        }
        let capacity = pairs.capacity();
        if capacity > slots {
            return Err(EngineError::CapacityTooLarge {
                capacity,
                slots,
                range,
            });
        }
        Ok(Self { range, pairs })
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn range(&self) -> RemapRange {
        self.range
    }

    pub fn pairs(&self) -> &S {
        &self.pairs
    }

    /// Log the configuration once at startup
    pub fn setup(&self) {
        log::info!(
            "{}: {} pair(s) on virtual range {}",
            Self::NAME,
            self.pairs.count(),
            self.range
        );
    }

    /// Check if `key` is one of the virtual remap keys
    #[inline]
    pub fn is_remap_key(&self, key: Key) -> bool {
        self.range.contains(key)
    }

    /// Look up the pair for a virtual key.
    ///
    /// Safe for any key: anything without a table entry yields
    /// [`KeyPair::NO_KEY`].
    pub fn decode(&self, key: Key) -> KeyPair {
        match self.range.index_of(key) {
            Some(i) if i < self.pairs.count() => {
                self.pairs.read_at(i).unwrap_or(KeyPair::NO_KEY)
            }
            _ => KeyPair::NO_KEY,
        }
    }

    /// Resolution step, run for every key event.
    ///
    /// Rewrites a virtual key in `event` to the half of its pair selected by
    /// `modifiers`, and returns the flag the report step must use. `flag` is
    /// the value left by earlier events of this cycle; it survives only events
    /// that are neither remap keys nor keyboard keys.
    pub fn on_key_event<M: ModifierState + ?Sized>(
        &self,
        event: &mut KeyEvent,
        modifiers: &M,
        flag: SuppressionFlag,
    ) -> SuppressionFlag {
        if !self.is_remap_key(event.key) {
            // A keyboard key gets its own report; shift must not be eaten
            if event.key.is_keyboard_key() {
                return SuppressionFlag::Clear;
            }
            return flag;
        }

        // Remap keys are replaced on toggle-on, so the release arrives as
        // the resolved key. Leave a stray release alone.
        if event.action.toggled_off() {
            return flag;
        }

        let (key, resolved) = self.choose(self.decode(event.key), modifiers.shift_held());
        log::debug!(
            "{}: {} -> {} ({})",
            Self::NAME,
            event.key,
            key,
            resolved
        );
        event.key = key;
        resolved
    }

    /// Resolve a press of `key` without an event, for inspection.
    ///
    /// Non-remap keys come back unchanged with a `Clear` flag.
    pub fn resolve<M: ModifierState + ?Sized>(
        &self,
        key: Key,
        modifiers: &M,
    ) -> (Key, SuppressionFlag) {
        if !self.is_remap_key(key) {
            return (key, SuppressionFlag::Clear);
        }
        self.choose(self.decode(key), modifiers.shift_held())
    }

    fn choose(&self, pair: KeyPair, shift_held: bool) -> (Key, SuppressionFlag) {
        if !shift_held {
            return (pair.lower, SuppressionFlag::Clear);
        }
        let upper = pair.upper;
        if upper.is_keyboard_key() && !upper.is_inherently_shifted() {
            (upper, SuppressionFlag::Suppress)
        } else {
            (upper, SuppressionFlag::Clear)
        }
    }

    /// Report step, run once per cycle after every event is resolved and the
    /// report holds the live keys, before it is sent.
    ///
    /// Consumes `flag`: it is `Clear` on return, so nothing decided in this
    /// cycle reaches the next one. Only the report is touched; the physical
    /// shift stays live.
    pub fn before_reporting_state(
        &self,
        flag: &mut SuppressionFlag,
        report: &mut KeyboardReport,
    ) {
        if std::mem::take(flag).is_suppress() {
            log::trace!("{}: suppressing shift in report", Self::NAME);
            report.release_key(Key::LEFT_SHIFT);
            report.release_key(Key::RIGHT_SHIFT);
        }
    }
}
