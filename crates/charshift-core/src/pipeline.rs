// Charshift Pipeline
// One cycle: resolve every pending event, update live keys, assemble the
// report, then apply suppression before the report leaves.

use crate::engine::{CharShift, SuppressionFlag};
use crate::event::{KeyAddr, KeyEvent};
use crate::output::KeyboardReport;
use crate::pairs::KeyPairSource;
use crate::state::LiveKeys;
use crate::Key;

/// A host-side cycle driver around a [`CharShift`] engine.
///
/// Owns the live keys and the flag register. The register is written by
/// each resolved event and consumed by the report that ends the cycle.
#[derive(Debug)]
pub struct Pipeline<S> {
    engine: CharShift<S>,
    live_keys: LiveKeys,
    flag: SuppressionFlag,
    last_flag: SuppressionFlag,
}

impl<S: KeyPairSource> Pipeline<S> {
    pub fn new(engine: CharShift<S>) -> Self {
        Self {
            engine,
            live_keys: LiveKeys::new(),
            flag: SuppressionFlag::Clear,
            last_flag: SuppressionFlag::Clear,
        }
    }

    pub fn engine(&self) -> &CharShift<S> {
        &self.engine
    }

    pub fn live_keys(&self) -> &LiveKeys {
        &self.live_keys
    }

    /// Flag pending for the report that ends the current cycle.
    ///
    /// Always `Clear` between cycles.
    pub fn flag(&self) -> SuppressionFlag {
        self.flag
    }

    /// Flag the most recent report was built with
    pub fn last_flag(&self) -> SuppressionFlag {
        self.last_flag
    }

    /// Resolve one event of the current cycle without reporting.
    ///
    /// Returns the event as the engine left it.
    pub fn resolve_event(&mut self, mut event: KeyEvent) -> KeyEvent {
        // A release reports whatever the switch resolved to on press
        if event.action.toggled_off() {
            if let Some(live) = event.addr.and_then(|addr| self.live_keys.get(addr)) {
                event.key = live;
            }
        }

        self.flag = self
            .engine
            .on_key_event(&mut event, &self.live_keys, self.flag);

        self.update_live_keys(&event);
        event
    }

    /// End the cycle: build the report from the live keys and consume the flag
    pub fn report(&mut self) -> KeyboardReport {
        let mut report = KeyboardReport::new();
        for key in self.live_keys.all() {
            report.press_key(key);
        }

        self.last_flag = self.flag;
        self.engine.before_reporting_state(&mut self.flag, &mut report);
        log::trace!("report {:?} ({})", report.to_bytes(), self.last_flag);
        report
    }

    /// Run a full cycle over `events` and return the one report it produces
    pub fn handle_cycle(
        &mut self,
        events: impl IntoIterator<Item = KeyEvent>,
    ) -> KeyboardReport {
        for event in events {
            let resolved = self.resolve_event(event);
            log::trace!("resolved {} ({})", resolved, self.flag);
        }
        self.report()
    }

    /// Run a cycle holding a single event
    pub fn handle_key_event(&mut self, event: KeyEvent) -> KeyboardReport {
        self.handle_cycle([event])
    }

    /// Press `key` on switch `addr`
    pub fn press(&mut self, addr: KeyAddr, key: Key) -> KeyboardReport {
        self.handle_key_event(KeyEvent::press(addr, key))
    }

    /// Release switch `addr`
    pub fn release(&mut self, addr: KeyAddr) -> KeyboardReport {
        let key = self.live_keys.get(addr).unwrap_or(Key::NO_KEY);
        self.handle_key_event(KeyEvent::release(addr, key))
    }

    /// Release everything and clear the flag register
    pub fn reset(&mut self) {
        self.live_keys.reset();
        self.flag = SuppressionFlag::Clear;
        self.last_flag = SuppressionFlag::Clear;
    }

    fn update_live_keys(&mut self, event: &KeyEvent) {
        match (event.addr, event.action.is_pressed()) {
            (Some(addr), true) => self.live_keys.activate(addr, event.key),
            (Some(addr), false) => {
                self.live_keys.clear(addr);
            }
            (None, true) => self.live_keys.activate_injected(event.key),
            (None, false) => self.live_keys.clear_injected(event.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{flags, lshift};
    use crate::modifier::Modifier;
    use crate::pairs::KeyPair;
    use crate::range::RemapRange;
    use crate::Action;

    fn pipeline() -> Pipeline<Vec<KeyPair>> {
        let pairs = vec![
            KeyPair::new(Key::KEY_1, lshift(Key::KEY_1)),
            KeyPair::new(Key::A, Key::A),
        ];
        Pipeline::new(CharShift::new(RemapRange::DEFAULT, pairs).unwrap())
    }

    const SHIFT: KeyAddr = KeyAddr(0);
    const VIRT: KeyAddr = KeyAddr(1);
    const OTHER: KeyAddr = KeyAddr(2);

    #[test]
    fn test_plain_key_passes_through() {
        let mut pipeline = pipeline();
        let report = pipeline.press(OTHER, Key::B);
        assert!(report.is_key_pressed(Key::B));
        assert_eq!(pipeline.last_flag(), SuppressionFlag::Clear);
    }

    #[test]
    fn test_virtual_key_without_shift() {
        let mut pipeline = pipeline();
        let report = pipeline.press(VIRT, Key(0xC000));
        assert!(report.is_key_pressed(Key::KEY_1));
        assert!(report.modifiers().is_empty());
        assert_eq!(pipeline.live_keys().get(VIRT), Some(Key::KEY_1));
    }

    #[test]
    fn test_virtual_key_with_shift_suppresses() {
        let mut pipeline = pipeline();
        let report = pipeline.press(SHIFT, Key::LEFT_SHIFT);
        assert!(report.modifiers().contains(Modifier::LeftShift));

        let report = pipeline.press(VIRT, Key(0xC001));
        assert!(report.is_key_pressed(Key::A));
        assert!(!report.modifiers().has_shift());
        assert_eq!(pipeline.last_flag(), SuppressionFlag::Suppress);
        // Physical shift is still held
        assert_eq!(pipeline.live_keys().get(SHIFT), Some(Key::LEFT_SHIFT));
    }

    #[test]
    fn test_flag_consumed_by_report() {
        let mut pipeline = pipeline();
        pipeline.press(SHIFT, Key::LEFT_SHIFT);

        let resolved = pipeline.resolve_event(KeyEvent::press(VIRT, Key(0xC001)));
        assert_eq!(resolved.key, Key::A);
        assert_eq!(pipeline.flag(), SuppressionFlag::Suppress);

        pipeline.report();
        assert_eq!(pipeline.flag(), SuppressionFlag::Clear);
        assert_eq!(pipeline.last_flag(), SuppressionFlag::Suppress);
    }

    #[test]
    fn test_cycle_with_several_events() {
        let mut pipeline = pipeline();
        let report = pipeline.handle_cycle([
            KeyEvent::press(SHIFT, Key::LEFT_SHIFT),
            KeyEvent::press(VIRT, Key(0xC001)),
            KeyEvent::press(OTHER, Key::new(0xE9, flags::SYNTHETIC)),
        ]);
        assert_eq!(report.to_bytes(), [0, 0, 0x04, 0, 0, 0, 0, 0]);
        assert_eq!(pipeline.flag(), SuppressionFlag::Clear);
    }

    #[test]
    fn test_release_uses_resolved_key() {
        let mut pipeline = pipeline();
        pipeline.press(SHIFT, Key::LEFT_SHIFT);
        pipeline.press(VIRT, Key(0xC001));

        let report = pipeline.handle_key_event(KeyEvent::new(
            Some(VIRT),
            Key(0xC001),
            Action::Release,
        ));
        assert!(!report.is_key_pressed(Key::A));
        assert_eq!(pipeline.live_keys().get(VIRT), None);
        // The release was a keyboard key, so shift is back in the report
        assert_eq!(pipeline.last_flag(), SuppressionFlag::Clear);
        assert!(report.modifiers().contains(Modifier::LeftShift));
    }

    #[test]
    fn test_reset() {
        let mut pipeline = pipeline();
        pipeline.press(SHIFT, Key::LEFT_SHIFT);
        pipeline.resolve_event(KeyEvent::press(VIRT, Key(0xC001)));
        assert_eq!(pipeline.flag(), SuppressionFlag::Suppress);

        pipeline.reset();
        assert!(pipeline.live_keys().is_empty());
        assert_eq!(pipeline.flag(), SuppressionFlag::Clear);
        assert_eq!(pipeline.last_flag(), SuppressionFlag::Clear);
    }
}
