// Charshift Key Actions
// Switch transitions between two scans

use strum_macros::{Display, EnumString};

/// What a key switch did since the previous scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    /// Was down, now up
    Release,
    /// Was up, now down
    Press,
    /// Down on both scans
    Repeat,
}

impl Action {
    /// Derive the action from two consecutive switch samples.
    ///
    /// Returns `None` for a switch that stayed up: nothing to report.
    pub fn from_scan(was_down: bool, is_down: bool) -> Option<Self> {
        match (was_down, is_down) {
            (false, true) => Some(Action::Press),
            (true, true) => Some(Action::Repeat),
            (true, false) => Some(Action::Release),
            (false, false) => None,
        }
    }

    /// Switch is down after this action
    pub fn is_pressed(self) -> bool {
        !self.toggled_off()
    }

    pub fn toggled_on(self) -> bool {
        self == Action::Press
    }

    pub fn toggled_off(self) -> bool {
        self == Action::Release
    }
}
