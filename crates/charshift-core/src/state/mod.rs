// Charshift State
// Live key state consulted while events are resolved

mod live_keys;

pub use live_keys::{LiveKeys, ModifierState};
