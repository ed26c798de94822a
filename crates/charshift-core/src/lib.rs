// Charshift Core Library
// Shift-dependent key pairs for virtual keys, independent of host shift handling

pub mod action;
pub mod config;
pub mod engine;
pub mod event;
pub mod key;
pub mod modifier;
pub mod output;
pub mod pairs;
pub mod pipeline;
pub mod range;
pub mod state;

pub use action::Action;
pub use config::{parse_key_string, KeyParseError};
pub use engine::{CharShift, EngineError, SuppressionFlag};
pub use event::{KeyAddr, KeyEvent};
pub use key::{ascii_to_key, key_from_name, lshift, Key};
pub use modifier::{Modifier, ModifierSet};
pub use output::KeyboardReport;
pub use pairs::{KeyPair, KeyPairSource, KeyPairStore, StoreError};
pub use pipeline::Pipeline;
pub use range::{RangeError, RemapRange};
pub use state::{LiveKeys, ModifierState};

#[cfg(feature = "config")]
pub use config::{Config, ConfigError};
