// Charshift Config API
// Key string parsing and the TOML pair-table config

pub mod key_parser;

#[cfg(feature = "config")]
pub mod parser;

pub use key_parser::{parse_key_string, KeyParseError};

#[cfg(feature = "config")]
pub use parser::{Config, ConfigError};
