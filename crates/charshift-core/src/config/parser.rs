// Charshift Config Parser - TOML with Serde
// Parses the virtual range and the key-pair table from TOML files

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{parse_key_string, KeyParseError};
use crate::engine::{CharShift, EngineError};
use crate::pairs::{KeyPair, KeyPairStore, StoreError};
use crate::range::{RangeError, RemapRange};
use crate::Key;

/// Configuration parser errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid key in pair {index} ({field}): {source}")]
    InvalidKey {
        index: usize,
        field: &'static str,
        source: KeyParseError,
    },

    #[error("Invalid range: {0}")]
    InvalidRange(#[from] RangeError),

    #[error(transparent)]
    TooManyPairs(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Main configuration structure (root TOML table)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    /// Virtual key range (defaults to the built-in range)
    #[serde(default)]
    pub range: Option<RangeToml>,

    /// Key pairs, slot 0 first
    #[serde(default)]
    pub pairs: Vec<PairToml>,
}

/// Virtual key range settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeToml {
    /// First virtual key (raw value)
    pub start: u16,
    /// Last virtual key (raw value, inclusive)
    pub end: u16,
}

/// One key-pair entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairToml {
    /// Optional label shown by diagnostics
    pub name: Option<String>,
    /// Key string sent without shift
    pub lower: String,
    /// Key string sent with shift
    pub upper: String,
}

/// Parsed and validated configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub range: RemapRange,
    pub pairs: Vec<KeyPair>,
    /// Labels, one per pair
    pub names: Vec<Option<String>>,
    source_path: Option<PathBuf>,
}

impl Config {
    /// Get the default config path (~/.config/charshift/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("charshift").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.source_path = Some(path.as_ref().to_path_buf());
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: ConfigToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;

        let range = match raw.range {
            Some(r) => RemapRange::new(r.start, r.end)?,
            None => RemapRange::DEFAULT,
        };

        let mut pairs = Vec::with_capacity(raw.pairs.len());
        let mut names = Vec::with_capacity(raw.pairs.len());
        for (index, entry) in raw.pairs.into_iter().enumerate() {
            let lower = parse_field(index, "lower", &entry.lower)?;
            let upper = parse_field(index, "upper", &entry.upper)?;
            if lower == Key::NO_KEY && upper == Key::NO_KEY {
                log::warn!("Pair {} maps both halves to NO_KEY", index);
            }
            pairs.push(KeyPair::new(lower, upper));
            names.push(entry.name);
        }

        if pairs.len() > range.len() {
            return Err(EngineError::TableTooLarge {
                count: pairs.len(),
                slots: range.len(),
                range,
            }
            .into());
        }

        log::debug!("Loaded {} pair(s) for range {}", pairs.len(), range);

        Ok(Self {
            range,
            pairs,
            names,
            source_path: None,
        })
    }

    /// File this config was read from, if any
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Build a mutable pair store sized to the range
    pub fn to_store(&self) -> Result<KeyPairStore, StoreError> {
        KeyPairStore::with_pairs(self.range.len(), self.pairs.clone())
    }

    /// Build an engine backed by a mutable pair store
    pub fn build_engine(&self) -> Result<CharShift<KeyPairStore>, ConfigError> {
        Ok(CharShift::new(self.range, self.to_store()?)?)
    }
}

fn parse_field(index: usize, field: &'static str, value: &str) -> Result<Key, ConfigError> {
    parse_key_string(value).map_err(|source| ConfigError::InvalidKey {
        index,
        field,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::lshift;
    use crate::pairs::KeyPairSource;

    const SAMPLE: &str = r#"
[range]
start = 0xC000
end = 0xC00F

[[pairs]]
name = "one"
lower = "1"
upper = "EXCLAMATION"

[[pairs]]
lower = "a"
upper = "A"

[[pairs]]
lower = ","
upper = "S-SEMICOLON"
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.range, RemapRange::new(0xC000, 0xC00F).unwrap());
        assert_eq!(
            config.pairs,
            vec![
                KeyPair::new(Key::KEY_1, lshift(Key::KEY_1)),
                KeyPair::new(Key::A, Key::A),
                KeyPair::new(Key::COMMA, lshift(Key::SEMICOLON)),
            ]
        );
        assert_eq!(config.names[0].as_deref(), Some("one"));
        assert_eq!(config.names[1], None);
    }

    #[test]
    fn test_default_range() {
        let config = Config::from_toml_str("[[pairs]]\nlower = \"a\"\nupper = \"b\"\n").unwrap();
        assert_eq!(config.range, RemapRange::DEFAULT);
        assert_eq!(config.pairs.len(), 1);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_toml_str("").unwrap();
        assert!(config.pairs.is_empty());
    }

    #[test]
    fn test_invalid_key() {
        let toml = "[[pairs]]\nlower = \"a\"\nupper = \"NotAKey\"\n";
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidKey {
                index: 0,
                field: "upper",
                ..
            }
        ));
    }

    #[test]
    fn test_inverted_range() {
        let toml = "[range]\nstart = 10\nend = 5\n";
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange(_)));
    }

    #[test]
    fn test_too_many_pairs() {
        let toml = r#"
[range]
start = 0xC000
end = 0xC000

[[pairs]]
lower = "a"
upper = "b"

[[pairs]]
lower = "c"
upper = "d"
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::TooManyPairs(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = "[[pairs]]\nlower = \"a\"\nupper = \"b\"\nmiddle = \"c\"\n";
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_build_engine() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        let engine = config.build_engine().unwrap();
        assert_eq!(engine.pairs().count(), 3);
        assert_eq!(engine.pairs().capacity(), 16);
        assert_eq!(engine.decode(Key(0xC001)), KeyPair::new(Key::A, Key::A));
    }

    #[test]
    fn test_from_toml_path_missing_file() {
        let err = Config::from_toml_path("/nonexistent/charshift.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
