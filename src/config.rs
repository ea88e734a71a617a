//! Engine settings, loadable from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modes::InputMethod;
use crate::shortcut::Shortcut;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown input method id {0}")]
    UnknownMethod(u8),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    #[serde(default)]
    pub method: InputMethod,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Tone on the second vowel of oa, oe, uy ("hoà" rather than "hòa").
    #[serde(default = "default_true")]
    pub modern_tone: bool,
    /// Telex `w` at the start of a word stays a `w`.
    #[serde(default)]
    pub skip_w_shortcut: bool,
    /// Telex `]` and `[` type ư and ơ.
    #[serde(default)]
    pub bracket_shortcut: bool,
    /// ESC puts back the raw keys of the current word.
    #[serde(default)]
    pub esc_restore: bool,
    #[serde(default)]
    pub english_auto_restore: bool,
    #[serde(default)]
    pub auto_capitalize: bool,
    #[serde(default)]
    pub shortcuts: Vec<Shortcut>,
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            method: InputMethod::Telex,
            enabled: default_true(),
            modern_tone: default_true(),
            skip_w_shortcut: false,
            bracket_shortcut: false,
            esc_restore: false,
            english_auto_restore: false,
            auto_capitalize: false,
            shortcuts: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.method, InputMethod::Telex);
        assert!(c.enabled);
        assert!(c.modern_tone);
        assert!(!c.esc_restore);
        assert!(c.shortcuts.is_empty());
    }

    #[test]
    fn round_trip() {
        let mut c = EngineConfig {
            method: InputMethod::Vni,
            esc_restore: true,
            ..Default::default()
        };
        c.shortcuts.push(Shortcut::new("vn", "Việt Nam"));
        let json = c.to_json().unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), c);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let c = EngineConfig::from_json(r#"{"method":"vni","auto_capitalize":true}"#).unwrap();
        assert_eq!(c.method, InputMethod::Vni);
        assert!(c.auto_capitalize);
        assert!(c.modern_tone);
        assert!(c.enabled);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            EngineConfig::from_json("{method"),
            Err(ConfigError::Json(_))
        ));
    }
}
