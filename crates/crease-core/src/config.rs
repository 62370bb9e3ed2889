//! Checker configuration
//!
//! A configuration is a mapping from rule name to `false` (disabled),
//! `true` (enabled with defaults), or an options object, plus the
//! reserved cross-cutting keys that configure the shared check context
//! rather than any individual rule. Config files are JSON with comments
//! and trailing commas permitted.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::CreaseError;
use crate::result::Result;

/// Reserved key: language-feature toggle shared by several rules
pub const ESNEXT_KEY: &str = "esnext";

/// Per-rule configuration value
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSetting {
    /// Explicitly disabled (`false` or `null`)
    Off,
    /// Enabled with rule defaults (`true`)
    On,
    /// Enabled with an options object
    Options(Value),
}

impl RuleSetting {
    /// Interpret a raw configuration value
    pub fn from_value(name: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Bool(false) | Value::Null => Ok(RuleSetting::Off),
            Value::Bool(true) => Ok(RuleSetting::On),
            Value::Object(_) => Ok(RuleSetting::Options(value.clone())),
            other => Err(CreaseError::config_error(format!(
                "value for '{name}' must be false, true, or an options object, got {other}"
            ))),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, RuleSetting::Off)
    }

    /// The options value handed to the rule's `configure`
    pub fn options(&self) -> Value {
        match self {
            RuleSetting::Off => Value::Bool(false),
            RuleSetting::On => Value::Bool(true),
            RuleSetting::Options(value) => value.clone(),
        }
    }
}

/// Full configuration for one checker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckerConfig {
    rules: Vec<(String, RuleSetting)>,
    es_next: bool,
}

impl CheckerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one rule's setting, replacing any earlier entry with that name
    pub fn set(&mut self, name: impl Into<String>, setting: RuleSetting) {
        let name = name.into();
        self.rules.retain(|(existing, _)| *existing != name);
        self.rules.push((name, setting));
    }

    /// Builder-style [`CheckerConfig::set`]
    pub fn with_rule(mut self, name: impl Into<String>, setting: RuleSetting) -> Self {
        self.set(name, setting);
        self
    }

    pub fn set_es_next(&mut self, es_next: bool) {
        self.es_next = es_next;
    }

    pub fn with_es_next(mut self, es_next: bool) -> Self {
        self.es_next = es_next;
        self
    }

    pub fn es_next(&self) -> bool {
        self.es_next
    }

    /// Rule entries in document order
    pub fn rules(&self) -> impl Iterator<Item = (&str, &RuleSetting)> {
        self.rules.iter().map(|(name, setting)| (name.as_str(), setting))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Build a configuration from a parsed JSON object
    pub fn from_json(value: &Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(CreaseError::config_error(
                "configuration must be an object mapping rule names to settings",
            ));
        };
        let mut config = CheckerConfig::new();
        for (key, entry) in object {
            if key == ESNEXT_KEY {
                let Some(flag) = entry.as_bool() else {
                    return Err(CreaseError::config_error(format!(
                        "'{ESNEXT_KEY}' must be a boolean, got {entry}"
                    )));
                };
                config.es_next = flag;
                continue;
            }
            let setting = RuleSetting::from_value(key, entry)?;
            config.rules.push((key.clone(), setting));
        }
        Ok(config)
    }

    /// Parse a configuration document (JSON with comments/trailing commas)
    pub fn from_str(text: &str) -> Result<Self> {
        let value: Value = json5::from_str(text)
            .map_err(|err| CreaseError::config_error(format!("invalid config document: {err}")))?;
        Self::from_json(&value)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| CreaseError::io_error(path, err))?;
        Self::from_str(&text)
    }
}
