//! Flat string-keyed parameter map.
//!
//! Numbers are stored in the unit they are tagged with and read back in
//! internal units, so a parameter file stays human readable:
//!
//! ```json
//! { "lookahead_time": { "value": 180.0, "unit": "s" },
//!   "conflict_level": 2,
//!   "alert_1_region": "NONE" }
//! ```

use crate::error::ParameterError;
use crate::units;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One entry of a [`ParameterData`] map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterEntry {
    /// Unit-tagged number, stored in `unit`
    Value {
        value: f64,
        #[serde(default = "unspecified")]
        unit: String,
    },
    Flag(bool),
    Integer(i64),
    Text(String),
}

fn unspecified() -> String {
    "unspecified".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterData {
    entries: BTreeMap<String, ParameterEntry>,
}

impl ParameterData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&ParameterEntry> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParameterEntry> {
        self.entries.remove(key)
    }

    /// Store an internal-unit value, converted to `unit` for display.
    pub fn set_internal(&mut self, key: impl Into<String>, value: f64, unit: &str) {
        self.set_value(key, units::to(unit, value), unit);
    }

    /// Store a value already expressed in `unit`.
    pub fn set_value(&mut self, key: impl Into<String>, value: f64, unit: &str) {
        self.entries.insert(
            key.into(),
            ParameterEntry::Value {
                value,
                unit: unit.to_string(),
            },
        );
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.entries.insert(key.into(), ParameterEntry::Flag(value));
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.entries.insert(key.into(), ParameterEntry::Integer(value));
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .insert(key.into(), ParameterEntry::Text(value.into()));
    }

    fn entry(&self, key: &str) -> Result<&ParameterEntry, ParameterError> {
        self.entries
            .get(key)
            .ok_or_else(|| ParameterError::Missing(key.to_string()))
    }

    /// Numeric value in internal units.
    pub fn value(&self, key: &str) -> Result<f64, ParameterError> {
        match self.entry(key)? {
            ParameterEntry::Value { value, unit } => {
                let factor = units::factor(unit).ok_or_else(|| ParameterError::UnknownUnit {
                    key: key.to_string(),
                    unit: unit.clone(),
                })?;
                Ok(value * factor)
            }
            ParameterEntry::Integer(i) => Ok(*i as f64),
            _ => Err(ParameterError::WrongType {
                key: key.to_string(),
                expected: "number",
            }),
        }
    }

    /// Unit tag of a numeric entry.
    pub fn unit(&self, key: &str) -> Option<&str> {
        match self.entries.get(key)? {
            ParameterEntry::Value { unit, .. } => Some(unit.as_str()),
            _ => None,
        }
    }

    pub fn bool(&self, key: &str) -> Result<bool, ParameterError> {
        match self.entry(key)? {
            ParameterEntry::Flag(b) => Ok(*b),
            _ => Err(ParameterError::WrongType {
                key: key.to_string(),
                expected: "boolean",
            }),
        }
    }

    pub fn int(&self, key: &str) -> Result<i64, ParameterError> {
        match self.entry(key)? {
            ParameterEntry::Integer(i) => Ok(*i),
            _ => Err(ParameterError::WrongType {
                key: key.to_string(),
                expected: "integer",
            }),
        }
    }

    pub fn string(&self, key: &str) -> Result<&str, ParameterError> {
        match self.entry(key)? {
            ParameterEntry::Text(s) => Ok(s.as_str()),
            _ => Err(ParameterError::WrongType {
                key: key.to_string(),
                expected: "string",
            }),
        }
    }

    /// Entries whose key starts with `prefix`, with the prefix removed.
    pub fn extract_prefix(&self, prefix: &str) -> ParameterData {
        let entries = self
            .entries
            .iter()
            .filter_map(|(k, v)| k.strip_prefix(prefix).map(|rest| (rest.to_string(), v.clone())))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        ParameterData { entries }
    }

    /// Copy of this map with `prefix` prepended to every key.
    pub fn with_prefix(&self, prefix: &str) -> ParameterData {
        let entries = self
            .entries
            .iter()
            .map(|(k, v)| (format!("{prefix}{k}"), v.clone()))
            .collect();
        ParameterData { entries }
    }

    /// Same keys and entries, numbers compared with a relative tolerance.
    pub fn almost_equals(&self, other: &ParameterData) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && entries_close(va, vb))
    }

    /// Insert every entry of `other`, overwriting on key collision.
    pub fn extend(&mut self, other: ParameterData) {
        self.entries.extend(other.entries);
    }

    pub fn from_json_str(json: &str) -> Result<Self, ParameterError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, ParameterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParameterError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ParameterError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

fn entries_close(a: &ParameterEntry, b: &ParameterEntry) -> bool {
    match (a, b) {
        (
            ParameterEntry::Value { value: x, unit: ux },
            ParameterEntry::Value { value: y, unit: uy },
        ) => ux == uy && (x - y).abs() <= 1e-9 * x.abs().max(y.abs()).max(1.0),
        _ => a == b,
    }
}
