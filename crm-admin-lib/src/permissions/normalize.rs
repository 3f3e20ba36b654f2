//! Normalization of permission blobs into a typed set.

use crate::error::PermissionError;
use crate::model::Record;
use crate::model::Value;

/// Permission names with their granted flag, in the order they arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    entries: Vec<(String, bool)>,
}

impl PermissionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from name/flag pairs. A repeated name keeps its first
    /// position and its last flag.
    pub fn from_flags<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for (name, granted) in flags {
            set.insert(name, granted);
        }
        set
    }

    /// Builds a set in which every listed name is granted.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_flags(names.into_iter().map(|name| (name, true)))
    }

    /// Normalizes decoded JSON.
    ///
    /// Accepted shapes:
    /// - object of name -> flag, where a flag is a bool, `0`/`1`, the strings
    ///   `"true"`/`"false"`, or `null` (not granted)
    /// - array of names
    /// - a string holding either of the above as JSON
    /// - `null`, which is the empty set
    pub fn from_json(json: &serde_json::Value) -> Result<Self, PermissionError> {
        match json {
            serde_json::Value::Null => Ok(Self::new()),
            serde_json::Value::Object(map) => {
                let mut set = Self::new();
                for (name, flag) in map {
                    set.insert(name.as_str(), parse_flag(name, flag)?);
                }
                Ok(set)
            }
            serde_json::Value::Array(items) => {
                let mut set = Self::new();
                for item in items {
                    match item {
                        serde_json::Value::String(name) => set.insert(name.as_str(), true),
                        other => {
                            return Err(PermissionError::malformed(format!(
                                "expected a permission name, got {}",
                                other
                            )));
                        }
                    }
                }
                Ok(set)
            }
            serde_json::Value::String(encoded) => Self::from_encoded(encoded),
            other => Err(PermissionError::malformed(format!(
                "expected an object or a list, got {}",
                other
            ))),
        }
    }

    /// Normalizes a JSON-encoded string. A blank string is the empty set.
    pub fn from_encoded(encoded: &str) -> Result<Self, PermissionError> {
        if encoded.trim().is_empty() {
            return Ok(Self::new());
        }
        let json: serde_json::Value = serde_json::from_str(encoded)
            .map_err(|e| PermissionError::malformed(format!("invalid JSON: {}", e)))?;
        if json.is_string() {
            // a doubly encoded blob is not something the API produces
            return Err(PermissionError::malformed("nested JSON string"));
        }
        Self::from_json(&json)
    }

    /// Normalizes a record field value.
    pub fn from_value(value: &Value) -> Result<Self, PermissionError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Tags(names) => Ok(Self::from_names(names.iter().cloned())),
            Value::String(encoded) => Self::from_encoded(encoded),
            Value::Json(json) => Self::from_json(json),
            other => Err(PermissionError::malformed(format!(
                "unexpected {} value",
                other.type_name()
            ))),
        }
    }

    /// Normalizes `field` of a record. An absent field is the empty set.
    pub fn from_record(record: &Record, field: &str) -> Result<Self, PermissionError> {
        Self::from_value(record.get_or_null(field))
    }

    /// Sets the flag for `name`.
    pub fn insert(&mut self, name: impl Into<String>, granted: bool) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = granted,
            None => self.entries.push((name, granted)),
        }
    }

    /// Returns `true` if `name` is present and granted.
    pub fn is_granted(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|(existing, granted)| *granted && existing == name)
    }

    /// Returns the granted names, in insertion order.
    pub fn granted(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, granted)| *granted)
            .map(|(name, _)| name.as_str())
    }

    /// Returns every name with its flag, in insertion order.
    pub fn entries(&self) -> &[(String, bool)] {
        &self.entries
    }

    /// Returns `true` if no permission is granted.
    pub fn is_empty(&self) -> bool {
        self.granted().next().is_none()
    }
}

fn parse_flag(name: &str, flag: &serde_json::Value) -> Result<bool, PermissionError> {
    match flag {
        serde_json::Value::Bool(b) => Ok(*b),
        serde_json::Value::Null => Ok(false),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(PermissionError::malformed(format!(
                "flag for '{}' is {}",
                name, n
            ))),
        },
        serde_json::Value::String(s) => match s.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(PermissionError::malformed(format!(
                "flag for '{}' is {:?}",
                name, s
            ))),
        },
        other => Err(PermissionError::malformed(format!(
            "flag for '{}' is {}",
            name, other
        ))),
    }
}
