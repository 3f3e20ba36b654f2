//! Value enum for dynamic field values

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::NaiveDateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

/// Timestamp layout used by relational backends that don't emit RFC 3339.
const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A dynamic value held by a [`Record`](super::Record) field.
///
/// # JSON Mapping
///
/// | JSON | Rust Variant |
/// |------|--------------|
/// | `null` | `Null` |
/// | `true`/`false` | `Bool` |
/// | integral number | `Int` |
/// | other number | `Float` |
/// | RFC 3339 or `YYYY-MM-DD HH:MM:SS` string | `DateTime` (source text kept) |
/// | other string | `String` |
/// | array of strings | `Tags` |
/// | anything else | `Json` |
///
/// # Example
///
/// ```
/// use crm_admin_lib::model::Value;
///
/// let name = Value::from("Ada Lovelace");
/// let logins = Value::from(42i64);
/// let roles = Value::from(vec!["IT Admin", "Agent"]);
/// let empty = Value::Null;
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null/empty value. Absent fields read as this too.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// A timestamp string. `at` orders it; `raw` is the text the API sent,
    /// used for display, search and serialization.
    DateTime {
        /// The instant, normalized to UTC.
        at: DateTime<Utc>,
        /// The original text.
        raw: String,
    },
    /// Multi-value field such as a list of role names.
    Tags(Vec<String>),
    /// Fallback for nested JSON the model doesn't interpret.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::DateTime { .. } => "datetime",
            Value::Tags(_) => "tags",
            Value::Json(_) => "json",
        }
    }

    /// Converts a decoded JSON value into a field value.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => match parse_datetime(&s) {
                Some(at) => Value::DateTime { at, raw: s },
                None => Value::String(s),
            },
            serde_json::Value::Array(items)
                if items.iter().all(|item| item.is_string()) =>
            {
                Value::Tags(
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            serde_json::Value::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                )
            }
            other => Value::Json(other),
        }
    }

    /// Converts this value back into JSON for request bodies.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::DateTime { raw, .. } => serde_json::Value::String(raw.clone()),
            Value::Tags(tags) => serde_json::Value::from(tags.clone()),
            Value::Json(json) => json.clone(),
        }
    }

    /// Case-insensitive substring test.
    ///
    /// `needle` must already be folded with [`fold_case`]. Null matches only
    /// the empty needle, tags match if any element does. Dates match on the
    /// text the API sent.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        match self {
            Value::Null => needle.is_empty(),
            Value::String(s) | Value::DateTime { raw: s, .. } => fold_case(s).contains(needle),
            Value::Tags(tags) => {
                needle.is_empty() || tags.iter().any(|t| fold_case(t).contains(needle))
            }
            other => fold_case(&other.to_string()).contains(needle),
        }
    }

    /// Total ordering used for sorting.
    ///
    /// Numbers compare numerically (ints and floats mix), strings
    /// lexicographically, dates chronologically. Values of different kinds
    /// order by kind, with null first.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(a), Value::Float(b)) => cmp_f64(*a as f64, *b),
            (Value::Float(a), Value::Int(b)) => cmp_f64(*a, *b as f64),
            (Value::Float(a), Value::Float(b)) => cmp_f64(*a, *b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::DateTime { at: a, .. }, Value::DateTime { at: b, .. }) => a.cmp(b),
            (Value::Tags(a), Value::Tags(b)) => a.cmp(b),
            (Value::Json(a), Value::Json(b)) => a.to_string().cmp(&b.to_string()),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::DateTime { .. } => 3,
            Value::String(_) => 4,
            Value::Tags(_) => 5,
            Value::Json(_) => 6,
        }
    }
}

/// Lowercases one character at a time.
///
/// Unlike [`str::to_lowercase`] this ignores word position, so a final
/// sigma folds the same way whether or not it ends a word, and a term
/// that appears verbatim in a value always matches it.
pub fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, SQL_DATETIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
            Value::DateTime { raw, .. } => f.write_str(raw),
            Value::Tags(tags) => f.write_str(&tags.join(", ")),
            Value::Json(json) => write!(f, "{}", json),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from_json)
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(at: DateTime<Utc>) -> Self {
        Value::DateTime {
            raw: at.to_rfc3339_opts(SecondsFormat::Secs, true),
            at,
        }
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::Tags(v)
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::Tags(v.into_iter().map(str::to_string).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
