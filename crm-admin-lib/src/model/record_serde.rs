//! Serialization for Record.
//!
//! Records travel as flat JSON objects. Field names are written in sorted
//! order so request bodies are deterministic. On read each JSON value goes
//! through [`Value::from_json`], which recognizes dates and tag lists.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use super::Record;
use super::Value;

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut keys: Vec<&String> = self.fields.keys().collect();
        keys.sort();

        let mut map = serializer.serialize_map(Some(keys.len()))?;
        for key in keys {
            map.serialize_entry(key, &self.fields[key])?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object of record fields")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut fields = HashMap::with_capacity(access.size_hint().unwrap_or(0));

        while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
            fields.insert(key, Value::from_json(value));
        }

        Ok(Record { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_sorted_fields() {
        let record = Record::new().set("name", "Ada").set("email", "ada@example.com");

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"email":"ada@example.com","name":"Ada"}"#);
    }

    #[test]
    fn test_deserialize_mixed_fields() {
        let json = r#"{
            "id": 4,
            "name": "Grace Hopper",
            "phone": null,
            "roles": ["IT Admin", "Agent"],
            "created_at": "2024-02-11T08:30:00Z",
            "settings": {"theme": "dark"}
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(record.get_int("id").unwrap(), Some(4));
        assert_eq!(record.get_string("name").unwrap(), Some("Grace Hopper"));
        assert_eq!(record.get_string("phone").unwrap(), None);
        assert_eq!(record.get("roles"), Some(&Value::from(vec!["IT Admin", "Agent"])));
        assert!(matches!(record.get("created_at"), Some(Value::DateTime { .. })));
        assert!(matches!(record.get("settings"), Some(Value::Json(_))));
    }

    #[test]
    fn test_dates_serialize_as_received() {
        let json = r#"[
            {"created_at": "2024-03-01 10:00:00"},
            {"created_at": "2024-03-01T10:00:00+02:00"}
        ]"#;
        let records: Vec<Record> = serde_json::from_str(json).unwrap();
        assert!(matches!(records[0].get("created_at"), Some(Value::DateTime { .. })));

        let out = serde_json::to_string(&records).unwrap();
        assert_eq!(
            out,
            r#"[{"created_at":"2024-03-01 10:00:00"},{"created_at":"2024-03-01T10:00:00+02:00"}]"#
        );
    }

    #[test]
    fn test_deserialize_rejects_non_object() {
        let result: Result<Record, _> = serde_json::from_str("[1, 2]");
        assert!(result.is_err());
    }
}
