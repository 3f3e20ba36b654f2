//! Response envelopes
//!
//! The admin API answers in one of a few shapes:
//!
//! - `{ "<collection>": [ ... ] }` for listings
//! - `{ "success": true, "data": ... }` for wrapped results
//! - `{ "success": false, "error": "..." }` or `{ "error": "..." }` on failure
//!
//! These functions turn a status and raw body into records or an
//! [`ApiError`]. They do no I/O.

use serde_json::Map;
use serde_json::Value as JsonValue;

use crate::error::ApiError;
use crate::model::Entity;
use crate::model::Record;

/// Result of a create or update call.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The API echoed the stored record.
    Record(Record),
    /// The API confirmed the write without returning the record.
    Acknowledged,
}

impl MutationOutcome {
    /// Returns the echoed record, if any.
    pub fn record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            Self::Acknowledged => None,
        }
    }
}

/// Extracts a human-readable message from an error body.
///
/// Prefers the `error` field, then `message`, then the body text itself.
pub fn error_message(body: &str) -> String {
    if let Ok(JsonValue::Object(map)) = serde_json::from_str::<JsonValue>(body)
        && let Some(message) = message_field(&map)
    {
        return message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "request failed".to_string()
    } else {
        trimmed.to_string()
    }
}

fn message_field(map: &Map<String, JsonValue>) -> Option<String> {
    ["error", "message"].iter().find_map(|key| match map.get(*key) {
        Some(JsonValue::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(JsonValue::Object(inner)) => message_field(inner),
        _ => None,
    })
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn parse_body(body: &str) -> Result<JsonValue, ApiError> {
    serde_json::from_str(body)
        .map_err(|e| ApiError::parse_with_body(format!("invalid JSON: {}", e), body))
}

/// Fails when a 2xx body still carries `success: false`.
fn check_success_flag(status: u16, map: &Map<String, JsonValue>) -> Result<(), ApiError> {
    if let Some(JsonValue::Bool(false)) = map.get("success") {
        let message = message_field(map).unwrap_or_else(|| "request failed".to_string());
        return Err(ApiError::http(status, message));
    }
    Ok(())
}

fn records_from_array(items: Vec<JsonValue>, body: &str) -> Result<Vec<Record>, ApiError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Record>(item).map_err(|e| {
                ApiError::parse_with_body(format!("item {} is not a record: {}", index, e), body)
            })
        })
        .collect()
}

/// Parses a listing response for `entity`.
///
/// Accepts the collection under the entity's own name, under `data`, or as
/// a bare array. The records keep the order the API sent them in.
pub fn parse_collection(status: u16, body: &str, entity: &Entity) -> Result<Vec<Record>, ApiError> {
    if !is_success(status) {
        return Err(ApiError::http(status, error_message(body)));
    }

    match parse_body(body)? {
        JsonValue::Array(items) => records_from_array(items, body),
        JsonValue::Object(mut map) => {
            check_success_flag(status, &map)?;

            let collection = map
                .remove(entity.name())
                .or_else(|| map.remove("data"))
                .ok_or_else(|| {
                    ApiError::parse_with_body(
                        format!("response has no '{}' collection", entity.name()),
                        body,
                    )
                })?;

            match collection {
                JsonValue::Array(items) => records_from_array(items, body),
                JsonValue::Object(mut inner) => match inner.remove(entity.name()) {
                    Some(JsonValue::Array(items)) => records_from_array(items, body),
                    _ => Err(ApiError::parse_with_body(
                        format!("'{}' is not a list", entity.name()),
                        body,
                    )),
                },
                JsonValue::Null => Ok(Vec::new()),
                _ => Err(ApiError::parse_with_body(
                    format!("'{}' is not a list", entity.name()),
                    body,
                )),
            }
        }
        _ => Err(ApiError::parse_with_body("expected a JSON object or array", body)),
    }
}

/// Parses a create or update response.
///
/// An empty body or a bare `{ "success": true }` is an acknowledgement.
/// A record under `data` or the entity's singular key is returned as is;
/// otherwise an object without a `success` flag is taken to be the record.
pub fn parse_mutation(status: u16, body: &str, entity: &Entity) -> Result<MutationOutcome, ApiError> {
    if !is_success(status) {
        return Err(ApiError::http(status, error_message(body)));
    }

    if body.trim().is_empty() {
        return Ok(MutationOutcome::Acknowledged);
    }

    let JsonValue::Object(mut map) = parse_body(body)? else {
        return Err(ApiError::parse_with_body("expected a JSON object", body));
    };
    check_success_flag(status, &map)?;

    let singular = entity.name().strip_suffix('s').unwrap_or(entity.name());
    let wrapped = ["data", singular]
        .iter()
        .find_map(|key| match map.remove(*key) {
            Some(JsonValue::Object(inner)) => Some(inner),
            _ => None,
        });

    if let Some(inner) = wrapped {
        let record = serde_json::from_value(JsonValue::Object(inner))
            .map_err(|e| ApiError::parse_with_body(format!("invalid record: {}", e), body))?;
        return Ok(MutationOutcome::Record(record));
    }

    if map.contains_key("success") {
        return Ok(MutationOutcome::Acknowledged);
    }

    let record = serde_json::from_value(JsonValue::Object(map))
        .map_err(|e| ApiError::parse_with_body(format!("invalid record: {}", e), body))?;
    Ok(MutationOutcome::Record(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_under_entity_key() {
        let body = r#"{"users": [{"id": 1, "name": "Ada"}, {"id": 2, "name": "Grace"}]}"#;
        let records = parse_collection(200, body, &Entity::Users).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get_string("name").unwrap(), Some("Grace"));
    }

    #[test]
    fn test_collection_under_data() {
        let body = r#"{"success": true, "data": [{"id": "r1"}]}"#;
        let records = parse_collection(200, body, &Entity::Roles).unwrap();
        assert_eq!(records[0].key("id").as_deref(), Some("r1"));
    }

    #[test]
    fn test_collection_nested_in_data() {
        let body = r#"{"success": true, "data": {"requests": [{"id": 9}]}}"#;
        let records = parse_collection(200, body, &Entity::AccountRequests).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_collection_bare_array() {
        let records = parse_collection(200, "[]", &Entity::Users).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_collection_http_error_uses_error_field() {
        let err = parse_collection(403, r#"{"error": "Forbidden for role"}"#, &Entity::Users)
            .unwrap_err();
        assert_eq!(err.status_code(), Some(403));
        assert_eq!(err.server_message(), Some("Forbidden for role"));
    }

    #[test]
    fn test_collection_http_error_plain_body() {
        let err = parse_collection(502, "Bad Gateway\n", &Entity::Users).unwrap_err();
        assert_eq!(err.server_message(), Some("Bad Gateway"));

        let err = parse_collection(500, "", &Entity::Users).unwrap_err();
        assert_eq!(err.server_message(), Some("request failed"));
    }

    #[test]
    fn test_collection_success_false_is_error() {
        let body = r#"{"success": false, "error": "Session expired"}"#;
        let err = parse_collection(200, body, &Entity::Users).unwrap_err();
        assert_eq!(err.server_message(), Some("Session expired"));
    }

    #[test]
    fn test_collection_missing_key() {
        let err = parse_collection(200, r#"{"items": []}"#, &Entity::Users).unwrap_err();
        assert!(matches!(err, ApiError::Parse { body: Some(_), .. }));
    }

    #[test]
    fn test_collection_invalid_json() {
        let err = parse_collection(200, "<html>", &Entity::Users).unwrap_err();
        assert!(matches!(err, ApiError::Parse { .. }));
    }

    #[test]
    fn test_mutation_record_under_data() {
        let body = r#"{"success": true, "data": {"id": 5, "name": "Ada"}}"#;
        let outcome = parse_mutation(201, body, &Entity::Users).unwrap();
        assert_eq!(outcome.record().unwrap().key("id").as_deref(), Some("5"));
    }

    #[test]
    fn test_mutation_record_under_singular_key() {
        let body = r#"{"success": true, "role": {"id": 3, "name": "Agent"}}"#;
        let outcome = parse_mutation(200, body, &Entity::Roles).unwrap();
        assert_eq!(outcome.record().unwrap().get_string("name").unwrap(), Some("Agent"));
    }

    #[test]
    fn test_mutation_acknowledged() {
        assert_eq!(
            parse_mutation(204, "", &Entity::Users).unwrap(),
            MutationOutcome::Acknowledged
        );
        assert_eq!(
            parse_mutation(200, r#"{"success": true}"#, &Entity::Users).unwrap(),
            MutationOutcome::Acknowledged
        );
    }

    #[test]
    fn test_mutation_plain_object_is_record() {
        let outcome = parse_mutation(200, r#"{"id": 7, "email": "a@b.c"}"#, &Entity::Users).unwrap();
        assert!(outcome.record().is_some());
    }

    #[test]
    fn test_mutation_validation_error() {
        let body = r#"{"error": "Email already in use"}"#;
        let err = parse_mutation(400, body, &Entity::Users).unwrap_err();
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.server_message(), Some("Email already in use"));
    }
}
