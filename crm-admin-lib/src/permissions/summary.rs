//! One-line permission summaries.

use super::PermissionSet;

/// Shown when a role or user has no granted permission, or when the
/// permission data couldn't be read.
pub const NOT_ASSIGNED: &str = "Not Assigned";

/// Joins the granted permission names with `", "`, in insertion order.
///
/// Returns [`NOT_ASSIGNED`] when nothing is granted.
pub fn summarize(set: &PermissionSet) -> String {
    let granted: Vec<&str> = set.granted().collect();
    if granted.is_empty() {
        NOT_ASSIGNED.to_string()
    } else {
        granted.join(", ")
    }
}

/// Summarizes raw permission JSON, which may be absent.
///
/// Malformed data is logged and reported as [`NOT_ASSIGNED`]; this never
/// fails.
pub fn summarize_json(json: Option<&serde_json::Value>) -> String {
    let Some(json) = json else {
        return NOT_ASSIGNED.to_string();
    };
    match PermissionSet::from_json(json) {
        Ok(set) => summarize(&set),
        Err(e) => {
            log::warn!("{}; showing {:?}", e, NOT_ASSIGNED);
            NOT_ASSIGNED.to_string()
        }
    }
}

/// Summarizes a record's permission field, with the same recovery as
/// [`summarize_json`].
pub fn summarize_field(record: &crate::model::Record, field: &str) -> String {
    match PermissionSet::from_record(record, field) {
        Ok(set) => summarize(&set),
        Err(e) => {
            log::warn!("{} in field '{}'; showing {:?}", e, field, NOT_ASSIGNED);
            NOT_ASSIGNED.to_string()
        }
    }
}
