//! Pure search, sort and pagination over record slices.
//!
//! None of these mutate their input. They work on `&Record` so a controller
//! can chain them without cloning records.

use crate::model::Record;
use crate::model::fold_case;

use super::PageSize;
use super::SortDirection;

/// Returns the records whose value in any of `fields` contains `term`,
/// compared case-insensitively.
///
/// An empty `fields` list or an empty term keeps every record. Absent and
/// null fields read as `""`; multi-value fields match if any element does.
///
/// # Example
///
/// ```
/// use crm_admin_lib::model::Record;
/// use crm_admin_lib::table::filter;
///
/// let users = vec![
///     Record::new().set("role", "IT Admin"),
///     Record::new().set("role", "Agent"),
/// ];
///
/// let admins = filter(&users, "ADMIN", &["role"]);
/// assert_eq!(admins.len(), 1);
/// ```
pub fn filter<'a, I, S>(records: I, term: &str, fields: &[S]) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
    S: AsRef<str>,
{
    let records = records.into_iter();
    if fields.is_empty() || term.is_empty() {
        return records.collect();
    }

    let needle = fold_case(term);
    records
        .filter(|record| {
            fields
                .iter()
                .any(|field| record.get_or_null(field.as_ref()).contains_lowercase(&needle))
        })
        .collect()
}

/// Stable sort by the value of `key`.
///
/// Records with equal keys keep their input order in both directions.
/// `SortDirection::None` returns the input unchanged.
pub fn sort<'a>(mut records: Vec<&'a Record>, key: &str, direction: SortDirection) -> Vec<&'a Record> {
    match direction {
        SortDirection::None => {}
        SortDirection::Ascending => {
            records.sort_by(|a, b| a.get_or_null(key).compare(b.get_or_null(key)));
        }
        SortDirection::Descending => {
            records.sort_by(|a, b| b.get_or_null(key).compare(a.get_or_null(key)));
        }
    }
    records
}

/// Returns page `page` (1-based) of `records`.
///
/// The slice is `[(page-1)*size, page*size)` clamped to the bounds. A page
/// past the end is empty; page 0 reads as page 1.
pub fn paginate<T>(records: &[T], page: usize, page_size: PageSize) -> &[T] {
    let size = page_size.get();
    let start = page.saturating_sub(1).saturating_mul(size);
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(records.len());
    &records[start..end]
}

/// Number of pages needed for `count` rows. Never less than 1.
pub fn total_pages(count: usize, page_size: PageSize) -> usize {
    count.div_ceil(page_size.get()).max(1)
}

/// Clamps a requested page into `[1, total_pages]`.
pub fn clamp_page(page: i64, total_pages: usize) -> usize {
    let last = i64::try_from(total_pages.max(1)).unwrap_or(i64::MAX);
    // clamp keeps the value in 1..=last, which always fits in usize
    page.clamp(1, last) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    fn users() -> Vec<Record> {
        vec![
            Record::new().set("id", 1i64).set("name", "Ada").set("role", "IT Admin").set("phone", "555-0101"),
            Record::new().set("id", 2i64).set("name", "Brian").set("role", "Data Analyst"),
            Record::new().set("id", 3i64).set("name", "Cleo").set("role", "Agent").set("phone", Value::Null),
            Record::new().set("id", 4i64).set("name", "Dmitri").set("role", "IT Admin"),
        ]
    }

    fn ids(records: &[&Record]) -> Vec<i64> {
        records
            .iter()
            .map(|r| r.get_int("id").unwrap().unwrap())
            .collect()
    }

    #[test]
    fn test_filter_case_insensitive() {
        let users = users();
        assert_eq!(ids(&filter(&users, "admin", &["role"])), vec![1, 4]);
        assert_eq!(ids(&filter(&users, "ADMIN", &["role"])), vec![1, 4]);
    }

    #[test]
    fn test_filter_tolerates_missing_fields() {
        let users = users();
        assert_eq!(ids(&filter(&users, "555", &["phone"])), vec![1]);
    }

    #[test]
    fn test_filter_any_field() {
        let users = users();
        assert_eq!(ids(&filter(&users, "d", &["name", "role"])), vec![1, 2, 4]);
        assert_eq!(ids(&filter(&users, "cleo", &["name", "role"])), vec![3]);
    }

    #[test]
    fn test_filter_without_fields_is_identity() {
        let users = users();
        let no_fields: [&str; 0] = [];
        assert_eq!(ids(&filter(&users, "zzz", &no_fields)), vec![1, 2, 3, 4]);
        assert_eq!(ids(&filter(&users, "", &["name"])), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_filter_matches_dates_as_sent() {
        let records: Vec<Record> = serde_json::from_str(
            r#"[
                {"id": 1, "created_at": "2024-03-01 10:00:00"},
                {"id": 2, "created_at": "2024-03-01T10:00:00+02:00"},
                {"id": 3, "created_at": "2024-03-02T09:30:00Z"}
            ]"#,
        )
        .unwrap();

        assert_eq!(ids(&filter(&records, "2024-03-01 10", &["created_at"])), vec![1]);
        assert_eq!(ids(&filter(&records, "+02:00", &["created_at"])), vec![2]);
        assert_eq!(ids(&filter(&records, "2024-03-01", &["created_at"])), vec![1, 2]);
    }

    #[test]
    fn test_filter_folds_case_per_character() {
        let records = vec![
            Record::new().set("id", 1i64).set("name", "ΟΔΟΣ"),
            Record::new().set("id", 2i64).set("name", "Straße"),
        ];
        assert_eq!(ids(&filter(&records, "Σ", &["name"])), vec![1]);
        assert_eq!(ids(&filter(&records, "ΟΣ", &["name"])), vec![1]);
        assert_eq!(ids(&filter(&records, "σ", &["name"])), vec![1]);
        assert_eq!(ids(&filter(&records, "STRAẞE", &["name"])), vec![2]);
    }

    #[test]
    fn test_filter_matches_any_tag() {
        let records = vec![
            Record::new().set("id", 1i64).set("roles", vec!["Agent", "Support Admin"]),
            Record::new().set("id", 2i64).set("roles", vec!["Agent"]),
        ];
        assert_eq!(ids(&filter(&records, "admin", &["roles"])), vec![1]);
    }

    #[test]
    fn test_sort_stable_both_directions() {
        let users = users();
        let all: Vec<&Record> = users.iter().collect();

        let asc = sort(all.clone(), "role", SortDirection::Ascending);
        assert_eq!(ids(&asc), vec![3, 2, 1, 4]);

        let desc = sort(all.clone(), "role", SortDirection::Descending);
        assert_eq!(ids(&desc), vec![1, 4, 2, 3]);

        let none = sort(all, "role", SortDirection::None);
        assert_eq!(ids(&none), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sort_puts_missing_values_first_when_ascending() {
        let users = users();
        let all: Vec<&Record> = users.iter().collect();
        let asc = sort(all, "phone", SortDirection::Ascending);
        assert_eq!(ids(&asc), vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_paginate_bounds() {
        let rows: Vec<u32> = (1..=12).collect();
        let size = PageSize::new(10).unwrap();
        assert_eq!(paginate(&rows, 1, size).len(), 10);
        assert_eq!(paginate(&rows, 2, size), &[11, 12]);
        assert!(paginate(&rows, 3, size).is_empty());
        assert_eq!(paginate(&rows, 0, size), paginate(&rows, 1, size));
    }

    #[test]
    fn test_total_pages_never_zero() {
        let size = PageSize::new(10).unwrap();
        assert_eq!(total_pages(0, size), 1);
        assert_eq!(total_pages(10, size), 1);
        assert_eq!(total_pages(11, size), 2);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(-5, 3), 1);
        assert_eq!(clamp_page(999, 3), 3);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(0, 0), 1);
    }
}
