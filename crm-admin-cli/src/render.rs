//! Plain-text rendering of table pages and permission summaries.

use std::fmt::Write;

use crm_admin_lib::model::Record;
use crm_admin_lib::permissions::CategoryRules;
use crm_admin_lib::permissions::PermissionSet;
use crm_admin_lib::permissions::summarize_field;
use crm_admin_lib::table::PageView;

const MAX_CELL_WIDTH: usize = 40;

/// Formats one cell, summarizing the permissions column.
fn cell(record: &Record, column: &str, permissions_field: Option<&str>) -> String {
    let text = if permissions_field == Some(column) {
        summarize_field(record, column)
    } else {
        record.get_or_null(column).to_string()
    };
    truncate(&text, MAX_CELL_WIDTH)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Returns every field name on the page, sorted.
pub fn columns_of(view: &PageView<'_>) -> Vec<String> {
    let mut columns: Vec<String> = view
        .records()
        .iter()
        .flat_map(|record| record.fields().keys().cloned())
        .collect();
    columns.sort();
    columns.dedup();
    columns
}

/// The pagination footer, e.g. `Showing 11-12 of 12 (page 2 of 2)`.
pub fn footer(view: &PageView<'_>) -> String {
    let mut line = format!(
        "Showing {}-{} of {} (page {} of {})",
        view.first_index(),
        view.last_index(),
        view.filtered_count(),
        view.page(),
        view.total_pages()
    );
    if view.filtered_count() != view.total_count() {
        let _ = write!(line, ", {} total", view.total_count());
    }
    line
}

/// Renders a page as an aligned text table with a footer.
pub fn table(
    view: &PageView<'_>,
    columns: &[String],
    permissions_field: Option<&str>,
    is_selected: impl Fn(&Record) -> bool,
) -> String {
    let rows: Vec<Vec<String>> = view
        .records()
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| cell(record, column, permissions_field))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", column.to_uppercase(), width = *width))
        .collect();
    let _ = writeln!(out, "    {}", header.join("  ").trim_end());

    let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    let _ = writeln!(out, "    {}", "-".repeat(rule));

    for (record, row) in view.records().iter().zip(&rows) {
        let mark = if is_selected(record) { "[x]" } else { "[ ]" };
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(text, width)| format!("{:<width$}", text, width = *width))
            .collect();
        let _ = writeln!(out, "{} {}", mark, line.join("  ").trim_end());
    }

    if view.is_empty() {
        let _ = writeln!(out, "    (no records)");
    }

    let _ = writeln!(out);
    let _ = write!(out, "{}", footer(view));
    out
}

/// Renders each record's granted permissions, grouped by category.
pub fn permissions(
    records: &[&Record],
    name_field: &str,
    permissions_field: &str,
    rules: &CategoryRules,
) -> String {
    let mut out = String::new();
    for record in records {
        let name = record.get_or_null(name_field).to_string();
        let _ = writeln!(out, "{}: {}", name, summarize_field(record, permissions_field));

        // malformed data was already reported by summarize_field
        let Ok(set) = PermissionSet::from_record(record, permissions_field) else {
            continue;
        };
        for (category, names) in rules.group(&set).iter() {
            let _ = writeln!(out, "  {:<12} {}", category, names.join(", "));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_admin_lib::table::TableConfig;
    use crm_admin_lib::table::TabularDataController;

    fn table_of(count: i64) -> TabularDataController {
        let config = TableConfig::builder("id").build().unwrap();
        let records = (1..=count)
            .map(|i| Record::new().set("id", i).set("name", format!("User {i}")))
            .collect();
        TabularDataController::new(config, records)
    }

    #[test]
    fn test_footer_on_last_page() {
        let mut table = table_of(12);
        table.set_current_page(2);
        assert_eq!(footer(&table.view()), "Showing 11-12 of 12 (page 2 of 2)");
    }

    #[test]
    fn test_footer_mentions_total_when_filtered() {
        let config = TableConfig::builder("id").search_field("name").build().unwrap();
        let records = (1..=12i64)
            .map(|i| Record::new().set("id", i).set("name", format!("User {i}")))
            .collect();
        let mut table = TabularDataController::new(config, records);
        table.set_search_term("user 1");
        // User 1, 10, 11, 12
        assert_eq!(footer(&table.view()), "Showing 1-4 of 4 (page 1 of 1), 12 total");
    }

    #[test]
    fn test_table_marks_selection() {
        let mut table = table_of(2);
        table.toggle_select("2", true);
        let view = table.view();
        let columns = columns_of(&view);
        assert_eq!(columns, vec!["id".to_string(), "name".to_string()]);

        let text = super::table(&view, &columns, None, |r| {
            r.key("id").is_some_and(|id| table.is_selected(&id))
        });
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("ID"));
        assert!(lines[2].starts_with("[ ] 1"));
        assert!(lines[3].starts_with("[x] 2"));
    }

    #[test]
    fn test_truncate_long_cells() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
