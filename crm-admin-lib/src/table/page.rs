//! The rendered page of a table view.

use crate::model::Record;

use super::PageSize;

/// One page of a filtered, sorted collection plus the counts a pagination
/// bar needs.
///
/// # Example
///
/// ```ignore
/// let view = table.view();
/// println!(
///     "Showing {}-{} of {} (page {} of {})",
///     view.first_index(),
///     view.last_index(),
///     view.filtered_count(),
///     view.page(),
///     view.total_pages(),
/// );
/// for record in view.records() {
///     println!("{:?}", record.get_string("name"));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    records: Vec<&'a Record>,
    page: usize,
    total_pages: usize,
    filtered_count: usize,
    total_count: usize,
    page_size: PageSize,
}

impl<'a> PageView<'a> {
    pub(crate) fn new(
        records: Vec<&'a Record>,
        page: usize,
        total_pages: usize,
        filtered_count: usize,
        total_count: usize,
        page_size: PageSize,
    ) -> Self {
        Self {
            records,
            page,
            total_pages,
            filtered_count,
            total_count,
            page_size,
        }
    }

    /// Returns the records on this page.
    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    /// Consumes the view and returns the records.
    pub fn into_records(self) -> Vec<&'a Record> {
        self.records
    }

    /// Returns the 1-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the number of pages, at least 1.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Returns the number of records that passed the search.
    pub fn filtered_count(&self) -> usize {
        self.filtered_count
    }

    /// Returns the size of the whole collection.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns the page size in effect.
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records on this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Returns `true` if an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// 1-based position of the first record on this page within the
    /// filtered set, or 0 when the page is empty.
    pub fn first_index(&self) -> usize {
        if self.records.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size.get() + 1
        }
    }

    /// 1-based position of the last record on this page, or 0 when empty.
    pub fn last_index(&self) -> usize {
        if self.records.is_empty() {
            0
        } else {
            self.first_index() + self.records.len() - 1
        }
    }
}
