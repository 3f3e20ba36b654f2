//! TabularDataController

use crate::model::Record;

use super::PageSize;
use super::PageView;
use super::Selection;
use super::SortDirection;
use super::SortState;
use super::TableConfig;
use super::clamp_page;
use super::filter;
use super::paginate;
use super::sort;
use super::total_pages;

/// The ephemeral state behind one table view.
///
/// Created with defaults (empty search, no sort, page 1, the configured page
/// size, nothing selected) and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    search_term: String,
    sort: SortState,
    current_page: usize,
    page_size: PageSize,
    selection: Selection,
}

impl ViewState {
    fn new(page_size: PageSize) -> Self {
        Self {
            search_term: String::new(),
            sort: SortState::default(),
            current_page: 1,
            page_size,
            selection: Selection::default(),
        }
    }

    /// Returns the search term, verbatim.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Returns the sort state.
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Returns the 1-based current page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Returns the page size.
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Returns the selected identifiers.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }
}

/// Search, sort, paginate and bulk-select over one screen's collection.
///
/// The controller owns the fetched collection but never reorders or edits
/// it; every view is derived from scratch. All operations are infallible:
/// out-of-range pages clamp, and invalid page sizes can't be constructed.
///
/// Invariants:
/// - the current page is always in `[1, total_pages()]`
/// - changing the search term or page size returns to page 1
/// - the selection only ever receives identifiers read from the collection
///
/// # Example
///
/// ```
/// use crm_admin_lib::model::Record;
/// use crm_admin_lib::table::{TableConfig, TabularDataController};
///
/// let config = TableConfig::builder("id").search_field("role").build().unwrap();
/// let users = vec![
///     Record::new().set("id", 1i64).set("role", "IT Admin"),
///     Record::new().set("id", 2i64).set("role", "Agent"),
/// ];
///
/// let mut table = TabularDataController::new(config, users);
/// table.set_search_term("admin");
/// table.select_all_visible(true);
///
/// assert_eq!(table.filtered_count(), 1);
/// assert!(table.is_selected("1"));
/// assert!(table.is_all_visible_selected());
/// ```
#[derive(Debug, Clone)]
pub struct TabularDataController {
    config: TableConfig,
    records: Vec<Record>,
    state: ViewState,
}

impl TabularDataController {
    /// Creates a controller over `records` with a fresh view state.
    pub fn new(config: TableConfig, records: Vec<Record>) -> Self {
        let state = ViewState::new(config.default_page_size());
        Self {
            config,
            records,
            state,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the collection, in the order it was supplied.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Replaces the collection wholesale, e.g. after a refresh.
    ///
    /// Search, sort and selection are kept; the current page is re-clamped.
    /// Selected identifiers that no longer exist are left in place.
    pub fn replace_collection(&mut self, records: Vec<Record>) {
        self.records = records;
        let total = self.total_pages();
        if self.state.current_page > total {
            log::debug!(
                "collection shrank, clamping page {} to {}",
                self.state.current_page,
                total
            );
            self.state.current_page = total;
        }
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Stores the search term verbatim and returns to page 1.
    ///
    /// An empty term disables filtering.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
        self.state.current_page = 1;
        log::debug!("search term set to {:?}", self.state.search_term);
    }

    // =========================================================================
    // Sort
    // =========================================================================

    /// Advances the sort cycle for `key` (a column header click).
    pub fn toggle_sort(&mut self, key: &str) -> &SortState {
        self.state.sort.toggle(key);
        log::debug!(
            "sort on {:?} now {:?}",
            self.state.sort.key(),
            self.state.sort.direction()
        );
        &self.state.sort
    }

    /// Sets the sort directly.
    pub fn set_sort(&mut self, key: &str, direction: SortDirection) {
        self.state.sort.set(key, direction);
    }

    /// Returns to the collection's own order.
    pub fn clear_sort(&mut self) {
        self.state.sort.clear();
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Moves to `page`, clamped to `[1, total_pages()]`. Returns the page
    /// actually selected.
    pub fn set_current_page(&mut self, page: i64) -> usize {
        self.state.current_page = clamp_page(page, self.total_pages());
        self.state.current_page
    }

    /// Moves one page forward, staying on the last page.
    pub fn next_page(&mut self) -> usize {
        let next = self.state.current_page.saturating_add(1);
        self.set_current_page(i64::try_from(next).unwrap_or(i64::MAX))
    }

    /// Moves one page back, staying on the first page.
    pub fn previous_page(&mut self) -> usize {
        let previous = self.state.current_page.saturating_sub(1);
        self.set_current_page(i64::try_from(previous).unwrap_or(1))
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.state.page_size = size;
        self.state.current_page = 1;
        log::debug!("page size set to {}", size);
    }

    /// Returns the 1-based current page.
    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    /// Returns the number of records that pass the search.
    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    /// Returns `max(1, ceil(filtered_count / page_size))`.
    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_count(), self.state.page_size)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Adds or removes one identifier.
    pub fn toggle_select(&mut self, id: impl Into<String>, selected: bool) {
        self.state.selection.set(id, selected);
    }

    /// Selects exactly the records on the current page, or clears the
    /// selection.
    ///
    /// Selection is scoped to the visible page, not the whole filtered set.
    pub fn select_all_visible(&mut self, selected: bool) {
        if selected {
            let keys = self.visible_keys();
            self.state.selection.replace(keys);
        } else {
            self.state.selection.clear();
        }
    }

    /// Returns `true` if the current page is non-empty and every record on
    /// it is selected.
    pub fn is_all_visible_selected(&self) -> bool {
        let visible = self.visible_records();
        !visible.is_empty()
            && visible.iter().all(|record| {
                record
                    .key(self.config.id_field())
                    .is_some_and(|key| self.state.selection.is_selected(&key))
            })
    }

    /// Returns `true` if `id` is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.state.selection.is_selected(id)
    }

    /// Returns the selection.
    pub fn selection(&self) -> &Selection {
        &self.state.selection
    }

    /// Deselects everything.
    pub fn clear_selection(&mut self) {
        self.state.selection.clear();
    }

    // =========================================================================
    // Derived view
    // =========================================================================

    /// Returns the records on the current page.
    pub fn visible_records(&self) -> Vec<&Record> {
        self.view().into_records()
    }

    /// Derives the current page and its pagination counts.
    pub fn view(&self) -> PageView<'_> {
        let rows = self.filtered();
        let filtered_count = rows.len();
        let total_pages = total_pages(filtered_count, self.state.page_size);
        let page = self.state.current_page.min(total_pages);
        let records = paginate(&rows, page, self.state.page_size).to_vec();

        PageView::new(
            records,
            page,
            total_pages,
            filtered_count,
            self.records.len(),
            self.state.page_size,
        )
    }

    fn filtered(&self) -> Vec<&Record> {
        let rows = filter(
            &self.records,
            &self.state.search_term,
            self.config.search_fields(),
        );
        match self.state.sort.key() {
            Some(key) => sort(rows, key, self.state.sort.direction()),
            None => rows,
        }
    }

    fn visible_keys(&self) -> Vec<String> {
        let id_field = self.config.id_field();
        self.visible_records()
            .into_iter()
            .filter_map(|record| record.key(id_field))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(count: i64, page_size: i64) -> TabularDataController {
        let config = TableConfig::builder("id")
            .search_fields(["name"])
            .page_sizes([page_size])
            .default_page_size(page_size)
            .build()
            .unwrap();
        let records = (1..=count)
            .map(|i| Record::new().set("id", i).set("name", format!("User {i}")))
            .collect();
        TabularDataController::new(config, records)
    }

    #[test]
    fn test_fresh_state_defaults() {
        let table = controller(3, 10);
        assert_eq!(table.state().search_term(), "");
        assert!(!table.state().sort().is_active());
        assert_eq!(table.current_page(), 1);
        assert!(table.selection().is_empty());
    }

    #[test]
    fn test_search_resets_page() {
        let mut table = controller(30, 10);
        table.set_current_page(3);
        table.set_search_term("user");
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_page_size_resets_page() {
        let mut table = controller(30, 10);
        table.set_current_page(2);
        table.set_page_size(PageSize::new(5).unwrap());
        assert_eq!(table.current_page(), 1);
        assert_eq!(table.total_pages(), 6);
    }

    #[test]
    fn test_next_and_previous_stay_in_range() {
        let mut table = controller(12, 10);
        assert_eq!(table.previous_page(), 1);
        assert_eq!(table.next_page(), 2);
        assert_eq!(table.next_page(), 2);
    }

    #[test]
    fn test_replace_collection_clamps_page() {
        let mut table = controller(30, 10);
        table.set_current_page(3);
        table.toggle_select("25", true);

        let fewer = (1..=12i64).map(|i| Record::new().set("id", i)).collect();
        table.replace_collection(fewer);

        assert_eq!(table.current_page(), 2);
        // stale identifiers survive a refresh
        assert!(table.is_selected("25"));
    }

    #[test]
    fn test_sort_descending_by_id() {
        let mut table = controller(12, 10);
        table.toggle_sort("id");
        table.toggle_sort("id");
        let first = table.visible_records()[0].get_int("id").unwrap();
        assert_eq!(first, Some(12));
    }

    #[test]
    fn test_is_all_visible_selected_false_on_empty_page() {
        let mut table = controller(3, 10);
        table.set_search_term("nobody");
        table.select_all_visible(true);
        assert!(table.selection().is_empty());
        assert!(!table.is_all_visible_selected());
    }

    #[test]
    fn test_toggle_select_then_deselect() {
        let mut table = controller(3, 10);
        table.toggle_select("1", true);
        table.toggle_select("2", true);
        table.toggle_select("3", true);
        assert!(table.is_all_visible_selected());

        table.toggle_select("2", false);
        assert!(!table.is_all_visible_selected());
        assert_eq!(table.selection().len(), 2);
    }

    #[test]
    fn test_select_all_false_clears() {
        let mut table = controller(3, 10);
        table.select_all_visible(true);
        assert_eq!(table.selection().len(), 3);
        table.select_all_visible(false);
        assert!(table.selection().is_empty());
    }
}
