//! Sort state for a table view.

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Keep the collection's own order.
    #[default]
    None,
    /// Ascending order (A-Z, 0-9, oldest first).
    Ascending,
    /// Descending order (Z-A, 9-0, newest first).
    Descending,
}

/// Which field the view is sorted by, and in which direction.
///
/// Clicking a column header calls [`toggle`](Self::toggle): a new key starts
/// ascending, the same key flips between ascending and descending.
///
/// # Example
///
/// ```
/// use crm_admin_lib::table::{SortDirection, SortState};
///
/// let mut sort = SortState::default();
/// sort.toggle("name");
/// assert_eq!(sort.direction(), SortDirection::Ascending);
/// sort.toggle("name");
/// assert_eq!(sort.direction(), SortDirection::Descending);
/// sort.toggle("email");
/// assert_eq!(sort.key(), Some("email"));
/// assert_eq!(sort.direction(), SortDirection::Ascending);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    key: Option<String>,
    direction: SortDirection,
}

impl SortState {
    /// Returns the sort key, if sorting is active.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the current direction.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Returns `true` if a key and a direction are both set.
    pub fn is_active(&self) -> bool {
        self.key.is_some() && self.direction != SortDirection::None
    }

    /// Advances the sort cycle for `key`.
    pub fn toggle(&mut self, key: &str) {
        self.direction = match (self.key.as_deref(), self.direction) {
            (Some(current), SortDirection::Ascending) if current == key => {
                SortDirection::Descending
            }
            (Some(current), SortDirection::Descending) if current == key => {
                SortDirection::Ascending
            }
            _ => SortDirection::Ascending,
        };
        self.key = Some(key.to_string());
    }

    /// Sets key and direction directly. `SortDirection::None` clears the sort.
    pub fn set(&mut self, key: &str, direction: SortDirection) {
        if direction == SortDirection::None {
            self.clear();
        } else {
            self.key = Some(key.to_string());
            self.direction = direction;
        }
    }

    /// Returns to the collection's own order.
    pub fn clear(&mut self) {
        self.key = None;
        self.direction = SortDirection::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_from_none() {
        let mut sort = SortState::default();
        assert!(!sort.is_active());

        sort.toggle("role");
        assert_eq!(sort.direction(), SortDirection::Ascending);
        sort.toggle("role");
        assert_eq!(sort.direction(), SortDirection::Descending);
        sort.toggle("role");
        assert_eq!(sort.direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_new_key_resets_to_ascending() {
        let mut sort = SortState::default();
        sort.toggle("role");
        sort.toggle("role");
        sort.toggle("name");
        assert_eq!(sort.key(), Some("name"));
        assert_eq!(sort.direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_set_none_clears() {
        let mut sort = SortState::default();
        sort.set("name", SortDirection::Descending);
        assert!(sort.is_active());
        sort.set("name", SortDirection::None);
        assert_eq!(sort, SortState::default());
    }
}
