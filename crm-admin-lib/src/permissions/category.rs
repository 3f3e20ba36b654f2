//! Grouping permission names into display categories.

use super::PermissionSet;
use crate::model::fold_case;

/// Category for names that match no keyword.
pub const OTHER_CATEGORY: &str = "Other";

/// Ordered keyword -> category rules.
///
/// A permission name goes to the category of the first rule whose keyword
/// it contains (case-insensitive). Rule order is the priority order.
///
/// # Example
///
/// ```
/// use crm_admin_lib::permissions::CategoryRules;
///
/// let rules = CategoryRules::new()
///     .rule("lead", "Leads")
///     .rule("report", "Reports");
///
/// assert_eq!(rules.categorize("lead_reports_view"), "Leads");
/// assert_eq!(rules.categorize("billing_view"), "Other");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<(String, String)>,
}

impl CategoryRules {
    /// Creates an empty rule list; every name falls into [`OTHER_CATEGORY`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The keyword list the CRM console uses.
    pub fn crm_defaults() -> Self {
        Self::new()
            .rule("lead", "Leads")
            .rule("contact", "Contacts")
            .rule("opportunit", "Deals")
            .rule("deal", "Deals")
            .rule("account", "Accounts")
            .rule("user", "Users")
            .rule("role", "Roles")
            .rule("permission", "Permissions")
            .rule("report", "Reports")
            .rule("dashboard", "Dashboard")
            .rule("setting", "Settings")
    }

    /// Appends a rule with the lowest priority so far.
    pub fn rule(mut self, keyword: impl Into<String>, category: impl Into<String>) -> Self {
        let keyword: String = keyword.into();
        self.rules.push((fold_case(&keyword), category.into()));
        self
    }

    /// Returns the category for one permission name.
    pub fn categorize(&self, name: &str) -> &str {
        let name = fold_case(name);
        self.rules
            .iter()
            .find(|(keyword, _)| name.contains(keyword.as_str()))
            .map(|(_, category)| category.as_str())
            .unwrap_or(OTHER_CATEGORY)
    }

    /// Groups the granted names of `set` by category.
    pub fn group(&self, set: &PermissionSet) -> PermissionGroups {
        let mut groups = PermissionGroups::default();
        for name in set.granted() {
            groups.push(self.categorize(name), name);
        }
        groups
    }
}

/// Granted permission names per category, categories in order of first
/// appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionGroups {
    groups: Vec<(String, Vec<String>)>,
}

impl PermissionGroups {
    fn push(&mut self, category: &str, name: &str) {
        match self.groups.iter_mut().find(|(existing, _)| existing == category) {
            Some((_, names)) => names.push(name.to_string()),
            None => self
                .groups
                .push((category.to_string(), vec![name.to_string()])),
        }
    }

    /// Returns the names in `category`, if any were granted.
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(existing, _)| existing == category)
            .map(|(_, names)| names.as_slice())
    }

    /// Iterates over `(category, names)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(category, names)| (category.as_str(), names.as_slice()))
    }

    /// Returns the number of non-empty categories.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if nothing was grouped.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
