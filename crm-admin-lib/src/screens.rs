//! Screen presets
//!
//! Each console screen is the same table controller with a different
//! configuration. A [`Screen`] bundles that configuration: the collection it
//! shows, its identifier and searchable fields, the columns and form fields
//! it renders, and how it groups permissions.

use crate::error::ConfigError;
use crate::model::Entity;
use crate::model::Record;
use crate::permissions::CategoryRules;
use crate::table::TableConfig;
use crate::table::TabularDataController;

/// A console screen backed by one collection.
///
/// # Example
///
/// ```
/// use crm_admin_lib::model::Record;
/// use crm_admin_lib::screens::Screen;
///
/// let users = vec![Record::new().set("id", 1i64).set("role", "IT Admin")];
/// let mut table = Screen::Users.controller(users).unwrap();
/// table.set_search_term("admin");
/// assert_eq!(table.filtered_count(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// User management.
    Users,
    /// Pending account requests.
    AccountRequests,
    /// Roles and their permissions.
    Roles,
}

impl Screen {
    /// Every screen, in menu order.
    pub const ALL: [Screen; 3] = [Screen::Users, Screen::AccountRequests, Screen::Roles];

    /// Returns the screen showing `entity`, if there is one.
    pub fn for_entity(entity: &Entity) -> Option<Self> {
        match entity {
            Entity::Users => Some(Self::Users),
            Entity::AccountRequests => Some(Self::AccountRequests),
            Entity::Roles => Some(Self::Roles),
            Entity::Named(_) => None,
        }
    }

    /// Returns the collection this screen shows.
    pub fn entity(self) -> Entity {
        match self {
            Self::Users => Entity::Users,
            Self::AccountRequests => Entity::AccountRequests,
            Self::Roles => Entity::Roles,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::AccountRequests => "Account Requests",
            Self::Roles => "Roles",
        }
    }

    /// Returns the identifier field.
    pub fn id_field(self) -> &'static str {
        "id"
    }

    /// Returns the fields the search box matches against.
    pub fn search_fields(self) -> &'static [&'static str] {
        match self {
            Self::Users => &["name", "email", "role", "phone"],
            Self::AccountRequests => &["name", "email", "company", "status"],
            Self::Roles => &["name", "description"],
        }
    }

    /// Returns the columns shown in the table, in order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Users => &["id", "name", "email", "role", "phone", "status"],
            Self::AccountRequests => &["id", "name", "email", "company", "status", "created_at"],
            Self::Roles => &["id", "name", "permissions"],
        }
    }

    /// Returns the fields on the create and edit forms.
    pub fn form_fields(self) -> &'static [&'static str] {
        match self {
            Self::Users => &["name", "email", "password", "role", "phone"],
            Self::AccountRequests => &["name", "email", "company", "status"],
            Self::Roles => &["name", "description", "permissions"],
        }
    }

    /// Returns the field holding a permission map, if the screen shows one.
    pub fn permissions_field(self) -> Option<&'static str> {
        match self {
            Self::Roles => Some("permissions"),
            Self::Users | Self::AccountRequests => None,
        }
    }

    /// Returns the keyword rules used to group this screen's permissions.
    pub fn category_rules(self) -> CategoryRules {
        CategoryRules::crm_defaults()
    }

    /// Builds the table configuration for this screen.
    pub fn table_config(self) -> Result<TableConfig, ConfigError> {
        TableConfig::builder(self.id_field())
            .search_fields(self.search_fields().iter().copied())
            .build()
    }

    /// Creates a controller over `records` configured for this screen.
    pub fn controller(self, records: Vec<Record>) -> Result<TabularDataController, ConfigError> {
        Ok(TabularDataController::new(self.table_config()?, records))
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}
