//! Entity collections exposed by the admin API

/// A collection the admin API serves.
///
/// The name is both the REST path segment (`GET {base}/users`) and the key
/// the collection arrives under in the response envelope
/// (`{ "users": [...] }`).
///
/// # Examples
///
/// ```
/// use crm_admin_lib::model::Entity;
///
/// assert_eq!(Entity::Users.name(), "users");
/// assert_eq!(Entity::named("teams").name(), "teams");
/// assert_eq!("requests".parse::<Entity>().unwrap(), Entity::AccountRequests);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entity {
    /// User accounts.
    Users,
    /// Pending account requests awaiting approval.
    AccountRequests,
    /// Roles and their permission maps.
    Roles,
    /// Any other collection, addressed by name.
    Named(String),
}

impl Entity {
    /// Creates an entity from an arbitrary collection name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.as_str() {
            "users" => Self::Users,
            "requests" => Self::AccountRequests,
            "roles" => Self::Roles,
            _ => Self::Named(name),
        }
    }

    /// Returns the collection name.
    pub fn name(&self) -> &str {
        match self {
            Self::Users => "users",
            Self::AccountRequests => "requests",
            Self::Roles => "roles",
            Self::Named(name) => name,
        }
    }
}

impl std::str::FromStr for Entity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::named(s))
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
