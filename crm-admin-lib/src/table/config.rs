//! Table configuration

use std::num::NonZeroUsize;

use crate::error::ConfigError;

/// Page sizes offered when a screen doesn't choose its own.
pub const DEFAULT_PAGE_SIZES: [i64; 5] = [5, 10, 20, 50, 100];

/// A positive number of rows per page.
///
/// Non-positive sizes are rejected here so they can never reach a controller.
///
/// # Example
///
/// ```
/// use crm_admin_lib::table::PageSize;
///
/// assert_eq!(PageSize::new(20).unwrap().get(), 20);
/// assert!(PageSize::new(0).is_err());
/// assert!(PageSize::new(-5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    /// Ten rows, the size every screen starts with unless configured.
    pub const DEFAULT: PageSize = PageSize(NonZeroUsize::new(10).unwrap());

    /// Creates a page size, failing with [`ConfigError::InvalidPageSize`] when `size <= 0`.
    pub fn new(size: i64) -> Result<Self, ConfigError> {
        usize::try_from(size)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self)
            .ok_or(ConfigError::InvalidPageSize(size))
    }

    /// Returns the number of rows.
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for PageSize {
    type Error = ConfigError;

    fn try_from(size: i64) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-screen configuration for a [`TabularDataController`](super::TabularDataController).
///
/// Built with [`TableConfig::builder`]; validation happens in
/// [`TableConfigBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    id_field: String,
    search_fields: Vec<String>,
    page_sizes: Vec<PageSize>,
    default_page_size: PageSize,
}

impl TableConfig {
    /// Starts a configuration whose records are identified by `id_field`.
    pub fn builder(id_field: impl Into<String>) -> TableConfigBuilder {
        TableConfigBuilder::new(id_field)
    }

    /// Returns the identifier field name.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Returns the fields the search term is matched against.
    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    /// Returns the page sizes offered to the user, ascending.
    pub fn page_sizes(&self) -> &[PageSize] {
        &self.page_sizes
    }

    /// Returns the page size a fresh view starts with.
    pub fn default_page_size(&self) -> PageSize {
        self.default_page_size
    }
}

/// Builder for [`TableConfig`].
///
/// # Example
///
/// ```
/// use crm_admin_lib::table::TableConfig;
///
/// let config = TableConfig::builder("id")
///     .search_fields(["name", "email", "role"])
///     .page_sizes([10, 25, 50])
///     .default_page_size(25)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.default_page_size().get(), 25);
/// ```
#[derive(Debug, Clone)]
pub struct TableConfigBuilder {
    id_field: String,
    search_fields: Vec<String>,
    page_sizes: Vec<i64>,
    default_page_size: i64,
}

impl TableConfigBuilder {
    fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
            search_fields: Vec::new(),
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            default_page_size: PageSize::DEFAULT.get() as i64,
        }
    }

    /// Adds one searchable field.
    pub fn search_field(mut self, field: impl Into<String>) -> Self {
        self.search_fields.push(field.into());
        self
    }

    /// Adds several searchable fields.
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Replaces the offered page sizes.
    pub fn page_sizes(mut self, sizes: impl IntoIterator<Item = i64>) -> Self {
        self.page_sizes = sizes.into_iter().collect();
        self
    }

    /// Sets the initial page size.
    pub fn default_page_size(mut self, size: i64) -> Self {
        self.default_page_size = size;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// Fails when the identifier field is blank, when any page size is not
    /// positive, or when the default page size is not among the offered ones.
    /// An empty list of offered sizes offers just the default.
    pub fn build(self) -> Result<TableConfig, ConfigError> {
        if self.id_field.trim().is_empty() {
            return Err(ConfigError::MissingIdField);
        }

        let default_page_size = PageSize::new(self.default_page_size)?;

        let mut page_sizes = self
            .page_sizes
            .into_iter()
            .map(PageSize::new)
            .collect::<Result<Vec<_>, _>>()?;
        page_sizes.sort();
        page_sizes.dedup();

        if page_sizes.is_empty() {
            page_sizes.push(default_page_size);
        } else if !page_sizes.contains(&default_page_size) {
            return Err(ConfigError::PageSizeNotOffered {
                size: default_page_size.get(),
            });
        }

        Ok(TableConfig {
            id_field: self.id_field,
            search_fields: self.search_fields,
            page_sizes,
            default_page_size,
        })
    }
}
