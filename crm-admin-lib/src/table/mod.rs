//! Client-side tabular data engine.
//!
//! A screen instantiates one [`TabularDataController`] with a [`TableConfig`]
//! and the collection it fetched. The controller owns the view state (search
//! term, sort, page, page size, selection) and derives the page to render.
//!
//! The pure building blocks are exported too:
//!
//! - [`filter`] - case-insensitive substring search over configured fields
//! - [`sort`] - stable sort by one field
//! - [`paginate`] - slice out one 1-based page
//!
//! # Example
//!
//! ```
//! use crm_admin_lib::model::Record;
//! use crm_admin_lib::table::{TableConfig, TabularDataController};
//!
//! let config = TableConfig::builder("id")
//!     .search_fields(["name", "role"])
//!     .build()
//!     .unwrap();
//!
//! let users = (1..=12i64)
//!     .map(|i| Record::new().set("id", i).set("name", format!("User {i}")))
//!     .collect();
//!
//! let mut table = TabularDataController::new(config, users);
//! table.set_current_page(2);
//!
//! let view = table.view();
//! assert_eq!(view.total_pages(), 2);
//! assert_eq!(view.len(), 2);
//! ```

mod config;
mod controller;
mod ops;
mod page;
mod selection;
mod sort_state;

pub use config::*;
pub use controller::*;
pub use ops::*;
pub use page::PageView;
pub use selection::Selection;
pub use sort_state::*;
