//! Permission summaries for role and user screens.
//!
//! Permission data reaches the console as a JSON object of name -> bool, a
//! list of names, or either of those encoded in a string. [`PermissionSet`]
//! normalizes all of them once; [`summarize`] and [`CategoryRules`] turn a
//! set into display text.
//!
//! # Example
//!
//! ```
//! use crm_admin_lib::permissions::{CategoryRules, PermissionSet, summarize};
//! use serde_json::json;
//!
//! let set = PermissionSet::from_json(&json!({
//!     "leads_view": true,
//!     "leads_edit": false,
//!     "dashboard_view": true
//! }))
//! .unwrap();
//!
//! assert_eq!(summarize(&set), "leads_view, dashboard_view");
//!
//! let groups = CategoryRules::crm_defaults().group(&set);
//! assert_eq!(groups.get("Leads"), Some(&["leads_view".to_string()][..]));
//! ```

mod category;
mod normalize;
mod summary;

pub use category::*;
pub use normalize::PermissionSet;
pub use summary::*;
