//! Typed models

mod entity;
mod record;
mod record_serde;
mod value;

pub use entity::*;
pub use record::*;
pub use value::*;
