//! Admin API operations

mod crud;
mod envelope;
mod execute;
mod form;
mod poll;

pub use envelope::*;
pub use form::*;
pub use poll::*;
