//! CRM admin console library
//!
//! The data layer behind the admin console's list screens: a reusable
//! search/sort/paginate/select controller over fetched collections,
//! permission-map formatting, and a bearer-authenticated client for the
//! admin REST API.

pub mod api;
pub mod auth;
pub mod error;
pub mod model;
pub mod permissions;
pub mod screens;
pub mod table;

mod client;

pub use client::*;
