//! Error types

mod api;
mod auth;
mod config;
mod field;
mod permission;
mod validation;

pub use api::*;
pub use auth::*;
pub use config::*;
pub use field::*;
pub use permission::*;
pub use validation::*;

/// Top-level error for operations that cross more than one concern.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API returned an error or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No usable bearer credential.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A controller or client was built from invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns the API error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}
