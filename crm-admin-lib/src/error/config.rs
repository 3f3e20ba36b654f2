//! Configuration error types

/// Raised when a controller is built from invalid configuration.
///
/// These are programming errors in the caller and are reported at construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Page sizes must be positive.
    #[error("Invalid configuration: page size must be positive, got {0}")]
    InvalidPageSize(i64),

    /// The identifier field name is empty.
    #[error("Invalid configuration: identifier field must not be empty")]
    MissingIdField,

    /// The default page size is not one of the offered choices.
    #[error("Invalid configuration: default page size {size} is not among the offered choices")]
    PageSizeNotOffered { size: usize },
}
