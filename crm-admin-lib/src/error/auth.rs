//! Credential error types

/// Errors raised before a request is sent because the session has no usable credential.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No bearer credential was supplied.
    #[error("No bearer credential available; sign in first")]
    MissingCredential,

    /// The credential has expired.
    #[error("Credential expired: {message}")]
    Expired { message: String },
}
