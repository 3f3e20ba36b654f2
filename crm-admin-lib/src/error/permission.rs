//! Permission data error types

/// Permission data could not be normalized.
///
/// The summary formatter recovers from this locally; it never reaches the UI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// The blob had an unexpected shape or was not valid JSON.
    #[error("Malformed permission data: {0}")]
    Malformed(String),
}

impl PermissionError {
    /// Creates a new malformed data error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}
