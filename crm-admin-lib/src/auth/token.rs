//! TokenProvider trait and AccessToken

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::error::AuthError;

/// The bearer credential obtained when the admin signed in.
#[derive(Clone)]
pub struct AccessToken {
    /// The bearer token sent with every API call.
    pub access_token: String,
    /// When the token expires, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a new access token with just the token string.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    /// Creates a new access token with expiration time.
    pub fn with_expiry(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Returns `true` if the token has expired.
    ///
    /// Returns `false` if expiration time is unknown.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }

    /// Returns `true` if there is no token at all.
    pub fn is_blank(&self) -> bool {
        self.access_token.trim().is_empty()
    }

    /// Checks that the token can be sent.
    pub fn ensure_usable(&self) -> Result<(), AuthError> {
        if self.is_blank() {
            return Err(AuthError::MissingCredential);
        }
        if let Some(exp) = self.expires_at.filter(|_| self.is_expired()) {
            return Err(AuthError::Expired {
                message: format!("token expired at {}", exp),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Supplies the bearer credential for each request.
///
/// The credential is an explicit value handed to the client builder; the
/// client never reads it from ambient state.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use crm_admin_lib::auth::{AccessToken, TokenProvider};
/// use crm_admin_lib::error::AuthError;
///
/// struct SessionStore {
///     token: std::sync::RwLock<Option<AccessToken>>,
/// }
///
/// #[async_trait]
/// impl TokenProvider for SessionStore {
///     async fn get_token(&self, _base_url: &str) -> Result<AccessToken, AuthError> {
///         self.token
///             .read()
///             .unwrap()
///             .clone()
///             .ok_or(AuthError::MissingCredential)
///     }
/// }
/// ```
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Gets the access token to use against `base_url`.
    async fn get_token(&self, base_url: &str) -> Result<AccessToken, AuthError>;
}

/// A token provider that always returns the same token.
///
/// # Example
///
/// ```
/// use crm_admin_lib::auth::StaticTokenProvider;
///
/// let provider = StaticTokenProvider::new("session-token");
/// ```
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    /// Creates a new static token provider with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(access_token),
        }
    }

    /// Creates a new static token provider from an existing AccessToken.
    pub fn from_token(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self, _base_url: &str) -> Result<AccessToken, AuthError> {
        self.token.ensure_usable()?;
        Ok(self.token.clone())
    }
}
