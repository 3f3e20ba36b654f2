//! Main AdminClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::auth::TokenProvider;
use crate::error::ApiError;

/// Client for the console's REST API.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks, e.g. with a [`CollectionPoller`](crate::api::CollectionPoller).
///
/// # Example
///
/// ```ignore
/// use crm_admin_lib::{AdminClient, auth::StaticTokenProvider, model::Entity};
///
/// let client = AdminClient::builder()
///     .url("https://crm.example.com/api")
///     .token_provider(StaticTokenProvider::new(session_token))
///     .build()?;
///
/// let users = client.fetch(&Entity::Users).await?;
/// ```
#[derive(Clone)]
pub struct AdminClient {
    pub(crate) inner: Arc<AdminClientInner>,
}

pub(crate) struct AdminClientInner {
    pub(crate) base_url: String,
    pub(crate) token_provider: Arc<dyn TokenProvider>,
    pub(crate) http_client: Client,
    pub(crate) timeout: Option<Duration>,
}

impl AdminClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> AdminClientBuilder<Missing, Missing> {
        AdminClientBuilder::new()
    }

    /// Returns the base URL of the API.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the URL for a path below the base URL.
    pub(crate) fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`AdminClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The API base URL
/// - `token_provider` - A [`TokenProvider`] supplying the bearer credential
///
/// # Example
///
/// ```ignore
/// let client = AdminClient::builder()
///     .url("https://crm.example.com/api")
///     .token_provider(provider)
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct AdminClientBuilder<Url, Provider> {
    url: Url,
    token_provider: Provider,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl AdminClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for AdminClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> AdminClientBuilder<Missing, P> {
    /// Sets the API base URL, e.g. `https://crm.example.com/api`.
    pub fn url(self, url: impl Into<String>) -> AdminClientBuilder<Set<String>, P> {
        AdminClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> AdminClientBuilder<U, Missing> {
    /// Sets the token provider for authentication.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> AdminClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        AdminClientBuilder {
            url: self.url,
            token_provider: Set(Arc::new(provider) as Arc<dyn TokenProvider>),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, P> AdminClientBuilder<U, P> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl AdminClientBuilder<Set<String>, Set<Arc<dyn TokenProvider>>> {
    /// Builds the [`AdminClient`].
    ///
    /// Fails with [`ApiError::InvalidUrl`] when the base URL is not an
    /// absolute http(s) URL.
    pub fn build(self) -> Result<AdminClient, ApiError> {
        let base_url = self.url.0;
        let parsed =
            url::Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                base_url,
                parsed.scheme()
            )));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(AdminClient {
            inner: Arc::new(AdminClientInner {
                base_url,
                token_provider: self.token_provider.0,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;

    #[test]
    fn test_build_url_joins_segments() {
        let client = AdminClient::builder()
            .url("http://localhost:8080/api/")
            .token_provider(StaticTokenProvider::new("t"))
            .build()
            .unwrap();
        assert_eq!(client.build_url("/users"), "http://localhost:8080/api/users");
        assert_eq!(client.build_url("users/7"), "http://localhost:8080/api/users/7");
    }

    #[test]
    fn test_build_rejects_bad_url() {
        let result = AdminClient::builder()
            .url("not a url")
            .token_provider(StaticTokenProvider::new("t"))
            .build();
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));

        let result = AdminClient::builder()
            .url("ftp://example.com")
            .token_provider(StaticTokenProvider::new("t"))
            .build();
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
