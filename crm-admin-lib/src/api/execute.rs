//! Request execution
//!
//! Every call goes through [`AdminClient::request`], which attaches the
//! bearer credential and hands back the status and raw body. Interpreting
//! the body is left to the envelope parsers.

use reqwest::Method;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;

use crate::AdminClient;
use crate::error::ApiError;
use crate::error::Error;

/// Status and body of a completed request.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

impl AdminClient {
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers
    }

    /// Sends one request and reads the whole body.
    ///
    /// The credential is checked before anything goes on the wire; a blank
    /// or expired token fails with [`Error::Auth`].
    pub(crate) async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<RawResponse, Error> {
        let token = self
            .inner
            .token_provider
            .get_token(&self.inner.base_url)
            .await?;
        token.ensure_usable()?;

        log::debug!("{} {}", method, url);

        let mut request = self
            .inner
            .http_client
            .request(method.clone(), url)
            .headers(self.default_headers())
            .bearer_auth(&token.access_token);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !(200..300).contains(&status) {
            log::warn!("{} {} failed with HTTP {}", method, url, status);
        }

        Ok(RawResponse { status, body })
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        match self.inner.timeout {
            Some(timeout) if err.is_timeout() => Error::Api(ApiError::Timeout(timeout)),
            _ => Error::Api(ApiError::from(err)),
        }
    }
}
