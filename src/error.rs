/// Library-level failures.
///
/// Request-level authorization failures (401/403/404) live in
/// [`crate::http::ApiError`]; this type covers configuration and
/// provider-call errors shared by the OAuth and guild clients.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A required setting is missing or unparseable.
    #[error("configuration error: {0}")]
    Config(String),
    /// The identity provider answered with a non-success status.
    #[error("{operation} returned {status}: {detail}")]
    Upstream {
        operation: &'static str,
        status: u16,
        detail: String,
    },
    /// Network-level failure talking to the provider (includes timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Checks an HTTP response status; returns the response on success or an
    /// [`Error::Upstream`] carrying the provider's error body.
    pub(crate) async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        Err(Error::Upstream {
            operation,
            status,
            detail,
        })
    }
}
