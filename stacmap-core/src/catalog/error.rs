/// Errors raised by the catalog client.
///
/// The client does not retry and does not cache: a transient failure on any
/// request (including one page in the middle of a paginated feed) surfaces
/// immediately to the caller.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// The request could not complete (DNS, connect, TLS, timeout, ...).
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// The catalog answered with a non-2xx status.
    #[error("Catalog request to {url} failed with HTTP {status}: {message}")]
    Http {
        /// HTTP status code of the response.
        status: u16,
        /// Status text or response body excerpt.
        message: String,
        /// The requested URL.
        url: String,
    },

    /// The response body did not match the expected shape.
    #[error("Unexpected response body from {1}: {0}")]
    UnexpectedBody(serde_json::Error, String),

    /// A URL (the configured base or a server-provided pagination link)
    /// could not be parsed.
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// The request `Origin` header value is not a valid header value.
    #[error("Invalid request origin '{0}'")]
    InvalidOrigin(String),
}

/// A convenience [`Result`] for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
