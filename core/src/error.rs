//! Error type for the Pet Friends client.
//!
//! # Design
//! Application failures (bad credentials, unknown pet) are never errors: they
//! come back as status codes and bodies. What remains is either produced
//! below this crate and forwarded untouched (`Transport`, `Io`), or a base URL
//! that cannot address the API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The base URL or a URL derived from it did not parse.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The base URL parsed but cannot have API paths appended to it.
    #[error("base URL cannot carry API paths: {0}")]
    InvalidBaseUrl(String),

    /// Connection, DNS, TLS, timeout or body-read failure from `ureq`.
    #[error(transparent)]
    Transport(#[from] ureq::Error),

    /// The photo file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
