//! Transport-level error types.
//!
//! The transport distinguishes "could not reach the server"
//! ([`RestError::Network`]) from "the server rejected the request"
//! ([`RestError::Response`]) so callers can tell a connection failure apart
//! from an HTTP-level rejection without inspecting strings.

use std::collections::HashMap;

use thiserror::Error;

use crate::auth::AuthError;

/// An HTTP response with a status code of 300 or above.
///
/// Carries enough structured detail for a caller to branch on the status
/// code (404 vs 400, say) and to implement its own retry policy if desired.
/// The transport itself never retries.
#[derive(Debug, Error)]
#[error("{status} {reason}")]
pub struct ResponseError {
    /// The HTTP status code.
    pub status: u16,
    /// The reason phrase associated with the status code.
    pub reason: String,
    /// The raw response body, decoded as text.
    pub body: String,
    /// Response headers; a header may carry multiple values.
    pub headers: HashMap<String, Vec<String>>,
}

/// Error type for transport operations.
#[derive(Debug, Error)]
pub enum RestError {
    /// The server answered with a status code of 300 or above.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// A network or connection error; the server was never (fully) reached.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A successful response body was not valid JSON.
    #[error("Failed to decode response body as JSON")]
    Decode(#[from] serde_json::Error),

    /// A successful response body was valid JSON of the wrong shape.
    #[error("Expected a JSON {expected} in the response body")]
    UnexpectedJson {
        /// The JSON shape that was expected ("object" or "array").
        expected: &'static str,
    },

    /// The composed request URI was not syntactically valid.
    #[error("Invalid request URI '{uri}'")]
    UriSyntax {
        /// The string that failed to parse as a URI.
        uri: String,
        /// The underlying parse failure.
        #[source]
        source: url::ParseError,
    },

    /// A multipart attachment had no usable content.
    #[error("Missing content for the file {file_name}")]
    InvalidAttachment {
        /// Name of the offending attachment.
        file_name: String,
    },

    /// A multipart attachment's content could not be read.
    #[error("Failed to read attachment {file_name}")]
    AttachmentIo {
        /// Name of the offending attachment.
        file_name: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Lazy session establishment failed before the request could be sent.
    #[error(transparent)]
    Auth(#[from] AuthError),
}
