//! Crate-level error types.
//!
//! This module contains the configuration error type and [`JiraError`], the
//! error surface of the resource layer. Transport-level errors live in
//! [`crate::rest::RestError`] and credential errors in
//! [`crate::auth::AuthError`]; `JiraError` wraps them with the context of the
//! operation that failed.

use thiserror::Error;

use crate::auth::AuthError;
use crate::rest::RestError;

/// Errors that can occur while configuring the client.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL could not be parsed as an absolute URL.
    #[error("Invalid base URL '{url}'. Expected an absolute URL such as 'https://jira.example.com/'.")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
        /// The underlying parse failure.
        #[source]
        source: url::ParseError,
    },
}

/// Error type for resource-layer operations.
///
/// Every typed resource call (`Issue::get`, `Project::get_all`, builder
/// `execute` methods, ...) returns this type. It carries the context of what
/// was being attempted plus the underlying transport or credential failure,
/// so callers can still branch on the original HTTP status code via
/// [`RestError::Response`].
///
/// # Example
///
/// ```rust,ignore
/// use jira_api::{JiraError, RestError};
///
/// match Issue::get(&client, "PROJ-1").await {
///     Ok(issue) => println!("{issue:?}"),
///     Err(JiraError::Request { source: RestError::Response(e), .. }) if e.status == 404 => {
///         println!("no such issue");
///     }
///     Err(e) => return Err(e.into()),
/// }
/// ```
#[derive(Debug, Error)]
pub enum JiraError {
    /// A transport call failed while performing the named operation.
    #[error("{context}")]
    Request {
        /// Description of the operation that failed.
        context: String,
        /// The underlying transport failure.
        #[source]
        source: RestError,
    },

    /// A successful HTTP call returned no body where a result was expected.
    #[error("JSON payload is malformed")]
    MalformedPayload,

    /// A create or update response was missing the keys the operation needs.
    #[error("Unexpected result on {operation}")]
    UnexpectedResult {
        /// The operation whose response was unusable.
        operation: &'static str,
    },

    /// A credential operation (login or logout) failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl JiraError {
    /// Wraps a transport failure with operation context.
    pub(crate) fn request(context: impl Into<String>, source: RestError) -> Self {
        Self::Request {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url_error_message() {
        let source = url::Url::parse("not a url").unwrap_err();
        let error = ConfigError::InvalidBaseUrl {
            url: "not a url".to_string(),
            source,
        };
        let message = error.to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("absolute URL"));
    }

    #[test]
    fn test_request_error_carries_context() {
        let error = JiraError::request(
            "Failed to retrieve issue PROJ-1",
            RestError::UnexpectedJson { expected: "object" },
        );
        assert_eq!(error.to_string(), "Failed to retrieve issue PROJ-1");
    }

    #[test]
    fn test_malformed_payload_message_matches_contract() {
        assert_eq!(
            JiraError::MalformedPayload.to_string(),
            "JSON payload is malformed"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        let _: &dyn std::error::Error = &JiraError::MalformedPayload;
        let _: &dyn std::error::Error = &JiraError::UnexpectedResult {
            operation: "create version",
        };
    }
}
