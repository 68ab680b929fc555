//! Base-URL handling and fixed API path segments.
//!
//! JIRA exposes several versioned REST namespaces under one server root.
//! The transport holds a validated [`BaseUrl`] for the root and resource
//! code prepends the namespace segment it needs.

use std::fmt;

use url::Url;

use crate::error::ConfigError;

/// Path segment of the core REST API, relative to the server root.
pub const API_PATH: &str = "rest/api/2/";

/// Path segment of the session authentication API.
pub const AUTH_PATH: &str = "rest/auth/1/";

/// A validated JIRA server base URL.
///
/// Construction parses the value as an absolute URL and normalizes it to end
/// with a trailing slash, so resource paths can be appended verbatim.
///
/// # Example
///
/// ```rust
/// use jira_api::BaseUrl;
///
/// let base = BaseUrl::new("https://jira.example.com").unwrap();
/// assert_eq!(base.as_ref(), "https://jira.example.com/");
///
/// assert!(BaseUrl::new("not a url").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the value is not an
    /// absolute URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = url.into();
        let trimmed = raw.trim();

        // A missing trailing slash would make Url swallow the last path
        // segment on join, so normalize before parsing.
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };

        let parsed = Url::parse(&normalized).map_err(|source| ConfigError::InvalidBaseUrl {
            url: raw.clone(),
            source,
        })?;

        if parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: raw,
                source: url::ParseError::RelativeUrlWithoutBase,
            });
        }

        Ok(Self(parsed))
    }

    /// Returns the underlying URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.0
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
