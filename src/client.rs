//! The top-level JIRA client.

use crate::auth::Credentials;
use crate::config::BaseUrl;
use crate::error::{ConfigError, JiraError};
use crate::resources::{CreateIssue, CreateVersion, Issue, Project, Version};
use crate::rest::RestClient;

/// Entry point for talking to a JIRA server.
///
/// Owns the [`RestClient`] and exposes the typed resource operations.
/// Everything here is a thin wrapper; the same calls are available as
/// associated functions on the resource types for code that works with a
/// bare [`RestClient`].
///
/// # Example
///
/// ```rust,ignore
/// use jira_api::{Credentials, Jira};
///
/// let jira = Jira::with_credentials(
///     "https://jira.example.com",
///     Credentials::session("bob", "secret"),
/// )?;
///
/// let issue = jira.issue("PROJ-1").await?;
/// println!("{}: {}", issue, issue.summary.as_deref().unwrap_or(""));
///
/// jira.logout().await?;
/// ```
#[derive(Clone, Debug)]
pub struct Jira {
    rest: RestClient,
}

impl Jira {
    /// Creates an anonymous client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the URL is not absolute.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            rest: RestClient::new(BaseUrl::new(url)?),
        })
    }

    /// Creates an authenticated client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the URL is not absolute.
    pub fn with_credentials(
        url: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            rest: RestClient::with_credentials(BaseUrl::new(url)?, credentials),
        })
    }

    /// Wraps an already-configured transport.
    #[must_use]
    pub const fn from_rest(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// Retrieves an issue by key.
    ///
    /// # Errors
    ///
    /// See [`Issue::get`].
    pub async fn issue(&self, key: &str) -> Result<Issue, JiraError> {
        Issue::get(&self.rest, key).await
    }

    /// Starts building a new issue.
    #[must_use]
    pub fn create_issue(
        &self,
        project: impl Into<String>,
        issue_type: impl Into<String>,
    ) -> CreateIssue {
        Issue::create(&self.rest, project, issue_type)
    }

    /// Retrieves a project by key.
    ///
    /// # Errors
    ///
    /// See [`Project::get`].
    pub async fn project(&self, key: &str) -> Result<Project, JiraError> {
        Project::get(&self.rest, key).await
    }

    /// Retrieves all visible projects.
    ///
    /// # Errors
    ///
    /// See [`Project::get_all`].
    pub async fn projects(&self) -> Result<Vec<Project>, JiraError> {
        Project::get_all(&self.rest).await
    }

    /// Starts building a new project version.
    #[must_use]
    pub fn create_version(
        &self,
        project: impl Into<String>,
        name: impl Into<String>,
    ) -> CreateVersion {
        Version::create(&self.rest, project, name)
    }

    /// Tears down the server-side session, if one was established.
    ///
    /// A no-op for anonymous and basic-auth clients.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Auth`] when the server rejects the logout.
    pub async fn logout(&self) -> Result<(), JiraError> {
        if let Some(credentials) = self.rest.credentials() {
            credentials.logout(&self.rest).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        assert!(matches!(
            Jira::new("not a url"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_accepts_absolute_url() {
        let jira = Jira::new("https://jira.example.com").unwrap();
        assert_eq!(jira.rest().base().as_ref(), "https://jira.example.com/");
    }

    #[tokio::test]
    async fn test_logout_without_credentials_is_a_noop() {
        let jira = Jira::new("https://jira.example.com").unwrap();
        assert!(jira.logout().await.is_ok());
    }
}
