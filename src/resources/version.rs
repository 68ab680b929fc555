//! Project versions and version creation.

use std::fmt;

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::config::API_PATH;
use crate::error::JiraError;
use crate::field;
use crate::resources::Resource;
use crate::rest::RestClient;

/// A version of a project.
#[derive(Clone, Debug)]
pub struct Version {
    /// Canonical URL of this version.
    pub self_link: Option<String>,
    /// Server-assigned ID.
    pub id: Option<String>,
    /// Version name, e.g. `"1.0"`.
    pub name: Option<String>,
    /// Whether the version has been archived.
    pub archived: bool,
    /// Whether the version has been released.
    pub released: bool,
    /// Release date, as reported by the server.
    pub release_date: Option<String>,
    /// Version description.
    pub description: Option<String>,
}

impl Version {
    /// Retrieves a version by its internal ID.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Request`] when the call fails and
    /// [`JiraError::MalformedPayload`] when the server answers with an empty
    /// body.
    pub async fn get(client: &RestClient, id: &str) -> Result<Self, JiraError> {
        let body = client
            .get_object(&format!("{API_PATH}version/{id}"))
            .await
            .map_err(|e| JiraError::request(format!("Failed to retrieve version {id}"), e))?
            .ok_or(JiraError::MalformedPayload)?;
        Ok(Self::deserialize(client, &body))
    }

    /// Starts building a new version in the given project.
    #[must_use]
    pub fn create(
        client: &RestClient,
        project: impl Into<String>,
        name: impl Into<String>,
    ) -> CreateVersion {
        CreateVersion::new(client, project, name)
    }
}

impl Resource for Version {
    fn deserialize(_client: &RestClient, json: &Value) -> Self {
        Self {
            self_link: field::get_string(json.get("self")),
            id: field::get_string(json.get("id")),
            name: field::get_string(json.get("name")),
            archived: field::get_boolean(json.get("archived")),
            released: field::get_boolean(json.get("released")),
            release_date: field::get_string(json.get("releaseDate")),
            description: field::get_string(json.get("description")),
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn self_url(&self) -> Option<&str> {
        self.self_link.as_deref()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or_default())
    }
}

/// Builder for a new project version.
///
/// Every setter consumes and returns the builder; nothing is sent until
/// [`execute`](Self::execute).
///
/// # Example
///
/// ```rust,ignore
/// let version = Version::create(&client, "PROJ", "1.1")
///     .description("Bugfix release")
///     .release_date(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap())
///     .execute()
///     .await?;
/// ```
#[derive(Clone, Debug)]
#[must_use = "nothing is sent until execute() is called"]
pub struct CreateVersion {
    client: RestClient,
    project: String,
    name: String,
    description: Option<String>,
    archived: bool,
    released: bool,
    release_date: Option<NaiveDate>,
}

impl CreateVersion {
    fn new(client: &RestClient, project: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            project: project.into(),
            name: name.into(),
            description: None,
            archived: false,
            released: false,
            release_date: None,
        }
    }

    /// Sets the version description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the version as archived.
    pub const fn archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    /// Marks the version as released.
    pub const fn released(mut self, released: bool) -> Self {
        self.released = released;
        self
    }

    /// Sets the release date.
    pub const fn release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    fn payload(&self) -> Value {
        let mut payload = json!({
            "project": self.project,
            "name": self.name,
            "archived": self.archived,
            "released": self.released,
        });
        if let Some(description) = &self.description {
            payload["description"] = json!(description);
        }
        if let Some(date) = self.release_date {
            payload["releaseDate"] = json!(date.format("%Y-%m-%d").to_string());
        }
        payload
    }

    /// Creates the version on the server.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Request`] when the call fails and
    /// [`JiraError::MalformedPayload`] when the server answers with an empty
    /// body.
    pub async fn execute(self) -> Result<Version, JiraError> {
        let body = self
            .client
            .post(&format!("{API_PATH}version"), &self.payload())
            .await
            .map_err(|e| {
                JiraError::request(format!("Failed to create version {}", self.name), e)
            })?
            .ok_or(JiraError::MalformedPayload)?;
        Ok(Version::deserialize(&self.client, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseUrl;

    fn client() -> RestClient {
        RestClient::new(BaseUrl::new("http://localhost/").unwrap())
    }

    #[test]
    fn test_deserialize() {
        let version = Version::deserialize(
            &client(),
            &json!({
                "id": "10200",
                "name": "1.0",
                "archived": false,
                "released": true,
                "releaseDate": "2026-04-01"
            }),
        );
        assert_eq!(version.id(), Some("10200"));
        assert_eq!(version.to_string(), "1.0");
        assert!(version.released);
        assert_eq!(version.release_date.as_deref(), Some("2026-04-01"));
    }

    #[test]
    fn test_create_payload_minimal() {
        let builder = Version::create(&client(), "PROJ", "2.0");
        let payload = builder.payload();
        assert_eq!(payload["project"], "PROJ");
        assert_eq!(payload["name"], "2.0");
        assert_eq!(payload["archived"], false);
        assert!(payload.get("description").is_none());
        assert!(payload.get("releaseDate").is_none());
    }

    #[test]
    fn test_create_payload_full() {
        let builder = Version::create(&client(), "PROJ", "2.0")
            .description("Big release")
            .released(true)
            .release_date(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        let payload = builder.payload();
        assert_eq!(payload["description"], "Big release");
        assert_eq!(payload["released"], true);
        assert_eq!(payload["releaseDate"], "2026-09-01");
    }
}
