//! Issue types.

use std::fmt;

use serde_json::Value;

use crate::config::API_PATH;
use crate::error::JiraError;
use crate::field;
use crate::resources::Resource;
use crate::rest::RestClient;

/// An issue type, e.g. Bug or Task.
#[derive(Clone, Debug)]
pub struct IssueType {
    /// Canonical URL of this issue type.
    pub self_link: Option<String>,
    /// Server-assigned ID.
    pub id: Option<String>,
    /// Issue type description.
    pub description: Option<String>,
    /// URL of the type's icon.
    pub icon_url: Option<String>,
    /// Issue type name, e.g. `"Bug"`.
    pub name: Option<String>,
    /// Whether issues of this type are sub-tasks.
    pub subtask: bool,
    /// Raw field metadata, present when fetched with field expansion.
    pub fields: Option<Value>,
}

impl IssueType {
    /// Retrieves an issue type by its internal ID.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Request`] when the call fails and
    /// [`JiraError::MalformedPayload`] when the server answers with an empty
    /// body.
    pub async fn get(client: &RestClient, id: &str) -> Result<Self, JiraError> {
        let body = client
            .get_object(&format!("{API_PATH}issuetype/{id}"))
            .await
            .map_err(|e| JiraError::request(format!("Failed to retrieve issue type {id}"), e))?
            .ok_or(JiraError::MalformedPayload)?;
        Ok(Self::deserialize(client, &body))
    }
}

impl Resource for IssueType {
    fn deserialize(_client: &RestClient, json: &Value) -> Self {
        Self {
            self_link: field::get_string(json.get("self")),
            id: field::get_string(json.get("id")),
            description: field::get_string(json.get("description")),
            icon_url: field::get_string(json.get("iconUrl")),
            name: field::get_string(json.get("name")),
            subtask: field::get_boolean(json.get("subtask")),
            fields: json.get("fields").filter(|f| f.is_object()).cloned(),
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn self_url(&self) -> Option<&str> {
        self.self_link.as_deref()
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or_default())
    }
}
