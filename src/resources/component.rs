//! Project components.

use std::fmt;

use serde_json::Value;

use crate::config::API_PATH;
use crate::error::JiraError;
use crate::field;
use crate::resources::Resource;
use crate::rest::RestClient;

/// A component of a project.
#[derive(Clone, Debug)]
pub struct Component {
    /// Canonical URL of this component.
    pub self_link: Option<String>,
    /// Server-assigned ID.
    pub id: Option<String>,
    /// Component name.
    pub name: Option<String>,
    /// Component description.
    pub description: Option<String>,
    /// Whether the default assignee setting is valid.
    pub is_assignee_type_valid: bool,
}

impl Component {
    /// Retrieves a component by its internal ID.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Request`] when the call fails and
    /// [`JiraError::MalformedPayload`] when the server answers with an empty
    /// body.
    pub async fn get(client: &RestClient, id: &str) -> Result<Self, JiraError> {
        let body = client
            .get_object(&format!("{API_PATH}component/{id}"))
            .await
            .map_err(|e| JiraError::request(format!("Failed to retrieve component {id}"), e))?
            .ok_or(JiraError::MalformedPayload)?;
        Ok(Self::deserialize(client, &body))
    }
}

impl Resource for Component {
    fn deserialize(_client: &RestClient, json: &Value) -> Self {
        Self {
            self_link: field::get_string(json.get("self")),
            id: field::get_string(json.get("id")),
            name: field::get_string(json.get("name")),
            description: field::get_string(json.get("description")),
            is_assignee_type_valid: field::get_boolean(json.get("isAssigneeTypeValid")),
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn self_url(&self) -> Option<&str> {
        self.self_link.as_deref()
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or_default())
    }
}
