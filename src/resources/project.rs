//! Projects.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::config::API_PATH;
use crate::error::JiraError;
use crate::field;
use crate::resources::{Component, IssueType, Resource, User, Version};
use crate::rest::RestClient;

/// A JIRA project.
#[derive(Clone, Debug)]
pub struct Project {
    /// Canonical URL of this project.
    pub self_link: Option<String>,
    /// Server-assigned ID.
    pub id: Option<String>,
    /// Avatar URLs keyed by size.
    pub avatar_urls: Option<HashMap<String, String>>,
    /// Project key, e.g. `"PROJ"`.
    pub key: Option<String>,
    /// Project name.
    pub name: Option<String>,
    /// Project description.
    pub description: Option<String>,
    /// The project lead.
    pub lead: Option<User>,
    /// Default assignee policy, e.g. `"PROJECT_LEAD"`.
    pub assignee_type: Option<String>,
    /// Components defined in the project.
    pub components: Option<Vec<Component>>,
    /// Issue types available in the project.
    pub issue_types: Option<Vec<IssueType>>,
    /// Versions defined in the project.
    pub versions: Option<Vec<Version>>,
    /// Role names mapped to their URLs.
    pub roles: Option<HashMap<String, String>>,
    /// Project contact email.
    pub email: Option<String>,
}

impl Project {
    /// Retrieves a project by key.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Request`] when the call fails and
    /// [`JiraError::MalformedPayload`] when the server answers with an empty
    /// body.
    pub async fn get(client: &RestClient, key: &str) -> Result<Self, JiraError> {
        let body = client
            .get_object(&format!("{API_PATH}project/{key}"))
            .await
            .map_err(|e| JiraError::request(format!("Failed to retrieve project {key}"), e))?
            .ok_or(JiraError::MalformedPayload)?;
        Ok(Self::deserialize(client, &body))
    }

    /// Retrieves all projects visible to the requesting user.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Request`] when the call fails and
    /// [`JiraError::MalformedPayload`] when the server answers with an empty
    /// body.
    pub async fn get_all(client: &RestClient) -> Result<Vec<Self>, JiraError> {
        let body = client
            .get_array(&format!("{API_PATH}project"))
            .await
            .map_err(|e| JiraError::request("Failed to retrieve projects", e))?
            .ok_or(JiraError::MalformedPayload)?;
        Ok(field::get_resource_array(client, Some(&body)).unwrap_or_default())
    }
}

impl Resource for Project {
    fn deserialize(client: &RestClient, json: &Value) -> Self {
        Self {
            self_link: field::get_string(json.get("self")),
            id: field::get_string(json.get("id")),
            avatar_urls: field::get_map(json.get("avatarUrls")),
            key: field::get_string(json.get("key")),
            name: field::get_string(json.get("name")),
            description: field::get_string(json.get("description")),
            lead: field::get_resource(client, json.get("lead")),
            assignee_type: field::get_string(json.get("assigneeType")),
            components: field::get_resource_array(client, json.get("components")),
            // Older servers spell this key in all lowercase.
            issue_types: field::get_resource_array(
                client,
                json.get("issueTypes").or_else(|| json.get("issuetypes")),
            ),
            versions: field::get_resource_array(client, json.get("versions")),
            roles: field::get_map(json.get("roles")),
            email: field::get_string(json.get("email")),
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn self_url(&self) -> Option<&str> {
        self.self_link.as_deref()
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key.as_deref().unwrap_or_default())
    }
}
