//! Issue resolutions.

use std::fmt;

use serde_json::Value;

use crate::config::API_PATH;
use crate::error::JiraError;
use crate::field;
use crate::resources::Resource;
use crate::rest::RestClient;

/// A resolution applied to a closed issue.
#[derive(Clone, Debug)]
pub struct Resolution {
    /// Canonical URL of this resolution.
    pub self_link: Option<String>,
    /// Server-assigned ID.
    pub id: Option<String>,
    /// Resolution description.
    pub description: Option<String>,
    /// Resolution name, e.g. `"Fixed"`.
    pub name: Option<String>,
}

impl Resolution {
    /// Retrieves a resolution by its internal ID.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Request`] when the call fails and
    /// [`JiraError::MalformedPayload`] when the server answers with an empty
    /// body.
    pub async fn get(client: &RestClient, id: &str) -> Result<Self, JiraError> {
        let body = client
            .get_object(&format!("{API_PATH}resolution/{id}"))
            .await
            .map_err(|e| JiraError::request(format!("Failed to retrieve resolution {id}"), e))?
            .ok_or(JiraError::MalformedPayload)?;
        Ok(Self::deserialize(client, &body))
    }
}

impl Resource for Resolution {
    fn deserialize(_client: &RestClient, json: &Value) -> Self {
        Self {
            self_link: field::get_string(json.get("self")),
            id: field::get_string(json.get("id")),
            description: field::get_string(json.get("description")),
            name: field::get_string(json.get("name")),
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn self_url(&self) -> Option<&str> {
        self.self_link.as_deref()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or_default())
    }
}
