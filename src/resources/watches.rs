//! Watcher records on an issue.

use serde_json::Value;

use crate::config::API_PATH;
use crate::error::JiraError;
use crate::field;
use crate::resources::{Resource, User};
use crate::rest::RestClient;

/// The watches record of an issue.
#[derive(Clone, Debug)]
pub struct Watches {
    /// Canonical URL of this record.
    pub self_link: Option<String>,
    /// Server-assigned ID.
    pub id: Option<String>,
    /// Number of watchers.
    pub watch_count: i64,
    /// Whether the requesting user is watching.
    pub is_watching: bool,
    /// The watching users, when the server includes them.
    pub watchers: Option<Vec<User>>,
}

impl Watches {
    /// Retrieves the watches record of the given issue.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Request`] when the call fails and
    /// [`JiraError::MalformedPayload`] when the server answers with an empty
    /// body.
    pub async fn get(client: &RestClient, issue: &str) -> Result<Self, JiraError> {
        let body = client
            .get_object(&format!("{API_PATH}issue/{issue}/watchers"))
            .await
            .map_err(|e| {
                JiraError::request(format!("Failed to get watchers for issue {issue}"), e)
            })?
            .ok_or(JiraError::MalformedPayload)?;
        Ok(Self::deserialize(client, &body))
    }
}

impl Resource for Watches {
    fn deserialize(client: &RestClient, json: &Value) -> Self {
        Self {
            self_link: field::get_string(json.get("self")),
            id: field::get_string(json.get("id")),
            watch_count: field::get_integer(json.get("watchCount")),
            is_watching: field::get_boolean(json.get("isWatching")),
            watchers: field::get_resource_array(client, json.get("watchers")),
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn self_url(&self) -> Option<&str> {
        self.self_link.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseUrl;
    use serde_json::json;

    #[test]
    fn test_deserialize_with_watchers() {
        let client = RestClient::new(BaseUrl::new("http://localhost/").unwrap());
        let watches = Watches::deserialize(
            &client,
            &json!({
                "watchCount": 2,
                "isWatching": false,
                "watchers": [{ "name": "a" }, { "name": "b" }]
            }),
        );
        assert_eq!(watches.watch_count, 2);
        assert!(!watches.is_watching);
        assert_eq!(watches.watchers.unwrap().len(), 2);
    }

    #[test]
    fn test_deserialize_without_watchers() {
        let client = RestClient::new(BaseUrl::new("http://localhost/").unwrap());
        let watches = Watches::deserialize(&client, &json!({ "watchCount": 0 }));
        assert!(watches.watchers.is_none());
    }
}
