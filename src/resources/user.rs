//! The user resource.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::config::API_PATH;
use crate::error::JiraError;
use crate::field;
use crate::resources::Resource;
use crate::rest::RestClient;

/// A JIRA user account.
#[derive(Clone, Debug)]
pub struct User {
    /// Canonical URL of this user.
    pub self_link: Option<String>,
    /// Server-assigned ID.
    pub id: Option<String>,
    /// Whether the account is active.
    pub active: bool,
    /// Avatar URLs keyed by size (e.g. `"48x48"`).
    pub avatar_urls: Option<HashMap<String, String>>,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Email address, if the server exposes one.
    pub email: Option<String>,
    /// Account user name.
    pub name: Option<String>,
}

impl User {
    /// Retrieves a user by user name.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Request`] when the call fails and
    /// [`JiraError::MalformedPayload`] when the server answers with an empty
    /// body.
    pub async fn get(client: &RestClient, username: &str) -> Result<Self, JiraError> {
        let body = client
            .get_object_with_params(&format!("{API_PATH}user"), &[("username", username)])
            .await
            .map_err(|e| JiraError::request(format!("Failed to retrieve user {username}"), e))?
            .ok_or(JiraError::MalformedPayload)?;
        Ok(Self::deserialize(client, &body))
    }
}

impl Resource for User {
    fn deserialize(_client: &RestClient, json: &Value) -> Self {
        Self {
            self_link: field::get_string(json.get("self")),
            id: field::get_string(json.get("id")),
            active: field::get_boolean(json.get("active")),
            avatar_urls: field::get_map(json.get("avatarUrls")),
            display_name: field::get_string(json.get("displayName")),
            // Depending on the server version the address is exposed as
            // either "email" or "emailAddress".
            email: field::get_string(json.get("email"))
                .or_else(|| field::get_string(json.get("emailAddress"))),
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

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseUrl;
    use serde_json::json;

    fn client() -> RestClient {
        RestClient::new(BaseUrl::new("http://localhost/").unwrap())
    }

    #[test]
    fn test_deserialize_full_payload() {
        let user = User::deserialize(
            &client(),
            &json!({
                "self": "http://x/rest/api/2/user?username=bob",
                "name": "bob",
                "emailAddress": "bob@example.com",
                "displayName": "Bob Example",
                "active": true,
                "avatarUrls": { "48x48": "http://x/avatar/48.png" }
            }),
        );
        assert_eq!(user.name.as_deref(), Some("bob"));
        assert_eq!(user.email.as_deref(), Some("bob@example.com"));
        assert!(user.active);
        assert_eq!(user.avatar_urls.unwrap()["48x48"], "http://x/avatar/48.png");
    }

    #[test]
    fn test_email_field_takes_precedence() {
        let user = User::deserialize(
            &client(),
            &json!({ "email": "a@x", "emailAddress": "b@x" }),
        );
        assert_eq!(user.email.as_deref(), Some("a@x"));
    }

    #[test]
    fn test_deserialize_empty_payload() {
        let user = User::deserialize(&client(), &json!({}));
        assert!(user.name.is_none());
        assert!(!user.active);
        assert!(user.id().is_none());
        assert!(user.self_url().is_none());
    }

    #[test]
    fn test_display_uses_account_name() {
        let user = User::deserialize(&client(), &json!({ "name": "bob" }));
        assert_eq!(user.to_string(), "bob");
    }
}
