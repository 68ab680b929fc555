//! Vote counts on an issue.

use serde_json::Value;

use crate::config::API_PATH;
use crate::error::JiraError;
use crate::field;
use crate::resources::Resource;
use crate::rest::RestClient;

/// The votes record of an issue.
#[derive(Clone, Debug)]
pub struct Votes {
    /// Canonical URL of this record.
    pub self_link: Option<String>,
    /// Server-assigned ID.
    pub id: Option<String>,
    /// Number of votes cast.
    pub votes: i64,
    /// Whether the requesting user has voted.
    pub has_voted: bool,
}

impl Votes {
    /// Retrieves the votes record of the given issue.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Request`] when the call fails and
    /// [`JiraError::MalformedPayload`] when the server answers with an empty
    /// body.
    pub async fn get(client: &RestClient, issue: &str) -> Result<Self, JiraError> {
        let body = client
            .get_object(&format!("{API_PATH}issue/{issue}/votes"))
            .await
            .map_err(|e| JiraError::request(format!("Failed to get votes for issue {issue}"), e))?
            .ok_or(JiraError::MalformedPayload)?;
        Ok(Self::deserialize(client, &body))
    }
}

impl Resource for Votes {
    fn deserialize(_client: &RestClient, json: &Value) -> Self {
        Self {
            self_link: field::get_string(json.get("self")),
            id: field::get_string(json.get("id")),
            votes: field::get_integer(json.get("votes")),
            has_voted: field::get_boolean(json.get("hasVoted")),
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn self_url(&self) -> Option<&str> {
        self.self_link.as_deref()
    }
}
