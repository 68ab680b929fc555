//! Issue comments.

use chrono::{DateTime, FixedOffset};
use serde_json::{json, Value};

use crate::config::API_PATH;
use crate::error::JiraError;
use crate::field;
use crate::resources::{Resource, User, Visibility};
use crate::rest::RestClient;

/// A comment on an issue.
///
/// Comments obtained through [`Issue`](crate::resources::Issue) know which
/// issue they belong to and support [`update`](Self::update); a comment
/// built from a bare payload does not.
#[derive(Clone, Debug)]
pub struct Comment {
    client: RestClient,
    issue_key: Option<String>,
    /// Canonical URL of this comment.
    pub self_link: Option<String>,
    /// Server-assigned ID.
    pub id: Option<String>,
    /// The comment's author.
    pub author: Option<User>,
    /// The comment text.
    pub body: Option<String>,
    /// Creation timestamp.
    pub created: Option<DateTime<FixedOffset>>,
    /// Last-update timestamp.
    pub updated: Option<DateTime<FixedOffset>>,
    /// The user who last updated the comment.
    pub updated_author: Option<User>,
    /// Visibility restriction, if any.
    pub visibility: Option<Visibility>,
}

impl Comment {
    /// Builds a comment that knows its owning issue, enabling
    /// [`update`](Self::update).
    pub(crate) fn for_issue(client: &RestClient, json: &Value, issue_key: &str) -> Self {
        let mut comment = Self::deserialize(client, json);
        comment.issue_key = Some(issue_key.to_string());
        comment
    }

    /// Replaces the comment body on the server.
    ///
    /// Returns the updated comment as the server echoed it back.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::UnexpectedResult`] when the comment does not
    /// know its issue or has no ID, [`JiraError::Request`] when the call
    /// fails, and [`JiraError::MalformedPayload`] when the server answers
    /// with an empty body.
    pub async fn update(&self, body: &str) -> Result<Self, JiraError> {
        self.update_with_visibility(body, None).await
    }

    /// Replaces the comment body and visibility restriction on the server.
    ///
    /// # Errors
    ///
    /// See [`Self::update`].
    pub async fn update_with_visibility(
        &self,
        body: &str,
        visibility: Option<(&str, &str)>,
    ) -> Result<Self, JiraError> {
        let (Some(issue_key), Some(id)) = (&self.issue_key, &self.id) else {
            return Err(JiraError::UnexpectedResult {
                operation: "comment update",
            });
        };

        let mut payload = json!({ "body": body });
        if let Some((vis_type, vis_value)) = visibility {
            payload["visibility"] = json!({ "type": vis_type, "value": vis_value });
        }

        let result = self
            .client
            .put(
                &format!("{API_PATH}issue/{issue_key}/comment/{id}"),
                &payload,
            )
            .await
            .map_err(|e| JiraError::request(format!("Failed to update comment {id}"), e))?
            .ok_or(JiraError::MalformedPayload)?;

        Ok(Self::for_issue(&self.client, &result, issue_key))
    }
}

impl Resource for Comment {
    fn deserialize(client: &RestClient, json: &Value) -> Self {
        Self {
            client: client.clone(),
            issue_key: None,
            self_link: field::get_string(json.get("self")),
            id: field::get_string(json.get("id")),
            author: field::get_resource(client, json.get("author")),
            body: field::get_string(json.get("body")),
            created: field::get_date_time(json.get("created")),
            updated: field::get_date_time(json.get("updated")),
            updated_author: field::get_resource(client, json.get("updatedAuthor")),
            visibility: field::get_resource(client, json.get("visibility")),
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn self_url(&self) -> Option<&str> {
        self.self_link.as_deref()
    }
}
