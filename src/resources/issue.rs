//! Issues and issue creation.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde_json::{json, Map, Value};

use crate::config::API_PATH;
use crate::error::JiraError;
use crate::field;
use crate::resources::{
    Comment, Component, IssueType, Resolution, Resource, User, Version, Votes, Watches,
};
use crate::rest::{NewAttachment, RestClient};

/// A JIRA issue.
///
/// Most data lives under the payload's `fields` object; the getters here
/// surface the commonly used subset and keep issue-level follow-up calls
/// (comments, attachments) on the same client the issue was fetched with.
#[derive(Clone, Debug)]
pub struct Issue {
    client: RestClient,
    /// Server-assigned ID.
    pub id: Option<String>,
    /// Canonical URL of this issue.
    pub self_link: Option<String>,
    /// Issue key, e.g. `"PROJ-123"`.
    pub key: Option<String>,
    /// One-line summary.
    pub summary: Option<String>,
    /// Long-form description.
    pub description: Option<String>,
    /// The reporting user.
    pub reporter: Option<User>,
    /// The assigned user.
    pub assignee: Option<User>,
    /// The issue's type.
    pub issue_type: Option<IssueType>,
    /// Resolution, when the issue is resolved.
    pub resolution: Option<Resolution>,
    /// Vote record.
    pub votes: Option<Votes>,
    /// Watcher record.
    pub watches: Option<Watches>,
    /// Versions this issue is fixed in.
    pub fix_versions: Option<Vec<Version>>,
    /// Components this issue belongs to.
    pub components: Option<Vec<Component>>,
    /// Creation timestamp.
    pub created: Option<DateTime<FixedOffset>>,
    /// Last-update timestamp.
    pub updated: Option<DateTime<FixedOffset>>,
}

impl Issue {
    /// Retrieves an issue by key.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Request`] when the call fails and
    /// [`JiraError::MalformedPayload`] when the server answers with an empty
    /// body.
    pub async fn get(client: &RestClient, key: &str) -> Result<Self, JiraError> {
        Self::get_with_params(client, key, &[]).await
    }

    /// Retrieves an issue by key with extra query parameters, e.g.
    /// `("expand", "changelog")`.
    ///
    /// # Errors
    ///
    /// See [`Self::get`].
    pub async fn get_with_params(
        client: &RestClient,
        key: &str,
        params: &[(&str, &str)],
    ) -> Result<Self, JiraError> {
        let body = client
            .get_object_with_params(&format!("{API_PATH}issue/{key}"), params)
            .await
            .map_err(|e| JiraError::request(format!("Failed to retrieve issue {key}"), e))?
            .ok_or(JiraError::MalformedPayload)?;
        Ok(Self::deserialize(client, &body))
    }

    /// Starts building a new issue of the given type in the given project.
    #[must_use]
    pub fn create(
        client: &RestClient,
        project: impl Into<String>,
        issue_type: impl Into<String>,
    ) -> CreateIssue {
        CreateIssue::new(client, project, issue_type)
    }

    /// Fetches the comments on this issue.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::UnexpectedResult`] when the issue has no key,
    /// [`JiraError::Request`] when the call fails, and
    /// [`JiraError::MalformedPayload`] when the server answers with an empty
    /// body.
    pub async fn comments(&self) -> Result<Vec<Comment>, JiraError> {
        let key = self.require_key("comments")?;
        let body = self
            .client
            .get_object(&format!("{API_PATH}issue/{key}/comment"))
            .await
            .map_err(|e| {
                JiraError::request(format!("Failed to retrieve comments on issue {key}"), e)
            })?
            .ok_or(JiraError::MalformedPayload)?;

        let comments = body
            .get("comments")
            .and_then(Value::as_array)
            .map(|array| {
                array
                    .iter()
                    .filter(|element| element.is_object())
                    .map(|element| Comment::for_issue(&self.client, element, key))
                    .collect()
            })
            .unwrap_or_default();
        Ok(comments)
    }

    /// Adds a comment to this issue.
    ///
    /// # Errors
    ///
    /// See [`Self::comments`].
    pub async fn add_comment(&self, body: &str) -> Result<Comment, JiraError> {
        self.add_comment_with_visibility(body, None).await
    }

    /// Adds a comment with a visibility restriction, given as a
    /// `(type, value)` pair such as `("role", "Developers")`.
    ///
    /// # Errors
    ///
    /// See [`Self::comments`].
    pub async fn add_comment_with_visibility(
        &self,
        body: &str,
        visibility: Option<(&str, &str)>,
    ) -> Result<Comment, JiraError> {
        let key = self.require_key("add comment")?;

        let mut payload = json!({ "body": body });
        if let Some((vis_type, vis_value)) = visibility {
            payload["visibility"] = json!({ "type": vis_type, "value": vis_value });
        }

        let result = self
            .client
            .post(&format!("{API_PATH}issue/{key}/comment"), &payload)
            .await
            .map_err(|e| JiraError::request(format!("Failed to comment on issue {key}"), e))?
            .ok_or(JiraError::MalformedPayload)?;

        Ok(Comment::for_issue(&self.client, &result, key))
    }

    /// Uploads attachments to this issue.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::UnexpectedResult`] when the issue has no key and
    /// [`JiraError::Request`] when the upload fails.
    pub async fn add_attachments(&self, attachments: Vec<NewAttachment>) -> Result<(), JiraError> {
        let key = self.require_key("add attachments")?;
        self.client
            .post_attachments(&format!("{API_PATH}issue/{key}/attachments"), attachments)
            .await
            .map_err(|e| JiraError::request(format!("Failed to attach to issue {key}"), e))?;
        Ok(())
    }

    fn require_key(&self, operation: &'static str) -> Result<&str, JiraError> {
        self.key
            .as_deref()
            .ok_or(JiraError::UnexpectedResult { operation })
    }
}

impl Resource for Issue {
    fn deserialize(client: &RestClient, json: &Value) -> Self {
        let fields = json.get("fields").cloned().unwrap_or(Value::Null);
        Self {
            client: client.clone(),
            id: field::get_string(json.get("id")),
            self_link: field::get_string(json.get("self")),
            key: field::get_string(json.get("key")),
            summary: field::get_string(fields.get("summary")),
            description: field::get_string(fields.get("description")),
            reporter: field::get_resource(client, fields.get("reporter")),
            assignee: field::get_resource(client, fields.get("assignee")),
            issue_type: field::get_resource(client, fields.get("issuetype")),
            resolution: field::get_resource(client, fields.get("resolution")),
            votes: field::get_resource(client, fields.get("votes")),
            watches: field::get_resource(client, fields.get("watches")),
            fix_versions: field::get_resource_array(client, fields.get("fixVersions")),
            components: field::get_resource_array(client, fields.get("components")),
            created: field::get_date_time(fields.get("created")),
            updated: field::get_date_time(fields.get("updated")),
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn self_url(&self) -> Option<&str> {
        self.self_link.as_deref()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key.as_deref().unwrap_or_default())
    }
}

/// Builder for a new issue.
///
/// The project and issue type are fixed at construction; everything else
/// accumulates through setters. Nothing is sent until
/// [`execute`](Self::execute), which creates the issue and fetches it back.
///
/// # Example
///
/// ```rust,ignore
/// let issue = Issue::create(&client, "PROJ", "Bug")
///     .summary("Login page 500s")
///     .description("Stack trace attached")
///     .execute()
///     .await?;
/// ```
#[derive(Clone, Debug)]
#[must_use = "nothing is sent until execute() is called"]
pub struct CreateIssue {
    client: RestClient,
    project: String,
    issue_type: String,
    fields: Map<String, Value>,
}

impl CreateIssue {
    fn new(client: &RestClient, project: impl Into<String>, issue_type: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            project: project.into(),
            issue_type: issue_type.into(),
            fields: Map::new(),
        }
    }

    /// Sets the summary field.
    pub fn summary(self, summary: impl Into<String>) -> Self {
        self.field("summary", json!(summary.into()))
    }

    /// Sets the description field.
    pub fn description(self, description: impl Into<String>) -> Self {
        self.field("description", json!(description.into()))
    }

    /// Sets the assignee by user name.
    pub fn assignee(self, username: impl Into<String>) -> Self {
        self.field("assignee", json!({ "name": username.into() }))
    }

    /// Sets an arbitrary field by its JSON name, custom fields included.
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    fn payload(&self) -> Value {
        let mut fields = self.fields.clone();
        fields.insert("project".to_string(), json!({ "key": self.project }));
        fields.insert("issuetype".to_string(), json!({ "name": self.issue_type }));
        json!({ "fields": fields })
    }

    /// Creates the issue and fetches the full record back.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Request`] when a call fails,
    /// [`JiraError::MalformedPayload`] when the create response has no body,
    /// and [`JiraError::UnexpectedResult`] when the response carries no
    /// issue key.
    pub async fn execute(self) -> Result<Issue, JiraError> {
        let result = self
            .client
            .post(&format!("{API_PATH}issue"), &self.payload())
            .await
            .map_err(|e| JiraError::request("Failed to create issue", e))?
            .ok_or(JiraError::MalformedPayload)?;

        let key = field::get_string(result.get("key")).ok_or(JiraError::UnexpectedResult {
            operation: "issue create",
        })?;

        Issue::get(&self.client, &key).await
    }
}
