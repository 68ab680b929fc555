//! Typed views over JIRA REST resources.
//!
//! Every resource is built from a JSON payload through
//! [`crate::field::get_resource`] and friends, and construction never fails:
//! missing or mistyped fields become the type's zero values. Resources with
//! follow-up calls (updating a comment, listing an issue's comments) keep a
//! clone of the [`RestClient`](crate::rest::RestClient) they were fetched
//! with, so those calls go through the same transport and credentials.

mod comment;
mod component;
mod issue;
mod issue_type;
mod project;
mod resolution;
mod user;
mod version;
mod visibility;
mod votes;
mod watches;

pub use comment::Comment;
pub use component::Component;
pub use issue::{CreateIssue, Issue};
pub use issue_type::IssueType;
pub use project::Project;
pub use resolution::Resolution;
pub use user::User;
pub use version::{CreateVersion, Version};
pub use visibility::Visibility;
pub use votes::Votes;
pub use watches::Watches;

use serde_json::Value;

use crate::rest::RestClient;

/// A typed resource constructed from a JSON payload.
///
/// `deserialize` is total: it accepts any JSON object and fills in zero
/// values for whatever is missing. Code that needs to reject a payload does
/// so before construction (see
/// [`crate::field::get_resource`]).
pub trait Resource: Sized {
    /// Builds the resource from a JSON payload.
    fn deserialize(client: &RestClient, json: &Value) -> Self;

    /// The server-assigned ID, when the payload carried one.
    fn id(&self) -> Option<&str>;

    /// The canonical URL of this resource, when the payload carried one.
    fn self_url(&self) -> Option<&str>;
}
