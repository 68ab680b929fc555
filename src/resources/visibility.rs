//! Comment visibility restrictions.

use serde_json::Value;

use crate::field;
use crate::resources::Resource;
use crate::rest::RestClient;

/// Visibility restriction on a comment, e.g. a role or group.
#[derive(Clone, Debug)]
pub struct Visibility {
    /// Restriction kind, e.g. `"role"` or `"group"`.
    pub visibility_type: Option<String>,
    /// Restriction value, e.g. a role name.
    pub value: Option<String>,
}

impl Resource for Visibility {
    fn deserialize(_client: &RestClient, json: &Value) -> Self {
        Self {
            visibility_type: field::get_string(json.get("type")),
            value: field::get_string(json.get("value")),
        }
    }

    fn id(&self) -> Option<&str> {
        None
    }

    fn self_url(&self) -> Option<&str> {
        None
    }
}
