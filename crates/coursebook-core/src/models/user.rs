use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The user object returned by the login endpoint.
///
/// Only a few fields are interpreted for display; everything the backend sends
/// is kept so the object can be persisted and restored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "pictureUrl", default, skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn display_name(&self) -> String {
        self.email.clone().unwrap_or_else(|| "signed in".to_string())
    }
}

/// Credentials body of the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}
