use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    #[serde(rename = "userFirstName")]
    pub user_first_name: String,
    #[serde(rename = "userLastName")]
    pub user_last_name: String,
    pub iat: usize, // issued at (unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>, // only present when a TTL is configured
}
