//! User model

use serde::{Deserialize, Serialize};

/// Repository-assigned user identifier
pub type UserId = i64;

/// Maximum length of a user name, in characters
pub const MAX_NAME_LENGTH: usize = 100;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// New user creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
}
