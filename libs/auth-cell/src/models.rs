use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::auth::Role;

/// Stored user. A missing record means `guest` tier; the gate treats
/// absence as "not admin", never as a fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminCheckResponse {
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("no user record for '{0}'")]
    UnknownUser(String),

    #[error("user '{0}' is not an admin")]
    NotAdmin(String),

    #[error("a user with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("storage error: {0}")]
    Database(String),
}
