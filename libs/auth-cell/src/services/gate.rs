use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};
use urlencoding::encode;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};
use shared_models::auth::Role;
use shared_utils::jwt::{self, TOKEN_TTL_HOURS};

use crate::models::{AuthError, CreateUserRequest, UserRecord};

/// Resolves caller roles and mints bearer tokens. Reads user records only;
/// token issuance never mutates storage.
pub struct AuthorizationGate {
    supabase: Arc<SupabaseClient>,
    jwt_secret: String,
}

impl AuthorizationGate {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>, jwt_secret: String) -> Self {
        Self { supabase, jwt_secret }
    }

    pub async fn find_user(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let users: Vec<UserRecord> = self
            .supabase
            .select(&format!("users?email=eq.{}", encode(email)))
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// Admin check. Absence of a record is an ordinary "not admin", never
    /// a fault.
    pub async fn authorize_admin(&self, email: &str) -> Result<UserRecord, AuthError> {
        match self.find_user(email).await? {
            Some(user) if user.role == Role::Admin => Ok(user),
            Some(user) => {
                debug!("Admin access denied for {} (role {})", user.email, user.role);
                Err(AuthError::NotAdmin(user.email))
            }
            None => {
                debug!("Admin access denied for {} (no record)", email);
                Err(AuthError::NotAdmin(email.to_string()))
            }
        }
    }

    pub async fn is_admin(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self
            .find_user(email)
            .await?
            .map(|user| user.role == Role::Admin)
            .unwrap_or(false))
    }

    /// Tokens are only minted for emails with a user record behind them.
    pub async fn issue_token(&self, email: &str) -> Result<String, AuthError> {
        if self.find_user(email).await?.is_none() {
            return Err(AuthError::UnknownUser(email.to_string()));
        }

        jwt::issue_token(email, &self.jwt_secret, TOKEN_TTL_HOURS).map_err(AuthError::Signing)
    }

    pub async fn register_user(&self, request: CreateUserRequest) -> Result<UserRecord, AuthError> {
        let row = json!({
            "email": request.email,
            "name": request.name,
            "role": Role::User
        });

        match self.supabase.insert_unique::<UserRecord>("users", row).await {
            Ok(user) => {
                info!("User registered: {}", user.email);
                Ok(user)
            }
            Err(DbError::UniqueViolation(_)) => Err(AuthError::DuplicateEmail(request.email)),
            Err(e) => Err(AuthError::Database(e.to_string())),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>, AuthError> {
        self.supabase
            .select("users?order=email.asc")
            .await
            .map_err(|e| AuthError::Database(e.to_string()))
    }

    /// Role elevation; reachable only through the admin-gated handler.
    pub async fn promote_to_admin(&self, user_id: Uuid) -> Result<UserRecord, AuthError> {
        let updated: Vec<UserRecord> = self
            .supabase
            .update(&format!("users?id=eq.{}", user_id), json!({ "role": Role::Admin }))
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?;

        let user = updated
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::UnknownUser(user_id.to_string()))?;

        info!("User {} promoted to admin", user.email);
        Ok(user)
    }
}
