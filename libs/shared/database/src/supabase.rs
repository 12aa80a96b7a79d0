use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Errors surfaced by the PostgREST storage layer. `UniqueViolation` is the
/// load-bearing variant: it is how the server reports that a conditional
/// insert lost to a unique index, which is the only signal the booking and
/// payment paths rely on for cross-request consistency.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("duplicate key: {0}")]
    UniqueViolation(String),

    #[error("storage error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("storage transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for DbError {
    fn from(err: reqwest::Error) -> Self {
        DbError::Transport(err.to_string())
    }
}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.clone(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self, extra: Option<HeaderMap>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.service_key).unwrap());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_key)).unwrap(),
        );

        if let Some(extra) = extra {
            headers.extend(extra);
        }

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let headers = self.get_headers(extra_headers);

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Storage API error ({}): {}", status, error_text);

            // PostgREST reports a unique-index rejection as 409 with SQLSTATE 23505
            if status == StatusCode::CONFLICT || error_text.contains("23505") {
                return Err(DbError::UniqueViolation(error_text));
            }
            return Err(DbError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Filtered scan, e.g. `select("bookings?email=eq.a%40b.c")`.
    pub async fn select<T>(&self, table_and_query: &str) -> Result<Vec<T>, DbError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, &format!("/rest/v1/{}", table_and_query), None)
            .await
    }

    /// Conditional insert: writes the row and returns the stored
    /// representation, or `UniqueViolation` when a unique index on the table
    /// rejects it. Check and write are a single statement on the server, so
    /// two concurrent callers racing for the same key cannot both succeed.
    pub async fn insert_unique<T>(&self, table: &str, row: Value) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let rows: Vec<T> = self
            .request_with_headers(Method::POST, &format!("/rest/v1/{}", table), Some(row), Some(headers))
            .await?;

        rows.into_iter().next().ok_or_else(|| DbError::Api {
            status: 500,
            body: format!("insert into {} returned no representation", table),
        })
    }

    /// Partial update of every row matching the filter, returning the
    /// updated rows.
    pub async fn update<T>(&self, table_and_query: &str, patch: Value) -> Result<Vec<T>, DbError>
    where
        T: DeserializeOwned,
    {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        self.request_with_headers(
            Method::PATCH,
            &format!("/rest/v1/{}", table_and_query),
            Some(patch),
            Some(headers),
        )
        .await
    }

    pub async fn delete(&self, table_and_query: &str) -> Result<(), DbError> {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let _: Vec<Value> = self
            .request_with_headers(
                Method::DELETE,
                &format!("/rest/v1/{}", table_and_query),
                None,
                Some(headers),
            )
            .await?;

        Ok(())
    }

    /// Call a Postgres function. Used where several writes must commit or
    /// roll back together, and for pushing the availability set-difference
    /// down into the database.
    pub async fn rpc<T>(&self, function: &str, args: Value) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::POST, &format!("/rest/v1/rpc/{}", function), Some(args))
            .await
    }
}
