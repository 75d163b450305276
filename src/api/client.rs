use anyhow::Context;
use reqwest::{Client, Response};
use serde_json::{Value, json};

use crate::foundation::error::{FlavorError, FlavorResult};
use crate::model::bag::{Bag, parse_bag_list, parse_bag_record};
use crate::model::user::UserSession;

/// Production API host.
pub const DEFAULT_API_BASE: &str = "https://laysflavorapi.onrender.com";

const USER_AGENT: &str = concat!("flavorbag/", env!("CARGO_PKG_VERSION"));

/// Shown when the list request fails or returns something that is not JSON.
pub const LIST_FAILED: &str = "Failed to load bags.";
/// Shown when a single bag cannot be loaded.
pub const GET_FAILED: &str = "Failed to load bag";
/// Shown when saving fails without a server message.
pub const SAVE_FAILED: &str = "Failed to save bag";
/// Shown when deleting fails.
pub const DELETE_FAILED: &str = "Failed to delete bag";
/// Shown when voting fails.
pub const VOTE_FAILED: &str = "Failed to register vote";
/// Shown when login fails without a server message.
pub const LOGIN_FAILED: &str = "Login failed";

/// Client for the bag REST API.
///
/// Failures come back as [`FlavorError::Network`] whose message is fit for the user: the
/// server's `error`/`message` field where the endpoint provides one, else a fixed text.
/// Nothing is retried.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Client for `base_url` (e.g. [`DEFAULT_API_BASE`]).
    pub fn new(base_url: impl Into<String>) -> FlavorResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self::with_client(client, base_url))
    }

    /// Client sharing an existing `reqwest` client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    /// API host without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/bag`.
    #[tracing::instrument(skip(self))]
    pub async fn list_bags(&self) -> FlavorResult<Vec<Bag>> {
        let url = self.url("/api/bag");
        let resp = self.send(self.client.get(&url), LIST_FAILED).await?;
        let body: Value = resp.json().await.map_err(|e| {
            tracing::warn!(error = %e, "bag list is not JSON");
            FlavorError::network(LIST_FAILED)
        })?;
        let bags = parse_bag_list(&body);
        tracing::info!(count = bags.len(), "bags loaded");
        Ok(bags)
    }

    /// `GET /api/bag/{id}`.
    #[tracing::instrument(skip(self))]
    pub async fn get_bag(&self, id: &str) -> FlavorResult<Bag> {
        let url = self.url(&format!("/api/bag/{id}"));
        let resp = self.send(self.client.get(&url), GET_FAILED).await?;
        if !resp.status().is_success() {
            return Err(error_from(resp, GET_FAILED, true).await);
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|_| FlavorError::network(GET_FAILED))?;
        parse_bag_record(&body).ok_or_else(|| FlavorError::network(GET_FAILED))
    }

    /// `POST /api/bag`. Returns the stored record, or `bag` itself when the response carries
    /// no record.
    #[tracing::instrument(skip_all, fields(name = bag.name.as_deref()))]
    pub async fn create_bag(&self, bag: &Bag) -> FlavorResult<Bag> {
        let url = self.url("/api/bag");
        let resp = self
            .send(self.client.post(&url).json(bag), SAVE_FAILED)
            .await?;
        if !resp.status().is_success() {
            return Err(error_from(resp, SAVE_FAILED, true).await);
        }
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        Ok(parse_bag_record(&body).unwrap_or_else(|| bag.clone()))
    }

    /// `DELETE /api/bag/{id}`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_bag(&self, id: &str) -> FlavorResult<()> {
        let url = self.url(&format!("/api/bag/{id}"));
        let resp = self.send(self.client.delete(&url), DELETE_FAILED).await?;
        if !resp.status().is_success() {
            return Err(error_from(resp, DELETE_FAILED, false).await);
        }
        Ok(())
    }

    /// `POST /api/vote/{bag_id}` with `{"userId": user_id}`.
    #[tracing::instrument(skip(self))]
    pub async fn vote(&self, bag_id: &str, user_id: &str) -> FlavorResult<()> {
        let url = self.url(&format!("/api/vote/{bag_id}"));
        let req = self.client.post(&url).json(&json!({ "userId": user_id }));
        let resp = self.send(req, VOTE_FAILED).await?;
        if !resp.status().is_success() {
            return Err(error_from(resp, VOTE_FAILED, false).await);
        }
        Ok(())
    }

    /// `POST /api/user/login`.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> FlavorResult<UserSession> {
        let url = self.url("/api/user/login");
        let req = self
            .client
            .post(&url)
            .json(&json!({ "username": username, "password": password }));
        let resp = self.send(req, LOGIN_FAILED).await?;
        if !resp.status().is_success() {
            return Err(error_from(resp, LOGIN_FAILED, true).await);
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|_| FlavorError::network(LOGIN_FAILED))?;
        Ok(UserSession::from_login_response(&body, username))
    }

    async fn send(&self, req: reqwest::RequestBuilder, fallback: &str) -> FlavorResult<Response> {
        req.send().await.map_err(|e| {
            tracing::warn!(error = %e, "request failed");
            FlavorError::network(fallback)
        })
    }
}

/// Build the error for a non-2xx response. With `server_message`, the body's `error` or
/// `message` string wins over `fallback`.
async fn error_from(resp: Response, fallback: &str, server_message: bool) -> FlavorError {
    let status = resp.status();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    tracing::warn!(%status, %body, "request rejected");

    let message = server_message
        .then(|| {
            ["error", "message"]
                .iter()
                .find_map(|k| body.get(*k).and_then(Value::as_str))
                .filter(|s| !s.trim().is_empty())
        })
        .flatten()
        .unwrap_or(fallback);
    FlavorError::http_status(status.as_u16(), message)
}

#[cfg(test)]
#[path = "../../tests/unit/api/client.rs"]
mod tests;
