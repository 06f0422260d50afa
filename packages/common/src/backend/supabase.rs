use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::error::BackendError;
use super::traits::{BlobStore, IdentityService, RecordStore};
use crate::config::BackendConfig;
use crate::models::{
    AccessToken, ListOptions, ObjectEntry, Session, SignUpOutcome, UploadOptions, User,
};

/// HTTP client for a Supabase project: GoTrue for identity, PostgREST for
/// rows, Storage for objects. One instance serves all three traits.
#[derive(Clone)]
pub struct SupabaseBackend {
    http: Client,
    base_url: String,
    anon_key: String,
}

#[derive(Deserialize)]
struct SessionPayload {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    user: User,
}

impl From<SessionPayload> for Session {
    fn from(payload: SessionPayload) -> Self {
        Self {
            access_token: AccessToken::new(payload.access_token),
            refresh_token: payload.refresh_token,
            expires_in: payload.expires_in,
            user: payload.user,
        }
    }
}

impl SupabaseBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(http, &config.url, &config.anon_key))
    }

    pub fn with_client(http: Client, base_url: &str, anon_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Every call carries the anon key; the bearer is the user's token when
    /// there is one so row and bucket policies apply to that user.
    fn request(&self, method: Method, path: &str, token: Option<&AccessToken>) -> RequestBuilder {
        let bearer = token.map(AccessToken::as_str).unwrap_or(&self.anon_key);
        self.http
            .request(method, self.endpoint(path))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "Backend call rejected");
        Err(BackendError::service(
            status.as_u16(),
            extract_error_message(status, &body),
        ))
    }
}

/// Pull the human-readable message out of an error body.
///
/// GoTrue, PostgREST and Storage disagree on the field name, so try each in turn.
pub(crate) fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for field in ["msg", "error_description", "message", "error"] {
            if let Some(message) = value.get(field).and_then(Value::as_str)
                && !message.trim().is_empty()
            {
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

#[async_trait]
impl IdentityService for SupabaseBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, BackendError> {
        let request = self
            .request(Method::POST, "/auth/v1/signup", None)
            .json(&json!({ "email": email, "password": password }));
        let body: Value = self.send(request).await?.json().await?;

        // With confirmations enabled GoTrue answers with the bare user object.
        if body.get("access_token").is_some() {
            let payload: SessionPayload = serde_json::from_value(body)?;
            return Ok(SignUpOutcome::SessionIssued(payload.into()));
        }
        let user = match body.get("user") {
            Some(user) => serde_json::from_value(user.clone())?,
            None => serde_json::from_value(body)?,
        };
        Ok(SignUpOutcome::ConfirmationRequired(user))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let request = self
            .request(Method::POST, "/auth/v1/token", None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        let payload: SessionPayload = self.send(request).await?.json().await?;
        Ok(payload.into())
    }

    async fn current_user(&self, token: &AccessToken) -> Result<User, BackendError> {
        let request = self.request(Method::GET, "/auth/v1/user", Some(token));
        Ok(self.send(request).await?.json().await?)
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), BackendError> {
        let request = self.request(Method::POST, "/auth/v1/logout", Some(token));
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SupabaseBackend {
    async fn select_by_key(
        &self,
        token: &AccessToken,
        table: &str,
        column: &str,
        key: &str,
    ) -> Result<Option<Value>, BackendError> {
        let request = self
            .request(Method::GET, &format!("/rest/v1/{table}"), Some(token))
            .query(&[("select", "*".to_string()), (column, format!("eq.{key}"))]);
        let rows: Vec<Value> = self.send(request).await?.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert(
        &self,
        token: &AccessToken,
        table: &str,
        record: &Value,
        on_conflict: &str,
    ) -> Result<Value, BackendError> {
        let request = self
            .request(Method::POST, &format!("/rest/v1/{table}"), Some(token))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(record);
        let rows: Vec<Value> = self.send(request).await?.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("upsert returned no rows".into()))
    }

    async fn insert_if_absent(
        &self,
        token: &AccessToken,
        table: &str,
        record: &Value,
        on_conflict: &str,
    ) -> Result<(), BackendError> {
        let request = self
            .request(Method::POST, &format!("/rest/v1/{table}"), Some(token))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=ignore-duplicates,return=minimal")
            .json(record);
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for SupabaseBackend {
    async fn upload(
        &self,
        token: &AccessToken,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), BackendError> {
        let content_type = options
            .content_type
            .as_deref()
            .and_then(|ct| HeaderValue::from_str(ct).ok())
            .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));

        let request = self
            .request(
                Method::POST,
                &format!("/storage/v1/object/{bucket}/{path}"),
                Some(token),
            )
            .header(CONTENT_TYPE, content_type)
            .header("cache-control", "max-age=3600")
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(data);
        self.send(request).await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.endpoint(&format!("/storage/v1/object/public/{bucket}/{path}"))
    }

    async fn list(
        &self,
        token: &AccessToken,
        bucket: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<ObjectEntry>, BackendError> {
        let request = self
            .request(
                Method::POST,
                &format!("/storage/v1/object/list/{bucket}"),
                Some(token),
            )
            .json(&json!({
                "prefix": prefix.trim_end_matches('/'),
                "limit": options.limit,
                "offset": 0,
                "sortBy": { "column": "name", "order": "asc" },
            }));
        let entries: Vec<ObjectEntry> = self.send(request).await?.json().await?;

        Ok(entries
            .into_iter()
            .filter(|e| e.id.is_some() && e.name != ".emptyFolderPlaceholder")
            .take(options.limit)
            .collect())
    }
}
