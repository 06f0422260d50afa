use async_trait::async_trait;
use serde_json::Value;

use super::error::BackendError;
use crate::models::{
    AccessToken, ListOptions, ObjectEntry, Session, SignUpOutcome, UploadOptions, User,
};

/// Account creation, credential checks and session lookup.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, BackendError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    /// Resolve the user behind a token. Fails if the token is unknown or expired.
    async fn current_user(&self, token: &AccessToken) -> Result<User, BackendError>;

    /// Revoke a token.
    async fn sign_out(&self, token: &AccessToken) -> Result<(), BackendError>;
}

/// Row access to the hosted relational store. Rows travel as JSON objects.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the row whose `column` equals `key`, if any.
    async fn select_by_key(
        &self,
        token: &AccessToken,
        table: &str,
        column: &str,
        key: &str,
    ) -> Result<Option<Value>, BackendError>;

    /// Insert `record`, or overwrite the columns it carries on the row that
    /// conflicts on `on_conflict`. Returns the stored row.
    async fn upsert(
        &self,
        token: &AccessToken,
        table: &str,
        record: &Value,
        on_conflict: &str,
    ) -> Result<Value, BackendError>;

    /// Insert `record` unless a row already conflicts on `on_conflict`.
    /// Succeeds either way, so concurrent first visits cannot duplicate a row.
    async fn insert_if_absent(
        &self,
        token: &AccessToken,
        table: &str,
        record: &Value,
        on_conflict: &str,
    ) -> Result<(), BackendError>;
}

/// Path-addressed object storage with public URLs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(
        &self,
        token: &AccessToken,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), BackendError>;

    /// Public URL for an object. Pure function of bucket and path.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Objects directly under `prefix`, at most `options.limit` of them.
    async fn list(
        &self,
        token: &AccessToken,
        bucket: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<ObjectEntry>, BackendError>;
}
