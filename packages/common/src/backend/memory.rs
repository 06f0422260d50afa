use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use uuid::Uuid;

use super::error::BackendError;
use super::traits::{BlobStore, IdentityService, RecordStore};
use crate::models::{
    AccessToken, ListOptions, ObjectEntry, Session, SignUpOutcome, UploadOptions, User,
};

const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    user: User,
    password: String,
}

struct StoredObject {
    id: Uuid,
    data: Vec<u8>,
    content_type: Option<String>,
    created_at: DateTime<Utc>,
}

/// Process-local stand-in for the hosted service.
///
/// Used by tests and by `backend.kind = "memory"` for local development.
/// Counts calls per concern and can be told to fail identity lookups,
/// uploads or upserts.
pub struct InMemoryBackend {
    public_base: String,
    accounts: DashMap<String, Account>,
    tokens: DashMap<String, User>,
    tables: DashMap<String, Vec<Value>>,
    objects: DashMap<(String, String), StoredObject>,
    identity_calls: AtomicUsize,
    record_calls: AtomicUsize,
    blob_calls: AtomicUsize,
    token_seq: AtomicU64,
    fail_identity: AtomicBool,
    fail_uploads: AtomicBool,
    fail_upserts: AtomicBool,
    require_confirmation: AtomicBool,
}

impl InMemoryBackend {
    /// `public_base` prefixes every public URL, like a project URL would.
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into().trim_end_matches('/').to_string(),
            accounts: DashMap::new(),
            tokens: DashMap::new(),
            tables: DashMap::new(),
            objects: DashMap::new(),
            identity_calls: AtomicUsize::new(0),
            record_calls: AtomicUsize::new(0),
            blob_calls: AtomicUsize::new(0),
            token_seq: AtomicU64::new(0),
            fail_identity: AtomicBool::new(false),
            fail_uploads: AtomicBool::new(false),
            fail_upserts: AtomicBool::new(false),
            require_confirmation: AtomicBool::new(false),
        }
    }

    pub fn identity_calls(&self) -> usize {
        self.identity_calls.load(Ordering::SeqCst)
    }

    pub fn record_calls(&self) -> usize {
        self.record_calls.load(Ordering::SeqCst)
    }

    pub fn blob_calls(&self) -> usize {
        self.blob_calls.load(Ordering::SeqCst)
    }

    /// Make token lookups fail as if the service were unreachable.
    pub fn set_fail_identity(&self, fail: bool) {
        self.fail_identity.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    /// Make sign-up withhold the session, as a project with email confirmation does.
    pub fn set_require_confirmation(&self, require: bool) {
        self.require_confirmation.store(require, Ordering::SeqCst);
    }

    /// Bytes stored at `bucket`/`path`, if any.
    pub fn object(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.objects
            .get(&(bucket.to_string(), path.to_string()))
            .map(|o| o.data.clone())
    }

    pub fn object_content_type(&self, bucket: &str, path: &str) -> Option<String> {
        self.objects
            .get(&(bucket.to_string(), path.to_string()))
            .and_then(|o| o.content_type.clone())
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Raw rows of `table`, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .get(table)
            .map(|rows| rows.value().clone())
            .unwrap_or_default()
    }

    /// Invalidate a token without going through sign-out, like an expiry would.
    pub fn expire_token(&self, token: &AccessToken) {
        self.tokens.remove(token.as_str());
    }

    fn issue_session(&self, user: &User) -> Session {
        let seq = self.token_seq.fetch_add(1, Ordering::SeqCst);
        let token = format!("mem-{seq}-{}", Uuid::new_v4().simple());
        self.tokens.insert(token.clone(), user.clone());
        Session {
            access_token: AccessToken::new(token),
            refresh_token: None,
            expires_in: Some(3600),
            user: user.clone(),
        }
    }

    fn authorize(&self, token: &AccessToken) -> Result<User, BackendError> {
        self.tokens
            .get(token.as_str())
            .map(|u| u.value().clone())
            .ok_or_else(|| BackendError::service(401, "Invalid or expired session"))
    }
}

fn column_matches(row: &Value, column: &str, key: &str) -> bool {
    match row.get(column) {
        Some(Value::String(s)) => s == key,
        Some(other) => other.to_string() == key,
        None => false,
    }
}

fn conflict_key(record: &Value, on_conflict: &str) -> Result<String, BackendError> {
    match record.get(on_conflict) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) if !other.is_null() => Ok(other.to_string()),
        _ => Err(BackendError::service(
            400,
            format!("Record is missing conflict column '{on_conflict}'"),
        )),
    }
}

#[async_trait]
impl IdentityService for InMemoryBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, BackendError> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);

        if password.len() < MIN_PASSWORD_LEN {
            return Err(BackendError::service(
                422,
                format!("Password should be at least {MIN_PASSWORD_LEN} characters."),
            ));
        }

        let email = email.trim().to_lowercase();
        let user = match self.accounts.entry(email.clone()) {
            Entry::Occupied(_) => {
                return Err(BackendError::service(422, "User already registered"));
            }
            Entry::Vacant(slot) => {
                let user = User {
                    id: Uuid::new_v4().to_string(),
                    email: Some(email),
                };
                slot.insert(Account {
                    user: user.clone(),
                    password: password.to_string(),
                });
                user
            }
        };

        if self.require_confirmation.load(Ordering::SeqCst) {
            Ok(SignUpOutcome::ConfirmationRequired(user))
        } else {
            Ok(SignUpOutcome::SessionIssued(self.issue_session(&user)))
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);

        let email = email.trim().to_lowercase();
        let user = self
            .accounts
            .get(&email)
            .filter(|account| account.password == password)
            .map(|account| account.user.clone())
            .ok_or_else(|| BackendError::service(400, "Invalid login credentials"))?;

        Ok(self.issue_session(&user))
    }

    async fn current_user(&self, token: &AccessToken) -> Result<User, BackendError> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_identity.load(Ordering::SeqCst) {
            return Err(BackendError::Transport("Simulated identity outage".into()));
        }
        self.authorize(token)
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), BackendError> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.remove(token.as_str());
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryBackend {
    async fn select_by_key(
        &self,
        token: &AccessToken,
        table: &str,
        column: &str,
        key: &str,
    ) -> Result<Option<Value>, BackendError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        self.authorize(token)?;

        Ok(self.tables.get(table).and_then(|rows| {
            rows.iter()
                .find(|row| column_matches(row, column, key))
                .cloned()
        }))
    }

    async fn upsert(
        &self,
        token: &AccessToken,
        table: &str,
        record: &Value,
        on_conflict: &str,
    ) -> Result<Value, BackendError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        self.authorize(token)?;

        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(BackendError::service(500, "Simulated record store failure"));
        }

        let Value::Object(fields) = record else {
            return Err(BackendError::service(400, "Record must be a JSON object"));
        };
        let key = conflict_key(record, on_conflict)?;

        let mut rows = self.tables.entry(table.to_string()).or_default();
        let Some(idx) = rows
            .iter()
            .position(|row| column_matches(row, on_conflict, &key))
        else {
            rows.push(record.clone());
            return Ok(record.clone());
        };

        // Merge semantics: columns absent from the payload keep their value.
        let existing = &mut rows[idx];
        if let Value::Object(stored) = existing {
            for (column, value) in fields {
                stored.insert(column.clone(), value.clone());
            }
        }
        Ok(existing.clone())
    }

    async fn insert_if_absent(
        &self,
        token: &AccessToken,
        table: &str,
        record: &Value,
        on_conflict: &str,
    ) -> Result<(), BackendError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        self.authorize(token)?;

        let key = conflict_key(record, on_conflict)?;
        let mut rows = self.tables.entry(table.to_string()).or_default();
        if !rows.iter().any(|row| column_matches(row, on_conflict, &key)) {
            rows.push(record.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for InMemoryBackend {
    async fn upload(
        &self,
        token: &AccessToken,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), BackendError> {
        self.blob_calls.fetch_add(1, Ordering::SeqCst);
        self.authorize(token)?;

        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(BackendError::service(500, "Simulated upload failure"));
        }

        let key = (bucket.to_string(), path.to_string());
        if !options.upsert && self.objects.contains_key(&key) {
            return Err(BackendError::service(409, "The resource already exists"));
        }

        self.objects.insert(
            key,
            StoredObject {
                id: Uuid::new_v4(),
                data,
                content_type: options.content_type.clone(),
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{bucket}/{path}",
            self.public_base
        )
    }

    async fn list(
        &self,
        token: &AccessToken,
        bucket: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<ObjectEntry>, BackendError> {
        self.blob_calls.fetch_add(1, Ordering::SeqCst);
        self.authorize(token)?;

        let dir = format!("{}/", prefix.trim_end_matches('/'));
        let mut entries: Vec<ObjectEntry> = self
            .objects
            .iter()
            .filter(|o| o.key().0 == bucket)
            .filter_map(|o| {
                let name = o.key().1.strip_prefix(&dir)?;
                if name.contains('/') {
                    return None;
                }
                Some(ObjectEntry {
                    name: name.to_string(),
                    id: Some(o.value().id.to_string()),
                    created_at: Some(o.value().created_at),
                })
            })
            .collect();

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries.truncate(options.limit);
        Ok(entries)
    }
}
