use chrono::Utc;
use common::{ProfileRecord, RecordStore};
use serde_json::{Map, Value, json};
use tracing::warn;

use super::session::CurrentSession;
use crate::error::AppError;
use crate::models::profile::ProfileFields;
use crate::state::AppState;

const KEY_COLUMN: &str = "id";

/// Reads and writes the signed-in user's profile row.
pub struct ProfileController<'a> {
    records: &'a dyn RecordStore,
    table: &'a str,
}

impl<'a> ProfileController<'a> {
    pub fn new(records: &'a dyn RecordStore, table: &'a str) -> Self {
        Self { records, table }
    }

    pub fn from_state(state: &'a AppState) -> Self {
        Self::new(&*state.records, &state.config.backend.profile_table)
    }

    /// Load the profile for display, creating an empty row on first visit.
    ///
    /// Never fails: a missing row, a network error and an unreadable row all
    /// come back as empty fields.
    pub async fn load(&self, session: &CurrentSession) -> ProfileRecord {
        let empty = ProfileRecord::empty(session.user_id());

        match self.fetch(session).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                let row = json!({ "id": session.user_id() });
                if let Err(e) = self
                    .records
                    .insert_if_absent(&session.token, self.table, &row, KEY_COLUMN)
                    .await
                {
                    warn!(user_id = %session.user_id(), "Could not create profile row: {e}");
                }
                empty
            }
            Err(e) => {
                warn!(user_id = %session.user_id(), "Profile load degraded to empty: {}", e.user_message());
                empty
            }
        }
    }

    /// Strict read: `None` only when the row does not exist.
    pub async fn fetch(&self, session: &CurrentSession) -> Result<Option<ProfileRecord>, AppError> {
        let row = self
            .records
            .select_by_key(&session.token, self.table, KEY_COLUMN, session.user_id())
            .await?;

        row.map(|v| {
            serde_json::from_value(v)
                .map_err(|e| AppError::Internal(format!("Unreadable profile row: {e}")))
        })
        .transpose()
    }

    /// Persist the editable fields. Media columns are left as stored.
    pub async fn save(
        &self,
        session: &CurrentSession,
        fields: &ProfileFields,
    ) -> Result<ProfileRecord, AppError> {
        let mut changes = Map::new();
        changes.insert("username".into(), fields.username.clone().into());
        changes.insert("bio".into(), fields.bio.clone().into());
        changes.insert("spotify".into(), fields.spotify.clone().into());
        changes.insert("instagram".into(), fields.instagram.clone().into());
        changes.insert("release_notes".into(), fields.release_notes.clone().into());
        self.write(session, changes).await
    }

    /// Upsert the given columns on the user's row, stamping `updated_at`.
    /// Returns the row as stored afterwards.
    pub(crate) async fn write(
        &self,
        session: &CurrentSession,
        mut changes: Map<String, Value>,
    ) -> Result<ProfileRecord, AppError> {
        changes.insert(KEY_COLUMN.into(), session.user_id().into());
        changes.insert("updated_at".into(), Utc::now().to_rfc3339().into());

        let stored = self
            .records
            .upsert(&session.token, self.table, &Value::Object(changes), KEY_COLUMN)
            .await?;

        serde_json::from_value(stored)
            .map_err(|e| AppError::Internal(format!("Unreadable profile row: {e}")))
    }
}
