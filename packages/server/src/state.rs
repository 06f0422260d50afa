use std::sync::Arc;

use common::{BlobStore, IdentityService, RecordStore};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityService>,
    pub records: Arc<dyn RecordStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub config: AppConfig,
}

impl AppState {
    /// State backed by one object serving all three concerns, as both
    /// `SupabaseBackend` and `InMemoryBackend` do.
    pub fn from_backend<B>(backend: Arc<B>, config: AppConfig) -> Self
    where
        B: IdentityService + RecordStore + BlobStore + 'static,
    {
        Self {
            identity: backend.clone(),
            records: backend.clone(),
            blobs: backend,
            config,
        }
    }
}
