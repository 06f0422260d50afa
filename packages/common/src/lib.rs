pub mod backend;
pub mod config;
pub mod models;
pub mod storage_path;

pub use backend::{BackendError, BlobStore, IdentityService, RecordStore};
pub use config::{BackendConfig, BackendKind};
pub use models::{AccessToken, MediaCategory, ProfileRecord, Session, User};
