mod error;
mod traits;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "supabase")]
pub mod supabase;

pub use error::BackendError;
pub use traits::{BlobStore, IdentityService, RecordStore};
