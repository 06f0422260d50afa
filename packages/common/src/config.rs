use serde::Deserialize;

/// Which backend implementation the portal talks to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The hosted Supabase project at `url`.
    #[default]
    Supabase,
    /// Process-local maps. Nothing survives a restart.
    Memory,
}

/// Connection settings for the hosted identity, record and storage service.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Default: supabase.
    #[serde(default)]
    pub kind: BackendKind,
    /// Project base URL, without a trailing slash. Default: "http://127.0.0.1:54321".
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// Public anon key sent as `apikey` on every request. Default: empty.
    #[serde(default)]
    pub anon_key: String,
    /// Table holding one profile row per user. Default: "profiles".
    #[serde(default = "default_profile_table")]
    pub profile_table: String,
    /// Storage bucket for uploaded media. Default: "media".
    #[serde(default = "default_media_bucket")]
    pub media_bucket: String,
    /// Whole-request timeout for remote calls, in seconds. Default: 30.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:54321".into()
}
fn default_profile_table() -> String {
    "profiles".into()
}
fn default_media_bucket() -> String {
    "media".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            url: default_backend_url(),
            anon_key: String::new(),
            profile_table: default_profile_table(),
            media_bucket: default_media_bucket(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
