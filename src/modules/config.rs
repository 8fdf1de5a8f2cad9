use crate::modules::error::PortalError;

/// Default bind address for the gateway.
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8787;

/// Access configuration for the remote record store.
#[derive(Debug, Clone)]
pub struct RecordStoreConfig {
    pub api_key: String,
    pub base_id: String,
}

/// Process configuration, loaded and validated once at startup.
///
/// The raw credential JSON is kept as a string and parsed on every login
/// attempt, so rotating `PILOT_CREDENTIALS` does not require a restart.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub session_secret: String,
    pub pilot_credentials: Option<String>,
    pub record_store: Option<RecordStoreConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables, failing fast on
    /// missing or inconsistent required values.
    pub fn from_env() -> Result<Self, PortalError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PortalError> {
        let session_secret = lookup("SESSION_SECRET").unwrap_or_default();
        if session_secret.trim().is_empty() {
            return Err(PortalError::Configuration(
                "SESSION_SECRET must be set to a non-empty value".to_string(),
            ));
        }

        let pilot_credentials = lookup("PILOT_CREDENTIALS").filter(|v| !v.trim().is_empty());

        let api_key = lookup("AIRTABLE_API_KEY").filter(|v| !v.trim().is_empty());
        let base_id = lookup("AIRTABLE_BASE_ID").filter(|v| !v.trim().is_empty());
        let record_store = match (api_key, base_id) {
            (Some(api_key), Some(base_id)) => Some(RecordStoreConfig { api_key, base_id }),
            (None, None) => None,
            _ => {
                return Err(PortalError::Configuration(
                    "AIRTABLE_API_KEY and AIRTABLE_BASE_ID must be set together".to_string(),
                ));
            }
        };

        let host = lookup("PORTAL_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORTAL_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                PortalError::Configuration(format!("PORTAL_PORT is not a valid port: {}", raw))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host,
            port,
            session_secret,
            pilot_credentials,
            record_store,
        })
    }
}
