// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{
    auth,
    config,
    error,
    gateway,
    orders,
    utils,
};

// Re-export commonly used types
pub use modules::auth::store::Credential;
pub use modules::auth::tokens::Session;
pub use modules::config::AppConfig;
pub use modules::error::PortalError;

// Constants
pub const SESSION_COOKIE_NAME: &str = "pilot_session";
pub const SESSION_TTL_SECS: u64 = 7 * 24 * 3600;
pub const PROTECTED_PREFIXES: &[&str] = &["/portal", "/api/orders"];

// Type aliases
pub type HmacSha256 = hmac::Hmac<sha2::Sha256>;
