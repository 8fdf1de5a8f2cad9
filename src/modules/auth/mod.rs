pub mod cookie;
pub mod password;
pub mod store;
pub mod tokens;

// Re-export the main types and functions
pub use cookie::{build_clear_cookie, build_set_cookie, extract_session_cookie};
pub use password::{generate_random_salt, hash_password, verify_password};
pub use store::{authenticate, load_credentials, Credential};
pub use tokens::{issue_session, verify_session, Session, TokenError};
