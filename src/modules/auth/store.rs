use log::error;
use serde::{Deserialize, Serialize};

use super::password::verify_password;

/// Represents a single pilot identity as provisioned in the credential config.
///
/// Credentials are created out-of-band with the `hash-password` command and
/// supplied as a JSON array through the `PILOT_CREDENTIALS` environment
/// variable. They are never mutated at runtime; rotation means replacing the
/// configuration value.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub email: String,
    /// Display identity. Must exactly match the owner field used by the
    /// remote record store, since it doubles as the ownership key.
    pub name: String,
    pub password_hash: String,
    pub salt: String,
}

/// Function to parse the credential config into a list of credentials
///
/// Returns an empty list when the config is absent or malformed rather than
/// failing the request: no credentials means every login attempt is denied.
pub fn load_credentials(raw_config: Option<&str>) -> Vec<Credential> {
    let Some(raw) = raw_config else {
        return Vec::new();
    };

    match serde_json::from_str(raw) {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Failed to parse pilot credentials config: {}", e);
            Vec::new()
        }
    }
}

/// Function to resolve and verify a claimed email/password pair
///
/// The email match is case-insensitive and the first match wins; emails are
/// unique by provisioning convention, not enforced here. An unknown email
/// returns immediately without a dummy hash computation, so "unknown user"
/// and "wrong password" take different amounts of time.
pub fn authenticate(email: &str, password: &str, raw_config: Option<&str>) -> Option<Credential> {
    let credentials = load_credentials(raw_config);

    let candidate = credentials
        .into_iter()
        .find(|c| c.email.eq_ignore_ascii_case(email))?;

    // A salt that fails to decode means corrupt provisioning data; treat the
    // credential as unusable.
    let salt = match hex::decode(&candidate.salt) {
        Ok(salt) => salt,
        Err(e) => {
            error!("Stored salt for {} is not valid hex: {}", candidate.email, e);
            return None;
        }
    };

    if verify_password(password, &candidate.password_hash, &salt) {
        Some(candidate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::{generate_random_salt, hash_password};

    fn test_config(password: &str) -> String {
        let salt = generate_random_salt();
        let credential = Credential {
            email: "a@x.com".to_string(),
            name: "Jo Smith".to_string(),
            password_hash: hash_password(password, &salt),
            salt: hex::encode(&salt),
        };
        serde_json::to_string(&vec![credential]).unwrap()
    }

    #[test]
    fn test_load_absent_config_is_empty() {
        assert!(load_credentials(None).is_empty());
    }

    #[test]
    fn test_load_malformed_config_is_empty() {
        assert!(load_credentials(Some("not json")).is_empty());
        assert!(load_credentials(Some("{\"email\":\"a@x.com\"}")).is_empty());
    }

    #[test]
    fn test_load_parses_camel_case_fields() {
        let raw = r#"[{"email":"a@x.com","name":"Jo Smith","passwordHash":"abcd","salt":"0123"}]"#;
        let credentials = load_credentials(Some(raw));
        assert_eq!(credentials.len(), 1);
        assert_eq!(credentials[0].email, "a@x.com");
        assert_eq!(credentials[0].name, "Jo Smith");
        assert_eq!(credentials[0].password_hash, "abcd");
        assert_eq!(credentials[0].salt, "0123");
    }

    #[test]
    fn test_authenticate_case_insensitive_email() {
        let config = test_config("secret1");

        let credential = authenticate("A@X.com", "secret1", Some(&config));
        assert!(credential.is_some());
        assert_eq!(credential.unwrap().name, "Jo Smith");
    }

    #[test]
    fn test_authenticate_wrong_password() {
        let config = test_config("secret1");
        assert!(authenticate("a@x.com", "wrong", Some(&config)).is_none());
    }

    #[test]
    fn test_authenticate_unknown_email() {
        let config = test_config("secret1");
        assert!(authenticate("nobody@x.com", "secret1", Some(&config)).is_none());
    }

    #[test]
    fn test_authenticate_without_config() {
        assert!(authenticate("a@x.com", "secret1", None).is_none());
    }

    #[test]
    fn test_authenticate_corrupt_salt() {
        let raw = r#"[{"email":"a@x.com","name":"Jo Smith","passwordHash":"abcd","salt":"zz"}]"#;
        assert!(authenticate("a@x.com", "anything", Some(raw)).is_none());
    }
}
