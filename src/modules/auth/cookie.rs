use crate::{SESSION_COOKIE_NAME, SESSION_TTL_SECS};

/// Function to build the Set-Cookie header carrying a session token
///
/// Attributes are fixed: the cookie is unreadable from scripts, only sent
/// over HTTPS, and expires together with the token it carries.
pub fn build_set_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE_NAME, token, SESSION_TTL_SECS
    )
}

/// Function to build the Set-Cookie header that deletes the session cookie
pub fn build_clear_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE_NAME
    )
}

/// Function to extract the session token from a Cookie request header
///
/// Parses the semicolon-separated header and returns the value of the
/// session cookie, or None when the header or the cookie is absent.
pub fn extract_session_cookie(cookie_header: Option<&str>) -> Option<String> {
    let header = cookie_header?;

    header.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        (name == SESSION_COOKIE_NAME).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_cookie_attributes() {
        let header = build_set_cookie("abc.def");
        assert_eq!(
            header,
            "pilot_session=abc.def; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=604800"
        );
    }

    #[test]
    fn test_clear_cookie_attributes() {
        let header = build_clear_cookie();
        assert!(header.starts_with("pilot_session=;"));
        assert!(header.ends_with("Max-Age=0"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Secure"));
        assert!(header.contains("SameSite=Lax"));
    }

    #[test]
    fn test_extract_present_cookie() {
        let header = "pilot_session=abc.def";
        assert_eq!(
            extract_session_cookie(Some(header)),
            Some("abc.def".to_string())
        );
    }

    #[test]
    fn test_extract_among_other_cookies() {
        let header = "theme=dark; pilot_session=abc.def; lang=en";
        assert_eq!(
            extract_session_cookie(Some(header)),
            Some("abc.def".to_string())
        );
    }

    #[test]
    fn test_extract_missing_name_yields_none() {
        assert_eq!(extract_session_cookie(Some("theme=dark; lang=en")), None);
        assert_eq!(extract_session_cookie(Some("")), None);
        assert_eq!(extract_session_cookie(None), None);
    }

    #[test]
    fn test_extract_does_not_match_prefix_names() {
        // A cookie whose name merely starts with ours must not match.
        let header = "pilot_session_old=stale; pilot_session=fresh";
        assert_eq!(
            extract_session_cookie(Some(header)),
            Some("fresh".to_string())
        );
    }

    #[test]
    fn test_extract_preserves_value_with_equals_sign() {
        // Token values never contain '=' today, but splitting must not eat
        // anything past the first one.
        let header = "pilot_session=abc=def";
        assert_eq!(
            extract_session_cookie(Some(header)),
            Some("abc=def".to_string())
        );
    }
}
