use env_logger::{Builder, Env, WriteStyle};
use log::{error, info, warn};

/// Initialize the logging system
///
/// Honors `RUST_LOG` when set, defaulting to info-level output on stderr.
pub fn initialize_logging() {
    Builder::from_env(Env::default().default_filter_or("info"))
        // Enable timestamps
        .format_timestamp_secs()
        // Enable module path in logs
        .format_module_path(true)
        // Set colored output for console
        .write_style(WriteStyle::Auto)
        .init();

    info!("Logging system initialized");
}

/// Helper function to format sensitive data for logging
fn format_sensitive(text: &str) -> String {
    if text.len() <= 4 {
        return "*".repeat(text.len());
    }
    format!("{}***{}", &text[0..2], &text[text.len() - 2..])
}

/// Add structured logging for authentication events
///
/// Failures are logged generically: the line does not reveal whether the
/// email was unknown or the password wrong.
pub fn log_auth_event(event_type: &str, email: &str, success: bool, details: Option<&str>) {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    if success {
        info!(
            "Auth event: type={}, user={}, success=true, timestamp={}, details={:?}",
            event_type,
            format_sensitive(email),
            timestamp,
            details
        );
    } else {
        warn!(
            "Auth event: type={}, user={}, success=false, timestamp={}, details={:?}",
            event_type,
            format_sensitive(email),
            timestamp,
            details
        );
    }
}

/// Add structured logging for record store operations
pub fn log_record_operation(
    operation: &str,
    user: &str,
    record_id: &str,
    success: bool,
    details: Option<&str>,
) {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    if success {
        info!(
            "Record operation: op={}, user={}, record={}, success=true, timestamp={}, details={:?}",
            operation,
            format_sensitive(user),
            record_id,
            timestamp,
            details
        );
    } else {
        error!(
            "Record operation: op={}, user={}, record={}, success=false, timestamp={}, details={:?}",
            operation,
            format_sensitive(user),
            record_id,
            timestamp,
            details
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_data_formatting() {
        assert_eq!(format_sensitive("password"), "pa***rd");
        assert_eq!(format_sensitive("key"), "***");
        assert_eq!(format_sensitive("a@x.com"), "a@***om");
        assert_eq!(format_sensitive(""), "");
    }
}
