pub mod client;
pub mod limiter;

// Re-export the main types and functions
pub use client::{OrderRecord, OrdersClient, ORDER_OWNER_FIELD};
pub use limiter::IntervalLimiter;

use crate::modules::error::PortalError;

/// Verify that a record is owned by the authenticated identity.
///
/// The record's owner field is trimmed before the comparison; the store is
/// hand-maintained and trailing whitespace in it must not lock an owner out
/// of their own records. A missing or non-string owner field denies.
///
/// This check is mandatory before every mutation. Read paths filter by
/// owner at the query layer instead.
pub fn ensure_owned_by(record: &OrderRecord, owner_name: &str) -> Result<(), PortalError> {
    let record_owner = record
        .fields
        .get(ORDER_OWNER_FIELD)
        .and_then(|value| value.as_str())
        .unwrap_or_default();

    let record_owner = record_owner.trim();
    if !record_owner.is_empty() && record_owner == owner_name {
        Ok(())
    } else {
        Err(PortalError::AuthorizationDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_owner(owner: &str) -> OrderRecord {
        OrderRecord {
            id: "rec1".to_string(),
            fields: serde_json::json!({ ORDER_OWNER_FIELD: owner, "Status": "Pending" }),
        }
    }

    #[test]
    fn test_matching_owner_is_allowed() {
        let record = record_with_owner("Jo Smith");
        assert!(ensure_owned_by(&record, "Jo Smith").is_ok());
    }

    #[test]
    fn test_trailing_whitespace_in_store_is_tolerated() {
        let record = record_with_owner("Jo Smith ");
        assert!(ensure_owned_by(&record, "Jo Smith").is_ok());

        let record = record_with_owner("  Jo Smith");
        assert!(ensure_owned_by(&record, "Jo Smith").is_ok());
    }

    #[test]
    fn test_other_owner_is_denied() {
        let record = record_with_owner("Somebody Else");
        assert!(matches!(
            ensure_owned_by(&record, "Jo Smith"),
            Err(PortalError::AuthorizationDenied)
        ));
    }

    #[test]
    fn test_missing_owner_field_is_denied() {
        let record = OrderRecord {
            id: "rec1".to_string(),
            fields: serde_json::json!({ "Status": "Pending" }),
        };
        assert!(ensure_owned_by(&record, "Jo Smith").is_err());

        let record = OrderRecord {
            id: "rec1".to_string(),
            fields: serde_json::Value::Null,
        };
        assert!(ensure_owned_by(&record, "Jo Smith").is_err());
    }

    #[test]
    fn test_non_string_owner_field_is_denied() {
        let record = OrderRecord {
            id: "rec1".to_string(),
            fields: serde_json::json!({ ORDER_OWNER_FIELD: 42 }),
        };
        assert!(ensure_owned_by(&record, "Jo Smith").is_err());
    }
}
