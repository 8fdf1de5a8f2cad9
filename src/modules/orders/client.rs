use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::limiter::IntervalLimiter;
use crate::modules::config::RecordStoreConfig;
use crate::modules::error::PortalError;

/// Base URL of the record store REST API.
const API_BASE_URL: &str = "https://api.airtable.com/v0";

/// Table holding pilot orders.
const ORDERS_TABLE: &str = "Orders";

/// Record field naming the owning identity. Must match `Credential::name`.
pub const ORDER_OWNER_FIELD: &str = "Name";

/// Timeout applied to every outbound request.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Minimum spacing between consecutive outbound calls.
const MIN_CALL_INTERVAL_MS: u64 = 250;

/// A record as returned by the store. The field schema is opaque to the
/// portal; only the owner field is ever interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    #[serde(default)]
    pub fields: serde_json::Value,
}

/// One page of list results.
#[derive(Debug, Deserialize)]
struct RecordPage {
    #[serde(default)]
    records: Vec<OrderRecord>,
}

/// HTTP client for the remote record store.
///
/// All calls pass through the interval limiter and carry a fixed request
/// timeout. Failures are never retried here; retry policy belongs to the
/// caller if anywhere.
pub struct OrdersClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    limiter: IntervalLimiter,
}

impl OrdersClient {
    /// Create a new record store client.
    pub fn new(config: &RecordStoreConfig) -> Result<Self, PortalError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                PortalError::Configuration(format!("failed to build record store client: {}", e))
            })?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: format!("{}/{}", API_BASE_URL, config.base_id),
            limiter: IntervalLimiter::new(Duration::from_millis(MIN_CALL_INTERVAL_MS)),
        })
    }

    /// Build the URL for the orders table.
    fn table_url(&self) -> String {
        format!("{}/{}", self.base_url, ORDERS_TABLE)
    }

    /// Build the URL for a single record.
    fn record_url(&self, record_id: &str) -> String {
        format!("{}/{}/{}", self.base_url, ORDERS_TABLE, record_id)
    }

    /// List the orders owned by the given identity.
    ///
    /// Ownership filtering happens at the query layer, so records belonging
    /// to other identities never reach the portal at all.
    pub async fn list_orders_for(&self, owner: &str) -> Result<Vec<OrderRecord>, PortalError> {
        self.limiter.acquire().await;

        let formula = format!(
            "{{{}}}='{}'",
            ORDER_OWNER_FIELD,
            owner.replace('\'', "\\'")
        );
        let response = self
            .http
            .get(self.table_url())
            .bearer_auth(&self.api_key)
            .query(&[("filterByFormula", formula.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response).await?;
        let page: RecordPage = response.json().await.map_err(map_transport_error)?;
        Ok(page.records)
    }

    /// Fetch a single record by ID.
    pub async fn fetch_order(&self, record_id: &str) -> Result<OrderRecord, PortalError> {
        self.limiter.acquire().await;

        let response = self
            .http
            .get(self.record_url(record_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response).await?;
        response.json().await.map_err(map_transport_error)
    }

    /// Update the fields of a record. Callers must run the ownership check
    /// against the current record before calling this.
    pub async fn update_order(
        &self,
        record_id: &str,
        fields: &serde_json::Value,
    ) -> Result<OrderRecord, PortalError> {
        self.limiter.acquire().await;

        let response = self
            .http
            .patch(self.record_url(record_id))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "fields": fields }))
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response).await?;
        response.json().await.map_err(map_transport_error)
    }
}

/// Map a transport failure, keeping timeouts distinct.
fn map_transport_error(e: reqwest::Error) -> PortalError {
    if e.is_timeout() {
        PortalError::CollaboratorTimeout
    } else {
        PortalError::Collaborator(e.to_string())
    }
}

/// Reject non-2xx responses, carrying the store's status and body into the
/// server-side log detail.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PortalError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(PortalError::Collaborator(format!(
        "record store returned {}: {}",
        status, body
    )))
}
