//! HTTP client for the remote bill API.
//!
//! Conventional REST resource: `GET/POST {base}/bills`,
//! `PUT/DELETE {base}/bills/{id}`. Any non-2xx response is a failure; no
//! other status-code semantics are assumed. Calls are synchronous and
//! issued one at a time; a failure surfaces once as an error and never
//! touches a list already held in memory.

use std::time::Duration;

use ureq::Agent;

use crate::bill::{Bill, BillDraft};
use crate::config::Config;
use crate::error::{BilldashError, Result};

pub struct BillsClient {
    agent: Agent,
    base_url: String,
}

impl BillsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    fn collection_url(&self) -> String {
        format!("{}/bills", self.base_url)
    }

    fn record_url(&self, id: u64) -> String {
        format!("{}/bills/{id}", self.base_url)
    }

    /// Fetch the full bill list.
    pub fn list(&self) -> Result<Vec<Bill>> {
        let url = self.collection_url();
        let mut response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| http_error(&url, e))?;
        check_status(&url, response.status().as_u16())?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| http_error(&url, e))?;
        serde_json::from_str(&body).map_err(|e| BilldashError::BadResponse { url, source: e })
    }

    /// Create a bill; returns the record as stored by the API (with its
    /// assigned id).
    pub fn create(&self, draft: &BillDraft) -> Result<Bill> {
        let url = self.collection_url();
        let payload = encode(draft)?;
        let mut response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send(payload.as_str())
            .map_err(|e| http_error(&url, e))?;
        check_status(&url, response.status().as_u16())?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| http_error(&url, e))?;
        serde_json::from_str(&body).map_err(|e| BilldashError::BadResponse { url, source: e })
    }

    /// Replace a bill's fields. The response body is not relied upon;
    /// callers re-fetch the list when they need fresh state.
    pub fn update(&self, id: u64, draft: &BillDraft) -> Result<()> {
        let url = self.record_url(id);
        let payload = encode(draft)?;
        let response = self
            .agent
            .put(&url)
            .header("Content-Type", "application/json")
            .send(payload.as_str())
            .map_err(|e| http_error(&url, e))?;
        check_status(&url, response.status().as_u16())
    }

    pub fn delete(&self, id: u64) -> Result<()> {
        let url = self.record_url(id);
        let response = self
            .agent
            .delete(&url)
            .call()
            .map_err(|e| http_error(&url, e))?;
        check_status(&url, response.status().as_u16())
    }
}

fn encode(draft: &BillDraft) -> Result<String> {
    serde_json::to_string(draft).map_err(|e| {
        BilldashError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

fn http_error(url: &str, source: ureq::Error) -> BilldashError {
    BilldashError::Http {
        url: url.to_string(),
        source: Box::new(source),
    }
}

fn check_status(url: &str, status: u16) -> Result<()> {
    if !(200..300).contains(&status) {
        return Err(BilldashError::ApiStatus {
            status,
            url: url.to_string(),
        });
    }
    Ok(())
}
