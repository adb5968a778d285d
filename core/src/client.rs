//! Stateless request builder and response parser for the cleaning API.
//!
//! # Design
//! `DaDataClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. A `Transport` (or the caller) executes the round trip in
//! between, keeping this layer deterministic and free of I/O.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::projector;
use crate::types::{CleanInput, CleanKind, CleanOutput, Cleaned, ExtractionRule, StructureRequest};

/// Synchronous, stateless client for the cleaning API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. A `Transport` (or the caller) is responsible for
/// executing the HTTP round trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct DaDataClient {
    config: ClientConfig,
}

impl DaDataClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a `/clean/{kind}` request. The body is always a JSON array of
    /// the input values in insertion order, even for a single item.
    pub fn build_clean(&self, kind: CleanKind, input: &CleanInput) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&input.values()).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let url = format!("{}/clean/{}", self.config.base_url(), kind.segment());
        debug!(%url, items = input.len(), "building clean request");
        Ok(HttpRequest {
            url,
            headers: self.headers(),
            body,
        })
    }

    /// Build a `/clean` request carrying a record structure and its rows.
    pub fn build_clean_structure(&self, structure: &Value, data: &Value) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&StructureRequest { structure, data })
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        let url = format!("{}/clean", self.config.base_url());
        debug!(%url, "building structure request");
        Ok(HttpRequest {
            url,
            headers: self.headers(),
            body,
        })
    }

    /// Parse a response body into raw JSON without projecting it.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| {
            warn!(error = %e, "response body is not JSON");
            ApiError::parse(e)
        })
    }

    /// Parse a `/clean/{kind}` response and project it back onto `input`.
    pub fn parse_clean(
        &self,
        input: &CleanInput,
        rule: &ExtractionRule,
        response: HttpResponse,
    ) -> Result<Cleaned<CleanOutput>, ApiError> {
        let raw = self.parse_response(response)?;
        let projected = projector::project(input, &raw, rule);
        Ok(Cleaned { projected, raw })
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("content-type".to_string(), "application/json".to_string()),
            ("accept".to_string(), "application/json".to_string()),
            ("authorization".to_string(), format!("Token {}", self.config.token())),
            ("x-secret".to_string(), self.config.secret().to_string()),
            ("user-agent".to_string(), self.config.user_agent()),
        ]
    }
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, "service returned an error status");
    Err(ApiError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}
