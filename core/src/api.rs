//! One method per data category, each binding a fixed endpoint and
//! extraction rule to a single round trip.

use serde_json::Value;
use tracing::debug;

use crate::client::DaDataClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{CleanInput, CleanKind, CleanOutput, Cleaned, ExtractionRule};

/// Blocking client for the cleaning service.
///
/// Credentials are fixed at construction. Calls share no mutable state, so
/// an `Api` can be used from several threads when its transport allows it.
pub struct Api<T = UreqTransport> {
    client: DaDataClient,
    transport: T,
}

impl Api<UreqTransport> {
    /// Client against the public endpoint with default timeouts.
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(token, secret))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Api<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: DaDataClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &DaDataClient {
        &self.client
    }

    pub fn clean_name(&self, input: impl Into<CleanInput>) -> Result<Cleaned<CleanOutput>, ApiError> {
        self.clean(CleanKind::Name, input)
    }

    pub fn clean_phone(&self, input: impl Into<CleanInput>) -> Result<Cleaned<CleanOutput>, ApiError> {
        self.clean(CleanKind::Phone, input)
    }

    /// Projects the passport `series` only; see `CleanKind::result_field`.
    pub fn clean_passport(&self, input: impl Into<CleanInput>) -> Result<Cleaned<CleanOutput>, ApiError> {
        self.clean(CleanKind::Passport, input)
    }

    pub fn clean_email(&self, input: impl Into<CleanInput>) -> Result<Cleaned<CleanOutput>, ApiError> {
        self.clean(CleanKind::Email, input)
    }

    pub fn clean_birthdate(&self, input: impl Into<CleanInput>) -> Result<Cleaned<CleanOutput>, ApiError> {
        self.clean(CleanKind::Birthdate, input)
    }

    pub fn clean_vehicle(&self, input: impl Into<CleanInput>) -> Result<Cleaned<CleanOutput>, ApiError> {
        self.clean(CleanKind::Vehicle, input)
    }

    pub fn clean(&self, kind: CleanKind, input: impl Into<CleanInput>) -> Result<Cleaned<CleanOutput>, ApiError> {
        self.clean_with(kind, input, &kind.default_rule())
    }

    /// Clean with a caller-chosen extraction rule instead of the category's
    /// default field.
    pub fn clean_with(
        &self,
        kind: CleanKind,
        input: impl Into<CleanInput>,
        rule: &ExtractionRule,
    ) -> Result<Cleaned<CleanOutput>, ApiError> {
        let input = input.into();
        let request = self.client.build_clean(kind, &input)?;
        let response = self.transport.execute(request)?;
        let cleaned = self.client.parse_clean(&input, rule, response)?;
        debug!(%kind, items = cleaned.projected.len(), "clean finished");
        Ok(cleaned)
    }

    /// Clean whole records. Returns the parsed response untouched.
    pub fn clean_structure(&self, structure: &Value, data: &Value) -> Result<Value, ApiError> {
        let request = self.client.build_clean_structure(structure, data)?;
        let response = self.transport.execute(request)?;
        self.client.parse_response(response)
    }
}
