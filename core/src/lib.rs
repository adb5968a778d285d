//! Blocking client for the DaData cleaning API.
//!
//! # Overview
//! Sends names, phones, passports, emails, birthdates, vehicles or whole
//! records to the remote cleaning service and projects the normalized
//! response back onto the caller's input shape.
//!
//! # Design
//! - `DaDataClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO pattern).
//! - `Transport` executes the round trip; `UreqTransport` is the default.
//! - `Api` binds both together with one method per data category.
//! - A field missing from a response is `None` in the projected output,
//!   never an error. Errors abort the whole call.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod projector;
pub mod transport;
pub mod types;

pub use api::Api;
pub use client::DaDataClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{CleanInput, CleanKind, CleanOutput, Cleaned, ExtractionRule, ItemKey};
