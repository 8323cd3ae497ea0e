//! Transport-layer client for the cloudbase.io backend APIs.
//!
//! This crate owns the request/response protocol: session establishment via
//! device registration, encoding of application payloads (including binary
//! file attachments) into the uniform POST envelope, and decoding of the
//! server's action-keyed JSON envelope back into typed results. The
//! convenience operations (logging, email, document storage, cloud
//! functions, PayPal flows) are thin call-sites of that core.
//!
//! Construction is two-phase: build a [`CloudBaseConfig`], then await
//! [`CloudBaseClient::connect`], which performs the registration round-trip
//! and fails with a typed error when no session can be established.

pub mod client;
pub mod config;
pub mod device;
pub mod envelope;
pub mod error;
pub mod fields;
pub mod payload;
pub mod retry;
pub mod session;
pub mod transport;
pub mod url;

pub use client::{
    CloudBaseClient, LogLevel, PayPalEnvironment, PayPalPurchase, DEFAULT_LOG_CATEGORY,
};
pub use config::CloudBaseConfig;
pub use device::DeviceIdentity;
pub use error::CloudBaseError;
pub use payload::{coerce_insert_payload, encode_payload, is_sequence_shaped};
pub use session::Session;
pub use transport::{Transport, TransportReply};
pub use url::{api_url, normalize_base_url, DEFAULT_API_BASE_URL};
