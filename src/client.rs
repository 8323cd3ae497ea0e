use std::collections::BTreeMap;
use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::CloudBaseConfig;
use crate::device::DeviceIdentity;
use crate::envelope::decode_action;
use crate::error::CloudBaseError;
use crate::fields::build_fields;
use crate::payload::coerce_insert_payload;
use crate::session::{
    session_from_response, RegisterPayload, Session, REGISTER_ACTION, REGISTER_RESOURCE,
};
use crate::transport::{Transport, TransportReply};
use crate::url::{api_url, paypal_update_status_url};

/// Category used when a log call does not name one.
pub const DEFAULT_LOG_CATEGORY: &str = "DEFAULT";

/// Severity accepted by the remote application log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
    Event,
}

impl LogLevel {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "DEBUG" => Self::Debug,
            "INFO" => Self::Info,
            "WARNING" => Self::Warning,
            "ERROR" => Self::Error,
            "FATAL" => Self::Fatal,
            "EVENT" => Self::Event,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
            Self::Event => "EVENT",
        }
    }
}

/// PayPal processing environment for payment preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPalEnvironment {
    Live,
    Sandbox,
}

impl PayPalEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Sandbox => "sandbox",
        }
    }
}

/// Express-checkout purchase preparation. Optional redirect URLs and
/// completion hooks are only serialized when set.
#[derive(Debug, Clone, Serialize)]
pub struct PayPalPurchase {
    /// Payment details structure, opaque to this layer.
    pub purchase_details: Value,
    pub environment: PayPalEnvironment,
    /// 3-letter ISO currency code.
    pub currency: String,
    #[serde(rename = "type")]
    kind: &'static str,
    /// CloudFunction executed once the payment completes successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_cloudfunction: Option<String>,
    /// CloudFunction executed if the payment is cancelled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_cloudfunction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_completed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_cancelled_url: Option<String>,
}

impl PayPalPurchase {
    pub fn new(
        purchase_details: Value,
        environment: PayPalEnvironment,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            purchase_details,
            environment,
            currency: currency.into(),
            kind: "purchase",
            completed_cloudfunction: None,
            cancelled_cloudfunction: None,
            payment_completed_url: None,
            payment_cancelled_url: None,
        }
    }

    pub fn with_completed_cloudfunction(mut self, code: impl Into<String>) -> Self {
        self.completed_cloudfunction = Some(code.into());
        self
    }

    pub fn with_cancelled_cloudfunction(mut self, code: impl Into<String>) -> Self {
        self.cancelled_cloudfunction = Some(code.into());
        self
    }

    pub fn with_payment_completed_url(mut self, url: impl Into<String>) -> Self {
        self.payment_completed_url = Some(url.into());
        self
    }

    pub fn with_payment_cancelled_url(mut self, url: impl Into<String>) -> Self {
        self.payment_cancelled_url = Some(url.into());
        self
    }
}

/// Client for one cloudbase.io application.
///
/// Construction registers this installation as a device and holds the
/// returned session id for the client's lifetime. Calls are strictly
/// sequential: each awaits its full round-trip, and the client coordinates
/// no concurrent in-flight requests. Sharing one instance across execution
/// contexts must be serialized by the caller; there is no internal locking.
#[derive(Debug)]
pub struct CloudBaseClient {
    http: Transport,
    config: CloudBaseConfig,
    session: Session,
}

impl CloudBaseClient {
    /// Connect to the application: detect the device identity, register it,
    /// and keep the returned session id. Registration failing to produce a
    /// session id fails construction; there is no unauthenticated mode.
    pub async fn connect(config: CloudBaseConfig) -> Result<Self, CloudBaseError> {
        if config.app_code.trim().is_empty() {
            return Err(CloudBaseError::MissingAppCode);
        }

        let http = Transport::new(&config)?;
        let identity = DeviceIdentity::detect(&config);
        debug!(
            "registering device '{}' with app '{}'",
            identity.name, config.app_code
        );

        let payload = serde_json::to_value(RegisterPayload::new(&identity))
            .map_err(CloudBaseError::encode)?;
        let url = api_url(&config.base_url, &config.app_code, REGISTER_RESOURCE);
        let fields = build_fields(&config, &identity, &payload, &BTreeMap::new())?;
        let reply = http.post(&url, &fields, &BTreeMap::new()).await?;
        let result = decode_action(&reply, REGISTER_ACTION)?;
        let session = session_from_response(identity, &result, reply.status)?;
        debug!("device registered, session established");

        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn config(&self) -> &CloudBaseConfig {
        &self.config
    }

    /// Session id generated by the server when this client registered as a
    /// device.
    pub fn session_id(&self) -> &str {
        &self.session.session_id
    }

    pub fn device_identity(&self) -> &DeviceIdentity {
        &self.session.identity
    }

    /// Replace the auth pair sent with subsequent calls, for applications
    /// configured to require authentication.
    pub fn set_auth(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.config.auth_username = Some(username.into());
        self.config.auth_password = Some(password.into());
    }

    /// Send a line to the application log. Each line has a severity level
    /// and a category; see `log_line_default` for the DEFAULT category.
    pub async fn log_line(
        &self,
        text: &str,
        level: LogLevel,
        category: &str,
    ) -> Result<Value, CloudBaseError> {
        let payload = json!({
            "category": category,
            "level": level.as_str(),
            "device_name": self.session.identity.name,
            "device_model": self.session.identity.model,
            "log_line": text,
        });
        self.call("log", "log", payload).await
    }

    pub async fn log_line_default(
        &self,
        text: &str,
        level: LogLevel,
    ) -> Result<Value, CloudBaseError> {
        self.log_line(text, level, DEFAULT_LOG_CATEGORY).await
    }

    /// Record that the user opened a screen, for navigation analytics. This
    /// is the one operation that sends the session id.
    pub async fn log_navigation(&self, screen_name: &str) -> Result<Value, CloudBaseError> {
        let payload = json!({
            "screen_name": screen_name,
            "session_id": self.session.session_id,
        });
        self.call("lognavigation", "log-navigation", payload).await
    }

    /// Send an email through a template configured in the control panel.
    /// `variables` fills the template's `%var%` placeholders.
    pub async fn send_email(
        &self,
        template_code: &str,
        recipient: &str,
        subject: &str,
        variables: Value,
    ) -> Result<Value, CloudBaseError> {
        let payload = json!({
            "template_code": template_code,
            "recipient": recipient,
            "subject": subject,
            "variables": variables,
        });
        self.call("email", "email", payload).await
    }

    /// Insert a document into a collection. The data APIs expect a sequence
    /// of documents, so mapping-shaped data is wrapped into a one-element
    /// sequence before sending. `attachments` maps form-field names to local
    /// file paths attached as binary parts.
    pub async fn insert_document(
        &self,
        data: Value,
        collection: &str,
        attachments: BTreeMap<String, PathBuf>,
    ) -> Result<Value, CloudBaseError> {
        let resource = format!("{collection}/insert");
        let url = api_url(&self.config.base_url, &self.config.app_code, &resource);
        let reply = self
            .post(&url, &coerce_insert_payload(data), &BTreeMap::new(), &attachments)
            .await?;
        decode_action(&reply, "data")
    }

    /// Overwrite a document. `data` must carry the `cb_search_key` entry
    /// identifying the target document; the key is opaque to this layer.
    pub async fn update_document(
        &self,
        data: Value,
        collection: &str,
    ) -> Result<Value, CloudBaseError> {
        self.call(&format!("{collection}/update"), "data", data).await
    }

    /// Look up documents in a collection. Empty conditions return the full
    /// collection.
    pub async fn search_documents(
        &self,
        collection: &str,
        conditions: Value,
    ) -> Result<Value, CloudBaseError> {
        let payload = json!({ "cb_search_key": conditions });
        self.call(&format!("{collection}/search"), "data", payload)
            .await
    }

    /// Run an ordered list of aggregation commands over a collection.
    pub async fn search_aggregate_documents(
        &self,
        collection: &str,
        pipeline: Value,
    ) -> Result<Value, CloudBaseError> {
        let payload = json!({ "cb_aggregate_key": pipeline });
        self.call(&format!("{collection}/aggregate"), "data", payload)
            .await
    }

    /// Download a file attached to a document, by the id from the document's
    /// `cb_files` field. Returns the stored bytes verbatim; no envelope
    /// decoding is attempted, even when the body happens to look like JSON.
    pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, CloudBaseError> {
        let resource = format!("file/{file_id}");
        let url = api_url(&self.config.base_url, &self.config.app_code, &resource);
        let reply = self
            .post(&url, &json!([]), &BTreeMap::new(), &BTreeMap::new())
            .await?;
        Ok(reply.body)
    }

    /// Execute a CloudFunction. `params` travel as plain form fields, not
    /// inside the JSON payload; the function sees them as POST parameters.
    pub async fn call_cloudfunction(
        &self,
        code: &str,
        params: BTreeMap<String, String>,
    ) -> Result<Value, CloudBaseError> {
        let resource = format!("cloudfunction/{code}");
        let url = api_url(&self.config.base_url, &self.config.app_code, &resource);
        let reply = self
            .post(&url, &json!([]), &params, &BTreeMap::new())
            .await?;
        decode_action(&reply, "cloudfunction")
    }

    /// Execute an applet. Parameters travel as form fields, like
    /// `call_cloudfunction`.
    pub async fn call_applet(
        &self,
        code: &str,
        params: BTreeMap<String, String>,
    ) -> Result<Value, CloudBaseError> {
        let resource = format!("applet/{code}");
        let url = api_url(&self.config.base_url, &self.config.app_code, &resource);
        let reply = self
            .post(&url, &json!([]), &params, &BTreeMap::new())
            .await?;
        decode_action(&reply, "applet")
    }

    /// Prepare a PayPal express-checkout purchase. The reply carries the
    /// PayPal token, the checkout URL, and the payment id.
    pub async fn prepare_paypal_purchase(
        &self,
        purchase: PayPalPurchase,
    ) -> Result<Value, CloudBaseError> {
        let payload = serde_json::to_value(purchase).map_err(CloudBaseError::encode)?;
        self.call("paypal/prepare", "paypal", payload).await
    }

    /// Update a payment to the status reported by PayPal. The three
    /// parameters ride the URL query string rather than the form body; the
    /// server expects exactly that layout.
    pub async fn update_paypal_payment_status(
        &self,
        payment_id: &str,
        success: bool,
        invoice_number: &str,
    ) -> Result<Value, CloudBaseError> {
        let url = paypal_update_status_url(
            &self.config.base_url,
            &self.config.app_code,
            invoice_number,
            payment_id,
            success,
        );
        let reply = self
            .post(&url, &json!([]), &BTreeMap::new(), &BTreeMap::new())
            .await?;
        decode_action(&reply, "paypal")
    }

    /// Details of a payment previously sent through
    /// `prepare_paypal_purchase`.
    pub async fn get_paypal_payment_details(
        &self,
        payment_id: &str,
    ) -> Result<Value, CloudBaseError> {
        let payload = json!({ "payment_id": payment_id });
        self.call("paypal/payment-details", "paypal", payload).await
    }

    /// Application analytics by type.
    pub async fn stats(&self, stats_type: &str) -> Result<Value, CloudBaseError> {
        let payload = json!({ "empty": "param" });
        self.call(&format!("stats/{stats_type}"), "stats", payload)
            .await
    }

    async fn call(
        &self,
        resource: &str,
        action: &str,
        payload: Value,
    ) -> Result<Value, CloudBaseError> {
        let url = api_url(&self.config.base_url, &self.config.app_code, resource);
        let reply = self
            .post(&url, &payload, &BTreeMap::new(), &BTreeMap::new())
            .await?;
        decode_action(&reply, action)
    }

    async fn post(
        &self,
        url: &str,
        payload: &Value,
        extra: &BTreeMap<String, String>,
        attachments: &BTreeMap<String, PathBuf>,
    ) -> Result<TransportReply, CloudBaseError> {
        let fields = build_fields(&self.config, &self.session.identity, payload, extra)?;
        self.http.post(url, &fields, attachments).await
    }
}
