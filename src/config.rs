use std::time::Duration;

use crate::retry::DEFAULT_MAX_RETRIES;
use crate::url::DEFAULT_API_BASE_URL;

/// `User-Agent` sent when no override is configured.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/4.0 (compatible;)";

const DEFAULT_DEVICE_NAME: &str = "cloudbase_api-rs";
const DEFAULT_DEVICE_MODEL: &str = env!("CARGO_PKG_VERSION");

/// Configuration for a CloudBase client.
///
/// Pure data: nothing here talks to the network. Connecting happens in
/// `CloudBaseClient::connect`, which consumes a finished config.
#[derive(Debug, Clone)]
pub struct CloudBaseConfig {
    /// Application code assigned by the control panel.
    pub app_code: String,
    /// Unique key generated for the application. Opaque to this layer.
    pub app_secret: String,
    /// MD5 of the application password as shown in the control panel.
    /// Opaque to this layer; never validated client-side.
    pub password: String,
    /// Optional username for apps configured to require authentication.
    pub auth_username: Option<String>,
    /// Password paired with `auth_username`.
    pub auth_password: Option<String>,
    /// Base URL for the REST APIs.
    pub base_url: String,
    /// Device name reported at registration.
    pub device_name: String,
    /// Device model reported at registration.
    pub device_model: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Optional request timeout. None preserves the platform default.
    pub timeout: Option<Duration>,
    /// Retry attempts after the initial one. 0 means a single attempt.
    pub max_retries: u32,
    /// Whether to keep idle connections pooled between requests. False opens
    /// a fresh connection per request.
    pub keep_alive: bool,
}

impl Default for CloudBaseConfig {
    fn default() -> Self {
        Self {
            app_code: String::new(),
            app_secret: String::new(),
            password: String::new(),
            auth_username: None,
            auth_password: None,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            device_model: DEFAULT_DEVICE_MODEL.to_string(),
            user_agent: None,
            timeout: None,
            max_retries: DEFAULT_MAX_RETRIES,
            keep_alive: false,
        }
    }
}

impl CloudBaseConfig {
    pub fn new(
        app_code: impl Into<String>,
        app_secret: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            app_code: app_code.into(),
            app_secret: app_secret.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth_username = Some(username.into());
        self.auth_password = Some(password.into());
        self
    }

    pub fn with_device_name(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = device_name.into();
        self
    }

    pub fn with_device_model(mut self, device_model: impl Into<String>) -> Self {
        self.device_model = device_model.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// The `User-Agent` actually sent on the wire.
    pub fn resolved_user_agent(&self) -> &str {
        match self.user_agent.as_deref() {
            Some(explicit) if !explicit.trim().is_empty() => explicit,
            _ => DEFAULT_USER_AGENT,
        }
    }
}
