use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::CloudBaseConfig;
use crate::device::DeviceIdentity;
use crate::error::CloudBaseError;
use crate::payload::encode_payload;

pub const FIELD_APP_UNIQ: &str = "app_uniq";
pub const FIELD_APP_PWD: &str = "app_pwd";
pub const FIELD_DEVICE_UNIQ: &str = "device_uniq";
pub const FIELD_OUTPUT_FORMAT: &str = "output_format";
pub const FIELD_POST_DATA: &str = "post_data";
pub const FIELD_AUTH_USERNAME: &str = "auth_username";
pub const FIELD_AUTH_PASSWORD: &str = "auth_password";

pub const OUTPUT_FORMAT_JSON: &str = "json";

/// Assemble the outbound form-field set for one request.
///
/// Fixed credential fields first, then the JSON-encoded payload, then the
/// auth pair when one is configured. Extra fields merge last and win on key
/// collisions; that is how passthrough parameters override the defaults.
pub fn build_fields(
    config: &CloudBaseConfig,
    identity: &DeviceIdentity,
    payload: &Value,
    extra: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, CloudBaseError> {
    let mut fields = BTreeMap::new();

    fields.insert(FIELD_APP_UNIQ.to_owned(), config.app_secret.clone());
    fields.insert(FIELD_APP_PWD.to_owned(), config.password.clone());
    fields.insert(FIELD_DEVICE_UNIQ.to_owned(), identity.uniq.clone());
    fields.insert(
        FIELD_OUTPUT_FORMAT.to_owned(),
        OUTPUT_FORMAT_JSON.to_owned(),
    );
    fields.insert(FIELD_POST_DATA.to_owned(), encode_payload(payload)?);

    if let Some(username) = config.auth_username.as_deref().filter(|v| !v.is_empty()) {
        fields.insert(FIELD_AUTH_USERNAME.to_owned(), username.to_owned());
        fields.insert(
            FIELD_AUTH_PASSWORD.to_owned(),
            config.auth_password.clone().unwrap_or_default(),
        );
    }

    for (key, value) in extra {
        fields.insert(key.clone(), value.clone());
    }

    Ok(fields)
}
