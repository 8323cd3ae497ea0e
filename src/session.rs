use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::device::DeviceIdentity;
use crate::error::CloudBaseError;

/// Resource path for device registration.
pub const REGISTER_RESOURCE: &str = "register";
/// Logical action name the server uses to label registration replies.
pub const REGISTER_ACTION: &str = "register-device";

const SESSION_ID_FIELD: &str = "sessionid";

/// Registered session state held for the client's lifetime.
///
/// Created exactly once during `CloudBaseClient::connect`. There is no
/// renewal, expiry, or teardown; a session dies with its client.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: DeviceIdentity,
    pub session_id: String,
}

/// Wire payload for device registration: the device description and no
/// prior session id.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload<'a> {
    pub device_type: &'static str,
    pub device_name: &'a str,
    pub device_model: &'a str,
    pub language: &'a str,
}

impl<'a> RegisterPayload<'a> {
    pub fn new(identity: &'a DeviceIdentity) -> Self {
        Self {
            device_type: "rust",
            device_name: &identity.name,
            device_model: &identity.model,
            language: &identity.language,
        }
    }
}

/// Build a session from a decoded registration result.
///
/// The result must carry a non-empty `sessionid` string; anything else
/// fails the whole construction — there is no unauthenticated mode.
pub fn session_from_response(
    identity: DeviceIdentity,
    result: &Value,
    status: StatusCode,
) -> Result<Session, CloudBaseError> {
    let session_id = result
        .get(SESSION_ID_FIELD)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty());

    match session_id {
        Some(id) => Ok(Session {
            identity,
            session_id: id.to_owned(),
        }),
        None => Err(CloudBaseError::MissingSessionId { status }),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::{session_from_response, RegisterPayload};
    use crate::device::DeviceIdentity;

    fn identity() -> DeviceIdentity {
        DeviceIdentity {
            name: "unit".to_string(),
            model: "0.1".to_string(),
            uniq: "unit-uniq".to_string(),
            language: "en".to_string(),
        }
    }

    #[test]
    fn register_payload_carries_device_description() {
        let identity = identity();
        let payload = serde_json::to_value(RegisterPayload::new(&identity))
            .expect("serialize register payload");

        assert_eq!(payload["device_type"], "rust");
        assert_eq!(payload["device_name"], "unit");
        assert_eq!(payload["device_model"], "0.1");
        assert_eq!(payload["language"], "en");
        assert!(payload.get("session_id").is_none());
    }

    #[test]
    fn session_extracts_session_id() {
        let session = session_from_response(
            identity(),
            &json!({"sessionid": "abc", "status": "OK"}),
            StatusCode::OK,
        )
        .expect("session id should be extracted");

        assert_eq!(session.session_id, "abc");
    }

    #[test]
    fn session_rejects_missing_session_id() {
        let result = session_from_response(identity(), &json!({"status": "OK"}), StatusCode::OK);
        assert!(result.is_err());
    }

    #[test]
    fn session_rejects_blank_session_id() {
        let result = session_from_response(identity(), &json!({"sessionid": "  "}), StatusCode::OK);
        assert!(result.is_err());
    }

    #[test]
    fn session_rejects_non_string_session_id() {
        let result = session_from_response(identity(), &json!({"sessionid": 42}), StatusCode::OK);
        assert!(result.is_err());
    }
}
