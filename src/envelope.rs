use log::warn;
use serde_json::Value;

use crate::error::{body_excerpt, CloudBaseError};
use crate::transport::TransportReply;

/// Field injected into every decoded action result.
pub const HTTP_STATUS_FIELD: &str = "httpStatus";

/// Unwrap the action-keyed JSON envelope of a reply.
///
/// The server labels its result with the logical action name of the
/// operation: `{"<action>": { ... }}`. The decoded result is that inner
/// object with the HTTP status injected under `httpStatus`. A missing action
/// key is a protocol-contract violation and decodes to a typed error, never
/// to a silent default. Binary download replies must not pass through here;
/// their bytes are returned to the caller verbatim.
pub fn decode_action(reply: &TransportReply, action: &str) -> Result<Value, CloudBaseError> {
    let status = reply.status;

    let parsed: Value = match serde_json::from_slice(&reply.body) {
        Ok(value) => value,
        Err(source) => {
            warn!("response for '{action}' (HTTP {status}) is not valid JSON");
            return Err(CloudBaseError::ResponseNotJson {
                action: action.to_owned(),
                status,
                body: body_excerpt(&reply.body),
                source,
            });
        }
    };

    let Value::Object(mut envelope) = parsed else {
        warn!("response for '{action}' (HTTP {status}) is not a JSON object");
        return Err(CloudBaseError::ResponseNotObject {
            action: action.to_owned(),
            status,
            body: body_excerpt(&reply.body),
        });
    };

    let Some(inner) = envelope.remove(action) else {
        warn!("response (HTTP {status}) is missing the '{action}' action key");
        return Err(CloudBaseError::MissingActionKey {
            action: action.to_owned(),
            status,
        });
    };

    let Value::Object(mut result) = inner else {
        return Err(CloudBaseError::ActionNotObject {
            action: action.to_owned(),
            status,
        });
    };

    result.insert(HTTP_STATUS_FIELD.to_owned(), Value::from(status.as_u16()));
    Ok(Value::Object(result))
}
