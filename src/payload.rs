use serde_json::Value;

use crate::error::CloudBaseError;

/// Encode a payload value as canonical JSON text for the `post_data` field.
pub fn encode_payload(payload: &Value) -> Result<String, CloudBaseError> {
    serde_json::to_string(payload).map_err(CloudBaseError::encode)
}

/// Whether a value is "really" a list.
///
/// True for any JSON array, and for a non-empty JSON object whose keys, in
/// insertion order, are exactly the decimal indexes `0..n-1`. Everything
/// else — scalars, null, the empty object, objects with out-of-order or
/// non-contiguous numeric keys — is mapping-shaped. Keys with leading zeros
/// (`"00"`, `"01"`) do not match their index.
pub fn is_sequence_shaped(value: &Value) -> bool {
    match value {
        Value::Array(_) => true,
        Value::Object(map) => {
            !map.is_empty()
                && map
                    .keys()
                    .enumerate()
                    .all(|(index, key)| *key == index.to_string())
        }
        _ => false,
    }
}

/// Shape insert data for the wire. The data APIs always expect a sequence of
/// documents, so a mapping-shaped value is wrapped into a one-element
/// sequence; sequence-shaped values pass through unchanged.
pub fn coerce_insert_payload(data: Value) -> Value {
    if is_sequence_shaped(&data) {
        data
    } else {
        Value::Array(vec![data])
    }
}
