use std::collections::BTreeMap;

use cloudbase_api::fields::{
    build_fields, FIELD_APP_PWD, FIELD_APP_UNIQ, FIELD_AUTH_PASSWORD, FIELD_AUTH_USERNAME,
    FIELD_DEVICE_UNIQ, FIELD_OUTPUT_FORMAT, FIELD_POST_DATA, OUTPUT_FORMAT_JSON,
};
use cloudbase_api::{CloudBaseConfig, DeviceIdentity};
use serde_json::json;

fn config() -> CloudBaseConfig {
    CloudBaseConfig::new("app-code", "app-secret", "app-password-md5")
}

fn identity() -> DeviceIdentity {
    DeviceIdentity {
        name: "test-device".to_string(),
        model: "0.1".to_string(),
        uniq: "test-device-uniq".to_string(),
        language: "en".to_string(),
    }
}

#[test]
fn fixed_fields_are_always_present() {
    let fields = build_fields(&config(), &identity(), &json!({"a": 1}), &BTreeMap::new())
        .expect("fields should build");

    assert_eq!(fields[FIELD_APP_UNIQ], "app-secret");
    assert_eq!(fields[FIELD_APP_PWD], "app-password-md5");
    assert_eq!(fields[FIELD_DEVICE_UNIQ], "test-device-uniq");
    assert_eq!(fields[FIELD_OUTPUT_FORMAT], OUTPUT_FORMAT_JSON);
    assert_eq!(fields[FIELD_POST_DATA], r#"{"a":1}"#);
}

#[test]
fn auth_fields_are_absent_without_a_username() {
    let fields = build_fields(&config(), &identity(), &json!([]), &BTreeMap::new())
        .expect("fields should build");

    assert!(!fields.contains_key(FIELD_AUTH_USERNAME));
    assert!(!fields.contains_key(FIELD_AUTH_PASSWORD));
}

#[test]
fn auth_fields_are_absent_for_an_empty_username() {
    let config = config().with_auth("", "secret");
    let fields = build_fields(&config, &identity(), &json!([]), &BTreeMap::new())
        .expect("fields should build");

    assert!(!fields.contains_key(FIELD_AUTH_USERNAME));
    assert!(!fields.contains_key(FIELD_AUTH_PASSWORD));
}

#[test]
fn auth_fields_are_sent_as_a_pair_when_configured() {
    let config = config().with_auth("user", "pass");
    let fields = build_fields(&config, &identity(), &json!([]), &BTreeMap::new())
        .expect("fields should build");

    assert_eq!(fields[FIELD_AUTH_USERNAME], "user");
    assert_eq!(fields[FIELD_AUTH_PASSWORD], "pass");
}

#[test]
fn extra_fields_merge_over_fixed_fields() {
    let mut extra = BTreeMap::new();
    extra.insert(FIELD_DEVICE_UNIQ.to_string(), "override".to_string());
    extra.insert("custom_param".to_string(), "value".to_string());

    let fields = build_fields(&config(), &identity(), &json!([]), &extra)
        .expect("fields should build");

    assert_eq!(fields[FIELD_DEVICE_UNIQ], "override");
    assert_eq!(fields["custom_param"], "value");
}

#[test]
fn post_data_is_the_encoded_payload() {
    let fields = build_fields(
        &config(),
        &identity(),
        &json!([{"name": "widget"}]),
        &BTreeMap::new(),
    )
    .expect("fields should build");

    assert_eq!(fields[FIELD_POST_DATA], r#"[{"name":"widget"}]"#);
}
