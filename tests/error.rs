use cloudbase_api::CloudBaseError;
use reqwest::StatusCode;

#[test]
fn missing_action_key_names_the_action_and_status() {
    let error = CloudBaseError::MissingActionKey {
        action: "data".to_string(),
        status: StatusCode::OK,
    };
    let message = error.to_string();

    assert!(message.contains("'data'"));
    assert!(message.contains("200"));
}

#[test]
fn missing_session_id_is_a_registration_failure() {
    let error = CloudBaseError::MissingSessionId {
        status: StatusCode::OK,
    };
    assert!(error.to_string().contains("no usable session id"));
}

#[test]
fn response_not_json_carries_the_parse_source() {
    let source = serde_json::from_str::<serde_json::Value>("not json")
        .expect_err("sample parse error");
    let error = CloudBaseError::ResponseNotJson {
        action: "email".to_string(),
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "<html/>".to_string(),
        source,
    };
    let message = error.to_string();

    assert!(message.contains("'email'"));
    assert!(message.contains("500"));
    assert!(message.contains("<html/>"));
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn retry_exhausted_reports_attempts_and_last_error() {
    let error = CloudBaseError::RetryExhausted {
        attempts: 4,
        status: Some(StatusCode::SERVICE_UNAVAILABLE),
        last_error: Some("connection refused".to_string()),
    };
    let message = error.to_string();

    assert!(message.contains("4 attempts"));
    assert!(message.contains("503"));
    assert!(message.contains("connection refused"));
}

#[test]
fn attachment_errors_name_the_field_and_path() {
    let error = CloudBaseError::attachment(
        "photo",
        "/tmp/missing.png",
        std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
    );
    let message = error.to_string();

    assert!(message.contains("'photo'"));
    assert!(message.contains("/tmp/missing.png"));
}
