use std::time::Duration;

use cloudbase_api::retry::{is_retryable_http_error, retry_delay, DEFAULT_MAX_RETRIES};

#[test]
fn retries_are_off_by_default() {
    assert_eq!(DEFAULT_MAX_RETRIES, 0);
}

#[test]
fn retryable_statuses_match() {
    for status in [429, 500, 502, 503, 504] {
        assert!(is_retryable_http_error(status, ""), "status {status}");
    }
}

#[test]
fn ordinary_statuses_do_not_match() {
    for status in [200, 201, 400, 401, 403, 404] {
        assert!(!is_retryable_http_error(status, ""), "status {status}");
    }
}

#[test]
fn transient_error_text_matches_regardless_of_status() {
    assert!(is_retryable_http_error(400, "rate limit exceeded"));
    assert!(is_retryable_http_error(200, "upstream connect error"));
    assert!(is_retryable_http_error(0, "Connection refused"));
    assert!(!is_retryable_http_error(400, "invalid request"));
}

#[test]
fn retry_delay_grows_exponentially() {
    assert_eq!(retry_delay(0), Duration::from_millis(1000));
    assert_eq!(retry_delay(1), Duration::from_millis(2000));
    assert_eq!(retry_delay(2), Duration::from_millis(4000));
}

#[test]
fn retry_delay_is_bounded_for_large_attempts() {
    // exponent saturates rather than overflowing
    let capped = retry_delay(64);
    assert_eq!(capped, retry_delay(30));
}
