use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

/// Retry attempts after the initial request attempt. The protocol has no
/// retry policy of its own, so the default budget is zero; raise it through
/// `CloudBaseConfig::with_max_retries`.
pub const DEFAULT_MAX_RETRIES: u32 = 0;
/// Base delay before the first retry.
pub const BASE_DELAY_MS: u64 = 1000;

fn transient_error_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i)rate.?limit|overloaded|service.?unavailable|upstream.?connect|connection.?refused")
            .expect("retry regex must compile")
    })
}

/// Whether a reply is worth retrying: a retryable status family, or
/// transient-failure wording in the body.
pub fn is_retryable_http_error(status: u16, error_text: &str) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504) || transient_error_regex().is_match(error_text)
}

/// Exponential backoff delay for a retry attempt.
pub fn retry_delay(attempt: u32) -> Duration {
    let exponent = attempt.min(30);
    Duration::from_millis(BASE_DELAY_MS * 2u64.saturating_pow(exponent))
}
