/// Default base URL for the cloudbase.io REST APIs.
pub const DEFAULT_API_BASE_URL: &str = "http://api.cloudbase.io";

/// Normalize a configured base URL.
///
/// Normalization rules:
/// 1) empty or whitespace-only input falls back to the default base URL
/// 2) trailing slashes are trimmed
pub fn normalize_base_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_API_BASE_URL
    } else {
        input.trim()
    };

    base.trim_end_matches('/').to_string()
}

/// Join an API endpoint: `<base>/<app_code>/<resource>`.
pub fn api_url(base: &str, app_code: &str, resource: &str) -> String {
    format!("{}/{}/{}", normalize_base_url(base), app_code, resource)
}

/// Endpoint for PayPal status updates.
///
/// This is the one operation whose parameters ride the URL query string
/// instead of the form body; the server expects exactly this layout.
pub fn paypal_update_status_url(
    base: &str,
    app_code: &str,
    invoice_number: &str,
    payment_id: &str,
    paid: bool,
) -> String {
    format!(
        "{}?invoice_number={}&payment_id={}&paypal={}",
        api_url(base, app_code, "paypal/update-status"),
        encode_query_component(invoice_number),
        encode_query_component(payment_id),
        if paid { "paid" } else { "cancel" },
    )
}

/// Percent-encode a query-string component. Unreserved characters pass
/// through; everything else becomes `%XX`.
fn encode_query_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}
