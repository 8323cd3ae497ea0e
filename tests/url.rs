use cloudbase_api::url::{
    api_url, normalize_base_url, paypal_update_status_url, DEFAULT_API_BASE_URL,
};

#[test]
fn empty_base_url_falls_back_to_default() {
    assert_eq!(normalize_base_url(""), DEFAULT_API_BASE_URL);
    assert_eq!(normalize_base_url("   "), DEFAULT_API_BASE_URL);
}

#[test]
fn trailing_slashes_are_trimmed() {
    assert_eq!(normalize_base_url("http://localhost:8080/"), "http://localhost:8080");
    assert_eq!(normalize_base_url("http://localhost:8080//"), "http://localhost:8080");
}

#[test]
fn api_url_joins_app_code_and_resource() {
    assert_eq!(
        api_url("", "my-app", "register"),
        "http://api.cloudbase.io/my-app/register"
    );
    assert_eq!(
        api_url("http://localhost:9000/", "my-app", "users/search"),
        "http://localhost:9000/my-app/users/search"
    );
}

#[test]
fn paypal_update_status_url_encodes_parameters_in_query_string() {
    let url = paypal_update_status_url("", "my-app", "INV-1", "pay-9", true);
    assert_eq!(
        url,
        "http://api.cloudbase.io/my-app/paypal/update-status?invoice_number=INV-1&payment_id=pay-9&paypal=paid"
    );
}

#[test]
fn paypal_update_status_url_marks_cancelled_payments() {
    let url = paypal_update_status_url("", "my-app", "INV-1", "pay-9", false);
    assert!(url.ends_with("&paypal=cancel"));
}

#[test]
fn paypal_update_status_url_percent_encodes_reserved_characters() {
    let url = paypal_update_status_url("", "my-app", "INV 1/2", "pay&9", true);
    assert!(url.contains("invoice_number=INV%201%2F2"));
    assert!(url.contains("payment_id=pay%269"));
}
