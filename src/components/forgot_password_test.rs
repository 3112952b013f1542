use super::*;
use crate::util::validation::{EMAIL_INVALID, EMAIL_REQUIRED};

fn with_email(email: &str) -> ResetRequest {
    ResetRequest { email: email.to_owned(), ..ResetRequest::default() }
}

#[test]
fn empty_request_cannot_be_sent() {
    let mut request = ResetRequest::default();
    assert!(!request.can_submit());

    assert!(!request.submit());
    assert_eq!(request.error.as_deref(), Some(EMAIL_REQUIRED));
    assert!(!request.submitted);
}

#[test]
fn malformed_address_stays_on_form() {
    let mut request = with_email("not-an-email");
    assert!(request.can_submit());

    assert!(!request.submit());
    assert_eq!(request.error.as_deref(), Some(EMAIL_INVALID));
    assert!(!request.submitted);
}

#[test]
fn valid_address_is_acknowledged() {
    let mut request = with_email("u@test.com");

    assert!(request.submit());
    assert!(request.submitted);
    assert_eq!(request.error, None);
    assert!(!request.can_submit());
}

#[test]
fn earlier_error_clears_on_success() {
    let mut request = with_email("u@test");
    request.submit();
    assert!(request.error.is_some());

    request.email = "u@test.com".to_owned();
    assert!(request.submit());
    assert_eq!(request.error, None);
}

#[test]
fn second_submit_is_ignored() {
    let mut request = with_email("u@test.com");
    assert!(request.submit());
    assert!(!request.submit());
    assert!(request.submitted);
}
