//! Reusable response checks
//!
//! Each check returns `AssertionFailure` describing the mismatch so a case can
//! report it without panicking.

use crate::api::client::ApiResponse;
use crate::api::models::ErrorEnvelope;
use crate::error::AssertionFailure;
use serde_json::Value;

/// `title` of the validation problem envelope
pub const VALIDATION_TITLE: &str = "One or more validation errors occurred.";

/// `detail` of the validation problem envelope
pub const VALIDATION_DETAIL: &str = "Please refer to the errors property for additional details.";

pub const ID_REQUIRED_MESSAGE: &str = "'Id' must not be empty.";

pub const TITLE_REQUIRED_MESSAGE: &str = "The Title field is required.";

pub type AssertionResult = Result<(), AssertionFailure>;

pub fn assert_status(response: &ApiResponse, expected: u16) -> AssertionResult {
    if response.status() == expected {
        return Ok(());
    }

    Err(AssertionFailure::new(format!(
        "expected status {} from {}, got {}: {}",
        expected,
        response.url(),
        response.status(),
        response.text()
    )))
}

/// Envelope-level `title` and `detail` must equal the fixed validation strings
pub fn assert_error_envelope(body: &Value) -> AssertionResult {
    for (field, expected) in [("title", VALIDATION_TITLE), ("detail", VALIDATION_DETAIL)] {
        match body.get(field).and_then(Value::as_str) {
            Some(actual) if actual == expected => {}
            Some(actual) => {
                return Err(AssertionFailure::new(format!(
                    "expected {} {:?}, got {:?}",
                    field, expected, actual
                )));
            }
            None => {
                return Err(AssertionFailure::new(format!(
                    "error envelope has no {} field: {}",
                    field, body
                )));
            }
        }
    }
    Ok(())
}

/// `errors[field]` must be present and carry `expected`
///
/// A string entry must equal `expected`, an array entry must contain it.
pub fn assert_validation_error(body: &Value, field: &str, expected: &str) -> AssertionResult {
    let envelope: ErrorEnvelope = serde_json::from_value(body.clone())
        .map_err(|e| AssertionFailure::new(format!("response is not an error envelope ({}): {}", e, body)))?;

    let Some(messages) = envelope.messages(field) else {
        return Err(AssertionFailure::new(format!(
            "no validation error for {:?}, errors were: {}",
            field,
            body.get("errors").unwrap_or(&Value::Null)
        )));
    };

    if messages.iter().any(|message| message == expected) {
        Ok(())
    } else {
        Err(AssertionFailure::new(format!(
            "expected errors.{} to be {:?}, got {:?}",
            field, expected, messages
        )))
    }
}

/// A top-level string field must equal `expected`
pub fn assert_field_eq(body: &Value, field: &str, expected: &str) -> AssertionResult {
    match body.get(field).and_then(Value::as_str) {
        // Ids may differ only in case between request and response
        Some(actual) if actual.eq_ignore_ascii_case(expected) => Ok(()),
        Some(actual) => Err(AssertionFailure::new(format!(
            "expected {} {:?}, got {:?}",
            field, expected, actual
        ))),
        None => Err(AssertionFailure::new(format!(
            "response has no {} field: {}",
            field, body
        ))),
    }
}
