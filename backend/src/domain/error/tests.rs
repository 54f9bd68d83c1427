//! Tests for the domain error envelope.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
fn invalid_input_constructor_sets_code() {
    let err = Error::invalid_input("bad");
    assert_eq!(err.code(), ErrorCode::InvalidInput);
    assert_eq!(err.message(), "bad");
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidInput, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_input("bad").try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_has_no_trace_id_out_of_scope() {
    assert!(Error::storage_failure("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture is a UUID");
    let error = trace_id.scoped(async move { Error::storage_failure("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[case(ErrorCode::DuplicateIdentity, "duplicate_identity")]
#[case(ErrorCode::AccountNotFound, "account_not_found")]
#[case(ErrorCode::InsufficientFunds, "insufficient_funds")]
#[case(ErrorCode::TransferFailed, "transfer_failed")]
fn codes_serialise_as_snake_case(#[case] code: ErrorCode, #[case] expected: &str) {
    let value = serde_json::to_value(Error::new(code, "message")).expect("serialise error");
    assert_eq!(value["code"], json!(expected));
}

#[rstest]
fn deserialisation_rejects_blank_message() {
    let payload = json!({ "code": "invalid_input", "message": " " });
    assert!(serde_json::from_value::<Error>(payload).is_err());
}

#[rstest]
fn deserialisation_keeps_trace_and_details(expected_trace_id: String) {
    let payload = json!({
        "code": "self_transfer",
        "message": "cannot transfer to the same account",
        "trace_id": expected_trace_id,
        "details": { "account_id": 1 }
    });
    let error: Error = serde_json::from_value(payload).expect("valid payload");

    assert_eq!(error.code(), ErrorCode::SelfTransfer);
    assert_eq!(error.trace_id(), Some(TRACE_ID));
    assert_eq!(error.details(), Some(&json!({ "account_id": 1 })));
}
