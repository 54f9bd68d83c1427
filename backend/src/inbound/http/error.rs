//! HTTP adapter mapping for domain errors.
//!
//! Turns the transport-agnostic [`Error`] envelope into JSON responses with a
//! status per [`ErrorCode`]. Storage failures are logged in full and redacted
//! for clients.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidInput
        | ErrorCode::DuplicateIdentity
        | ErrorCode::SelfTransfer
        | ErrorCode::InvalidAmount
        | ErrorCode::InsufficientFunds => StatusCode::BAD_REQUEST,
        ErrorCode::AccountNotFound => StatusCode::NOT_FOUND,
        ErrorCode::TransferFailed | ErrorCode::StorageFailure => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::StorageFailure) {
        let mut redacted = Error::storage_failure(REDACTED_MESSAGE);
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!(
                code = ?self.code(),
                message = self.message(),
                trace_id = self.trace_id(),
                "request failed"
            );
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

/// Report undecodable JSON bodies as `invalid_input`.
///
/// Registered through [`actix_web::web::JsonConfig::error_handler`].
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "request body must be application/json".to_owned(),
        JsonPayloadError::Deserialize(inner) => format!("invalid request body: {inner}"),
        other => format!("invalid request body: {other}"),
    };
    Error::invalid_input(message).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::json;

    const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

    async fn decode(response: HttpResponse) -> Error {
        let bytes = to_bytes(response.into_body())
            .await
            .expect("reading response body succeeds");
        serde_json::from_slice(&bytes).expect("error JSON deserialisation succeeds")
    }

    #[rstest]
    #[case(ErrorCode::InvalidInput, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::DuplicateIdentity, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::SelfTransfer, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::InvalidAmount, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::InsufficientFunds, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::AccountNotFound, StatusCode::NOT_FOUND)]
    #[case(ErrorCode::TransferFailed, StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(ErrorCode::StorageFailure, StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_code_matches_error_code(#[case] code: ErrorCode, #[case] status: StatusCode) {
        assert_eq!(status_for(code), status);
    }

    #[actix_web::test]
    async fn storage_failures_are_redacted() {
        let error = Error::storage_failure("account repository timed out: list exceeded 5000ms")
            .with_trace_id(TRACE_ID)
            .with_details(json!({ "secret": true }));

        let response = ResponseError::error_response(&error);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some(TRACE_ID)
        );

        let body = decode(response).await;
        assert_eq!(body.code(), ErrorCode::StorageFailure);
        assert_eq!(body.message(), REDACTED_MESSAGE);
        assert_eq!(body.trace_id(), Some(TRACE_ID));
        assert!(body.details().is_none());
    }

    #[actix_web::test]
    async fn transfer_failures_keep_their_cause() {
        let error = Error::new(
            ErrorCode::TransferFailed,
            "transfer failed: database connection error",
        );

        let body = decode(ResponseError::error_response(&error)).await;
        assert_eq!(body.message(), "transfer failed: database connection error");
    }

    #[actix_web::test]
    async fn client_errors_keep_details() {
        let error = Error::invalid_input("name must not be empty")
            .with_details(json!({ "field": "name" }));

        let response = ResponseError::error_response(&error);
        assert!(response.headers().get(TRACE_ID_HEADER).is_none());

        let body = decode(response).await;
        assert_eq!(body.details(), Some(&json!({ "field": "name" })));
    }
}
