//! Tests for account handlers.

use super::*;
use crate::domain::ports::{MockAccountRegistry, MockTransferEngine};
use crate::domain::{
    AccountDraft, AccountId, AccountName, AccountValidationError, IdentityKey, LedgerError, Money,
};
use crate::inbound::http::json_config;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::sync::Arc;

#[fixture]
fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
        .single()
        .expect("valid timestamp")
}

fn account(id: i64, name: &str, email: &str, balance: Decimal, at: DateTime<Utc>) -> Account {
    Account::new(AccountDraft {
        id: AccountId::new(id),
        name: AccountName::new(name).expect("valid name"),
        identity_key: IdentityKey::new(email).expect("valid email"),
        balance: Money::non_negative(balance).expect("valid balance"),
        created_at: at,
        updated_at: at,
    })
}

async fn call(
    registry: MockAccountRegistry,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let state = HttpState::new(Arc::new(registry), Arc::new(MockTransferEngine::new()));
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .service(web::scope("/v1").service(create_user).service(list_users)),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    (
        status,
        serde_json::from_slice(&body).expect("response is JSON"),
    )
}

#[rstest]
#[actix_web::test]
async fn create_user_returns_created_account(created_at: DateTime<Utc>) {
    let mut registry = MockAccountRegistry::new();
    registry
        .expect_register()
        .withf(|request| {
            request.name == "Alice"
                && request.email == "alice@example.com"
                && request.balance == dec!(100.5)
        })
        .times(1)
        .return_once(move |_| {
            Ok(account(
                1,
                "Alice",
                "alice@example.com",
                dec!(100.5),
                created_at,
            ))
        });

    let (status, body) = call(
        registry,
        actix_test::TestRequest::post().uri("/v1/users").set_json(json!({
            "name": "Alice",
            "email": "alice@example.com",
            "balance": 100.5
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], json!(1));
    assert_eq!(body["email"], json!("alice@example.com"));
    assert_eq!(body["balance"], json!(100.5));
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[rstest]
#[case::duplicate(
    LedgerError::DuplicateIdentity { identity_key: "a@x.com".to_owned() },
    "duplicate_identity"
)]
#[case::invalid(
    LedgerError::InvalidInput(AccountValidationError::EmptyName),
    "invalid_input"
)]
#[actix_web::test]
async fn registration_errors_are_bad_requests(#[case] error: LedgerError, #[case] code: &str) {
    let mut registry = MockAccountRegistry::new();
    registry.expect_register().return_once(move |_| Err(error));

    let (status, body) = call(
        registry,
        actix_test::TestRequest::post().uri("/v1/users").set_json(json!({
            "name": "A",
            "email": "a@x.com",
            "balance": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!(code));
}

#[rstest]
#[case::missing_balance(json!({ "name": "Alice", "email": "alice@example.com" }))]
#[case::string_name(json!({ "name": 7, "email": "alice@example.com", "balance": 1 }))]
#[actix_web::test]
async fn undecodable_bodies_are_invalid_input(#[case] payload: Value) {
    let mut registry = MockAccountRegistry::new();
    registry.expect_register().never();

    let (status, body) = call(
        registry,
        actix_test::TestRequest::post()
            .uri("/v1/users")
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_input"));
}

#[rstest]
#[actix_web::test]
async fn list_users_returns_registry_order(created_at: DateTime<Utc>) {
    let mut registry = MockAccountRegistry::new();
    registry.expect_list().times(1).return_once(move || {
        Ok(vec![
            account(2, "Bob", "bob@example.com", dec!(50), created_at),
            account(1, "Alice", "alice@example.com", dec!(100), created_at),
        ])
    });

    let (status, body) = call(registry, actix_test::TestRequest::get().uri("/v1/users")).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|item| item["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![2, 1]);
}

#[actix_web::test]
async fn list_failure_is_redacted() {
    let mut registry = MockAccountRegistry::new();
    registry
        .expect_list()
        .return_once(|| Err(LedgerError::storage_failure("pool exhausted")));

    let (status, body) = call(registry, actix_test::TestRequest::get().uri("/v1/users")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], json!("storage_failure"));
    assert_eq!(body["message"], json!("Internal server error"));
}
