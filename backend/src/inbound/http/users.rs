//! Account registration and listing handlers.
//!
//! ```text
//! POST /v1/users {"name":"Alice","email":"alice@example.com","balance":100}
//! GET /v1/users
//! ```

use actix_web::{HttpResponse, get, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::RegistrationRequest;
use crate::domain::{Account, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /v1/users`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Opening balance; at most four decimal places.
    #[schema(value_type = f64, example = 100.0)]
    pub balance: Decimal,
}

impl From<CreateUserRequest> for RegistrationRequest {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            balance: value.balance,
        }
    }
}

/// Register a new account holder.
#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 400, description = "Invalid input or duplicate email", body = Error),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let account = state.accounts.register(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(account))
}

/// List accounts, newest first.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use ledger::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/v1/users",
    responses(
        (status = 200, description = "Accounts", body = [Account]),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Account>>> {
    let accounts = state.accounts.list().await?;
    debug!(count = accounts.len(), "listed accounts");
    Ok(web::Json(accounts))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
