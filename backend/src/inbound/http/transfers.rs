//! Transfer handler.
//!
//! ```text
//! POST /v1/transfer {"from_user_id":1,"to_user_id":2,"amount":40}
//! ```

use actix_web::{HttpResponse, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ports::TransferRequest;
use crate::domain::{AccountId, Error, Transfer};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /v1/transfer`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateTransferRequest {
    #[schema(example = 1)]
    pub from_user_id: i64,
    #[schema(example = 2)]
    pub to_user_id: i64,
    #[schema(value_type = f64, example = 40.0)]
    pub amount: Decimal,
}

impl From<CreateTransferRequest> for TransferRequest {
    fn from(value: CreateTransferRequest) -> Self {
        Self {
            from: AccountId::new(value.from_user_id),
            to: AccountId::new(value.to_user_id),
            amount: value.amount,
        }
    }
}

/// Move funds between two accounts atomically.
#[utoipa::path(
    post,
    path = "/v1/transfer",
    request_body = CreateTransferRequest,
    responses(
        (status = 201, description = "Transfer committed", body = Transfer),
        (status = 400, description = "Self transfer, invalid amount or insufficient funds", body = Error),
        (status = 404, description = "Source or destination account not found", body = Error),
        (status = 500, description = "Transfer or storage failure", body = Error)
    ),
    tags = ["transfers"],
    operation_id = "createTransfer"
)]
#[post("/transfer")]
pub async fn create_transfer(
    state: web::Data<HttpState>,
    payload: web::Json<CreateTransferRequest>,
) -> ApiResult<HttpResponse> {
    let transfer = state.transfers.transfer(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(transfer))
}
