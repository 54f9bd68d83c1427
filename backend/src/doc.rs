//! OpenAPI documentation for the ledger HTTP surface.
//!
//! Served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{Account, Error, ErrorCode, Transfer};
use crate::inbound::http::transfers::CreateTransferRequest;
use crate::inbound::http::users::CreateUserRequest;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ledger API",
        description = "Account registration and atomic balance transfers."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::transfers::create_transfer,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Account,
        Transfer,
        Error,
        ErrorCode,
        CreateUserRequest,
        CreateTransferRequest
    )),
    tags(
        (name = "users", description = "Account holders and balances"),
        (name = "transfers", description = "Balance movements between accounts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
