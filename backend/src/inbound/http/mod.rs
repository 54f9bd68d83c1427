//! HTTP inbound adapter exposing the ledger REST endpoints.

pub mod error;
pub mod health;
pub mod state;
pub mod transfers;
pub mod users;

use actix_web::web;

pub use error::{ApiResult, json_error_handler};

/// JSON extractor configuration reporting decode failures as `invalid_input`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Register the `/v1` ledger routes and the JSON error handler.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use ledger::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/v1")
            .service(users::create_user)
            .service(users::list_users)
            .service(transfers::create_transfer),
    );
}
