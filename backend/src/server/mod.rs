//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{LedgerSettings, ServerConfig};
pub use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use ledger::Trace;
#[cfg(debug_assertions)]
use ledger::doc::ApiDoc;
use ledger::inbound::http::health::{HealthState, live, ready};
use ledger::inbound::http::state::HttpState;
use ledger::inbound::http::configure;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the Actix HTTP server.
///
/// Readiness is flagged once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();
    let ServerConfig { bind_addr } = config;

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use ledger::TraceId;
    use ledger::domain::TRACE_ID_HEADER;
    use serde_json::json;

    async fn memory_state() -> HttpState {
        let settings = LedgerSettings {
            bind_addr: None,
            database_url: None,
            pool_max_size: None,
            pool_min_idle: None,
            connection_timeout_secs: None,
            storage_timeout_ms: None,
            run_migrations: None,
        };
        build_http_state(&settings).await.expect("memory state builds")
    }

    #[actix_web::test]
    async fn app_serves_ledger_routes_with_trace_ids() {
        let health = web::Data::new(HealthState::new());
        let app = actix_test::init_service(build_app(
            health,
            web::Data::new(memory_state().await),
        ))
        .await;

        let create = actix_test::TestRequest::post()
            .uri("/v1/users")
            .set_json(json!({ "name": "Alice", "email": "alice@example.com", "balance": 10 }))
            .to_request();
        let response = actix_test::call_service(&app, create).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .expect("trace id header");
        trace_id.parse::<TraceId>().expect("trace id is a UUID");

        let list = actix_test::TestRequest::get().uri("/v1/users").to_request();
        let response = actix_test::call_service(&app, list).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn readiness_is_unavailable_until_marked() {
        let health = web::Data::new(HealthState::new());
        let app = actix_test::init_service(build_app(
            health.clone(),
            web::Data::new(memory_state().await),
        ))
        .await;

        let probe = || actix_test::TestRequest::get().uri("/health/ready").to_request();
        let response = actix_test::call_service(&app, probe()).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        health.mark_ready();
        let response = actix_test::call_service(&app, probe()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
