//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use user_records::Trace;
use user_records::domain::UserService;
use user_records::inbound::http::health::HealthState;
use user_records::inbound::http::state::HttpState;
use user_records::outbound::document_store::InMemoryDocumentStore;
use user_records::outbound::users::DocumentUserRepository;

/// Wire the store, repository and service into handler state.
///
/// The store client is built once here and shared by every worker.
fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let store = Arc::new(InMemoryDocumentStore::new(config.clock.clone()));
    let repository = Arc::new(DocumentUserRepository::new(store, config.collection.clone()));
    let service = Arc::new(UserService::new(repository));
    web::Data::new(HttpState::new(
        service.clone(),
        service,
        config.clock.clone(),
    ))
}

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
    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(user_records::inbound::http::configure)
}

/// Construct the HTTP server and mark it ready once bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(config.bind_addr)?
        .run();

    info!(
        bind_addr = %config.bind_addr,
        collection = %config.collection,
        "user records server listening"
    );
    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use mockable::Clock;
    use serde_json::{Value, json};
    use user_records::inbound::http::roles::ROLE_HEADER;

    use super::*;

    struct FrozenClock(DateTime<Utc>);

    impl Clock for FrozenClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[actix_web::test]
    async fn wired_app_serves_users_and_probes() {
        let at = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("fixed timestamp is valid");
        let config = ServerConfig::new("127.0.0.1:0".parse().expect("literal parses"), "users")
            .with_clock(Arc::new(FrozenClock(at)));
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let app = test::init_service(build_app(health, build_http_state(&config))).await;

        let ready = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(ready.status(), StatusCode::OK);

        let created = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/users")
                .insert_header((ROLE_HEADER, "admin"))
                .set_json(json!({ "name": "Ada Lovelace", "email": "ada@example.com" }))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        assert!(created.headers().contains_key("trace-id"));
        let body: Value = test::read_body_json(created).await;
        assert_eq!(body["data"]["createdAt"], "2024-05-01T12:00:00Z");
        assert_eq!(body["timestamp"], "2024-05-01T12:00:00Z");
    }
}
