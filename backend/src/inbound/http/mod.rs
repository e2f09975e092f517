//! HTTP inbound adapter exposing the REST endpoints.

pub mod envelope;
pub mod error;
pub mod health;
pub mod roles;
pub mod state;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Mount the versioned API and the health probes.
///
/// Callers register [`state::HttpState`] and [`health::HealthState`] as app
/// data before calling this.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::query_config())
        .service(health::ready)
        .service(health::live)
        .service(web::scope("/api/v1").configure(users::configure));
}
