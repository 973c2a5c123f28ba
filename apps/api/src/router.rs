use axum::{response::Html, routing::get, Router};

use auth_cell::{auth_routes, verification_routes};
use medical_record_cell::medical_record_routes;
use satusehat_cell::satusehat_routes;

use crate::state::AppServices;

const LANDING_PAGE: &str = include_str!("../static/index.html");

pub fn create_router(services: &AppServices) -> Router {
    Router::new()
        .route("/", get(|| async { Html(LANDING_PAGE) }))
        .nest("/api/doctor", auth_routes(services.auth_state()))
        .nest("/api/doctor/medical-record", medical_record_routes(services.record_state()))
        .nest("/api/satusehat", satusehat_routes(services.satusehat_client()))
        .merge(verification_routes(services.auth_state()))
}
