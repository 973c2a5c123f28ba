use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::SatuSehatClient;

/// Mounted under `/api/satusehat`.
pub fn satusehat_routes(client: SatuSehatClient) -> Router {
    Router::new()
        .route("/auth", post(handlers::request_token))
        .route("/medicine", get(handlers::list_medicines))
        .with_state(client)
}
