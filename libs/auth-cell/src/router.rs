use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::models::AuthState;

/// Account routes, mounted under `/api/doctor`.
pub fn auth_routes(state: AuthState) -> Router {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/signin", post(handlers::signin))
        .with_state(state)
}

/// The email verification link target, mounted at the root.
pub fn verification_routes(state: AuthState) -> Router {
    Router::new()
        .route("/verify", get(handlers::verify))
        .with_state(state)
}
